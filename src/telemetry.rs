//! Telemetry utilities for command timing and event correlation.

use std::time::Instant;
use tracing::debug;

/// Guard for timing command execution.
///
/// Logs the command latency when dropped.
pub struct CommandTimer {
    command: &'static str,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1_000.0;
        debug!(command = self.command, elapsed_ms, "Command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one inbound event.
    pub fn event(kind: &str, chat_id: i64) -> Span {
        info_span!("event", kind = %kind, chat_id)
    }

    /// Create a span for a command execution.
    pub fn command(name: &str, actor_id: i64, target_id: Option<i64>) -> Span {
        if let Some(target_id) = target_id {
            info_span!("command", name = %name, actor_id, target_id)
        } else {
            info_span!("command", name = %name, actor_id)
        }
    }
}
