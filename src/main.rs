//! orbit-manager - chat moderation bot core.
//!
//! Reads platform events as JSON lines on stdin and writes the resulting
//! effects as JSON lines on stdout. Logs go to stderr.

mod commands;
mod config;
mod db;
mod dispatch;
mod error;
mod filters;
mod moderation;
mod telemetry;
mod transport;

use crate::config::{Config, validate};
use crate::db::Database;
use crate::dispatch::Dispatcher;
use crate::transport::{StdioTransport, Transport};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        anyhow::bail!(
            "Refusing to start with {} configuration error(s). See messages above.",
            errors.len()
        );
    }

    info!(
        command_prefix = %config.bot.command_prefix,
        dev_prefix = %config.bot.dev_prefix,
        developers = config.bot.developers.len(),
        "Starting orbit-manager"
    );

    // Initialize database
    let db = Database::new(&config.database.path).await?;
    let dispatcher = Dispatcher::from_config(db, &config, Some(PathBuf::from(&config_path)))?;

    let mut transport = StdioTransport::stdio();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut handled: u64 = 0;
    loop {
        let event = tokio::select! {
            event = transport.next_event() => event?,
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        };
        let Some(event) = event else {
            info!("Input closed");
            break;
        };

        match dispatcher.handle_event(&event).await {
            Ok(effects) => transport.deliver(&effects).await?,
            Err(e) => warn!(
                kind = event.kind(),
                chat_id = event.chat_id(),
                error = %e,
                code = e.error_code(),
                "Dropping event after store failure"
            ),
        }
        handled += 1;
    }

    info!(events = handled, "orbit-manager stopped");
    Ok(())
}

/// Log to stderr; stdout carries effects. `ORBIT_LOG_FORMAT=json` switches
/// to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if std::env::var("ORBIT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
