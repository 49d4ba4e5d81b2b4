//! Warning and auto-mute policy configuration.

use serde::Deserialize;

use super::defaults::default_auto_mute_duration;
use super::duration::{DurationError, parse_duration};

/// Moderation policy shared by every chat.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Mute applied when a user reaches the chat's `max_warns` (default: "1h").
    ///
    /// Independent of the chat's `mute_duration`, which only sets the default
    /// length of an explicit `mute`.
    #[serde(default = "default_auto_mute_duration")]
    pub auto_mute_duration: String,
    /// Reset the warning counter to zero once an auto-mute fires.
    ///
    /// Off by default: warnings accumulate as an escalating record until a
    /// moderator runs `unwarn`.
    #[serde(default)]
    pub reset_warns_on_auto_mute: bool,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            auto_mute_duration: default_auto_mute_duration(),
            reset_warns_on_auto_mute: false,
        }
    }
}

impl ModerationConfig {
    /// Parse the auto-mute duration.
    pub fn auto_mute(&self) -> Result<chrono::Duration, DurationError> {
        parse_duration(&self.auto_mute_duration)
    }
}
