//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use super::duration::DurationError;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.command_prefix must not be empty")]
    EmptyCommandPrefix,
    #[error("bot.dev_prefix must not be empty")]
    EmptyDevPrefix,
    #[error("bot.command_prefix and bot.dev_prefix must differ, both are '{0}'")]
    SamePrefixes(String),
    #[error("moderation.auto_mute_duration is invalid: {0}")]
    InvalidAutoMute(DurationError),
    #[error("chat_defaults.max_warns must be at least 1")]
    ZeroMaxWarns,
    #[error("chat_defaults.mute_duration must be at least 1 second")]
    ZeroMuteDuration,
    #[error("filters.flood_messages_per_second and filters.flood_burst must be at least 1")]
    ZeroFloodQuota,
    #[error("filters.caps_ratio must be within 0.0..=1.0, got {0}")]
    InvalidCapsRatio(f32),
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bot = &config.bot;
    if bot.command_prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandPrefix);
    }
    if bot.dev_prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyDevPrefix);
    }
    if !bot.command_prefix.is_empty() && bot.command_prefix == bot.dev_prefix {
        errors.push(ValidationError::SamePrefixes(bot.command_prefix.clone()));
    }

    if let Err(e) = config.moderation.auto_mute() {
        errors.push(ValidationError::InvalidAutoMute(e));
    }

    if config.chat_defaults.max_warns == 0 {
        errors.push(ValidationError::ZeroMaxWarns);
    }
    if config.chat_defaults.mute_duration == 0 {
        errors.push(ValidationError::ZeroMuteDuration);
    }

    let filters = &config.filters;
    if filters.flood_messages_per_second == 0 || filters.flood_burst == 0 {
        errors.push(ValidationError::ZeroFloodQuota);
    }
    if !(0.0..=1.0).contains(&filters.caps_ratio) {
        errors.push(ValidationError::InvalidCapsRatio(filters.caps_ratio));
    }

    // The database layer creates the final directory itself; a missing
    // grandparent usually means a typo.
    let db_path = &config.database.path;
    if db_path != ":memory:"
        && let Some(parent) = Path::new(db_path).parent()
        && let Some(grandparent) = parent.parent()
        && !grandparent.as_os_str().is_empty()
        && !grandparent.exists()
    {
        errors.push(ValidationError::DatabasePathInvalid(
            parent.display().to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
