//! Core configuration types and loading.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::chat::ChatSettings;
use super::defaults::{default_command_prefix, default_database_path, default_dev_prefix};
use super::filters::FiltersConfig;
use super::moderation::ModerationConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity and command prefixes.
    #[serde(default)]
    pub bot: BotConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Warning and auto-mute policy.
    #[serde(default)]
    pub moderation: ModerationConfig,
    /// Content filter tuning.
    #[serde(default)]
    pub filters: FiltersConfig,
    /// Settings written to a chat the first time it is seen.
    #[serde(default)]
    pub chat_defaults: ChatSettings,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Prefix of the standard command set (default: "!").
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Prefix of the developer command set (default: "!!").
    #[serde(default = "default_dev_prefix")]
    pub dev_prefix: String,
    /// Platform user ids that always resolve to the Developer level.
    #[serde(default)]
    pub developers: HashSet<i64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            dev_prefix: default_dev_prefix(),
            developers: HashSet::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bot.command_prefix, "!");
        assert_eq!(config.bot.dev_prefix, "!!");
        assert!(config.bot.developers.is_empty());
        assert_eq!(config.database.path, "data/orbit.db");
        assert_eq!(config.moderation.auto_mute_duration, "1h");
        assert_eq!(config.chat_defaults.max_warns, 3);
    }

    #[test]
    fn parses_full_config() {
        let toml_str = r#"
[bot]
command_prefix = "/"
dev_prefix = "//"
developers = [123456789, 987654321]

[database]
path = ":memory:"

[moderation]
auto_mute_duration = "30m"
reset_warns_on_auto_mute = true

[filters]
banned_words = ["spam", "scam"]
flood_messages_per_second = 4

[chat_defaults]
max_warns = 5
anticaps = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.command_prefix, "/");
        assert!(config.bot.developers.contains(&987654321));
        assert_eq!(config.database.path, ":memory:");
        assert!(config.moderation.reset_warns_on_auto_mute);
        assert_eq!(config.filters.banned_words.len(), 2);
        assert_eq!(config.filters.flood_messages_per_second, 4);
        assert_eq!(config.chat_defaults.max_warns, 5);
        assert!(config.chat_defaults.anticaps);
        // Unset keys keep their defaults.
        assert!(config.chat_defaults.antilinks);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/nonexistent/orbit.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
