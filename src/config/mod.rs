//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, BotConfig, DatabaseConfig)
//! - [`chat`]: Per-chat settings and their defaults (ChatSettings)
//! - [`moderation`]: Warning and auto-mute policy (ModerationConfig)
//! - [`filters`]: Content filter configuration (FiltersConfig)
//! - [`duration`]: Compact duration grammar shared by config and commands
//! - [`validation`]: Startup validation

mod chat;
mod defaults;
mod duration;
mod filters;
mod moderation;
mod types;
mod validation;

pub use chat::{ChatSettings, SettingKind};
pub use duration::{DurationError, format_duration, parse_duration};
pub use filters::FiltersConfig;
pub use moderation::ModerationConfig;
pub use types::{BotConfig, Config, ConfigError, DatabaseConfig};
pub use validation::{ValidationError, validate};
