//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_command_prefix() -> String {
    "!".to_string()
}

pub fn default_dev_prefix() -> String {
    "!!".to_string()
}

pub fn default_database_path() -> String {
    "data/orbit.db".to_string()
}

// =============================================================================
// Moderation Defaults
// =============================================================================

pub fn default_max_warns() -> u32 {
    3
}

pub fn default_auto_mute_duration() -> String {
    "1h".to_string()
}

/// Explicit `mute` length in seconds when no duration is given.
pub fn default_mute_duration() -> u64 {
    300
}

// =============================================================================
// Filter Defaults
// =============================================================================

pub fn default_flood_messages_per_second() -> u32 {
    2
}

pub fn default_flood_burst() -> u32 {
    5
}

pub fn default_caps_min_letters() -> usize {
    8
}

pub fn default_caps_ratio() -> f32 {
    0.7
}
