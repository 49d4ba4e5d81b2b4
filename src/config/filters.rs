//! Content filter configuration.

use serde::Deserialize;

use super::defaults::{
    default_caps_min_letters, default_caps_ratio, default_flood_burst,
    default_flood_messages_per_second,
};

/// Tuning for the per-chat content filters.
///
/// Whether a filter runs at all is a chat setting; these values only shape
/// what counts as a hit.
#[derive(Debug, Clone, Deserialize)]
pub struct FiltersConfig {
    /// Words matched case-insensitively by the `antimat` filter.
    #[serde(default)]
    pub banned_words: Vec<String>,
    /// Sustained messages per second allowed per user before `antiflood` trips.
    #[serde(default = "default_flood_messages_per_second")]
    pub flood_messages_per_second: u32,
    /// Burst size on top of the sustained rate.
    #[serde(default = "default_flood_burst")]
    pub flood_burst: u32,
    /// Minimum letters before `anticaps` considers a message.
    #[serde(default = "default_caps_min_letters")]
    pub caps_min_letters: usize,
    /// Uppercase share (0.0-1.0) at which `anticaps` trips.
    #[serde(default = "default_caps_ratio")]
    pub caps_ratio: f32,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            banned_words: Vec::new(),
            flood_messages_per_second: default_flood_messages_per_second(),
            flood_burst: default_flood_burst(),
            caps_min_letters: default_caps_min_letters(),
            caps_ratio: default_caps_ratio(),
        }
    }
}
