//! Per-chat settings.

use serde::{Deserialize, Serialize};

use super::defaults::{default_max_warns, default_mute_duration, default_true};

/// Named options stored as a JSON object on each chat row.
///
/// The `[chat_defaults]` config section supplies the values written the first
/// time a chat is seen; keys missing from a stored object fall back to those
/// defaults on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Delete messages containing configured banned words.
    #[serde(default = "default_true")]
    pub antimat: bool,
    /// Delete messages from members exceeding the flood quota.
    #[serde(default = "default_true")]
    pub antiflood: bool,
    /// Delete messages that are mostly uppercase.
    #[serde(default)]
    pub anticaps: bool,
    /// Delete messages containing links.
    #[serde(default = "default_true")]
    pub antilinks: bool,
    /// Warning count at which the auto-mute fires.
    #[serde(default = "default_max_warns")]
    pub max_warns: u32,
    /// Length of an explicit `mute` without a duration, in seconds.
    #[serde(default = "default_mute_duration")]
    pub mute_duration: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            antimat: true,
            antiflood: true,
            anticaps: false,
            antilinks: true,
            max_warns: default_max_warns(),
            mute_duration: default_mute_duration(),
        }
    }
}

/// Value accepted by [`ChatSettings::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Flag,
    Number,
}

impl ChatSettings {
    /// Setting keys in display order, with their value kind.
    pub const KEYS: [(&'static str, SettingKind); 6] = [
        ("antimat", SettingKind::Flag),
        ("antiflood", SettingKind::Flag),
        ("anticaps", SettingKind::Flag),
        ("antilinks", SettingKind::Flag),
        ("max_warns", SettingKind::Number),
        ("mute_duration", SettingKind::Number),
    ];

    /// Map a typed key, English or Russian, to its canonical name.
    pub fn canonical_key(input: &str) -> Option<&'static str> {
        let key = match input.to_lowercase().as_str() {
            "антимат" => "antimat",
            "антифлуд" => "antiflood",
            "антикапс" => "anticaps",
            "антиссылки" => "antilinks",
            "варны" => "max_warns",
            "мут" => "mute_duration",
            other => return Self::KEYS.iter().map(|(k, _)| *k).find(|k| *k == other),
        };
        Some(key)
    }

    /// Render one setting for display.
    pub fn display_value(&self, key: &str) -> Option<String> {
        let flag = |on: bool| (if on { "on" } else { "off" }).to_string();
        match key {
            "antimat" => Some(flag(self.antimat)),
            "antiflood" => Some(flag(self.antiflood)),
            "anticaps" => Some(flag(self.anticaps)),
            "antilinks" => Some(flag(self.antilinks)),
            "max_warns" => Some(self.max_warns.to_string()),
            "mute_duration" => Some(format!("{}s", self.mute_duration)),
            _ => None,
        }
    }

    /// Set one setting from user input.
    ///
    /// Flags accept `on/off`, `true/false`, `1/0` and the Russian `вкл/выкл`.
    /// Numbers must be positive integers.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let canonical = Self::canonical_key(key);
        let (key, kind) = Self::KEYS
            .iter()
            .copied()
            .find(|(k, _)| Some(*k) == canonical)
            .ok_or_else(|| format!("unknown setting '{}'", key))?;

        match kind {
            SettingKind::Flag => {
                let on = parse_flag(value)
                    .ok_or_else(|| format!("'{}' expects on or off", key))?;
                match key {
                    "antimat" => self.antimat = on,
                    "antiflood" => self.antiflood = on,
                    "anticaps" => self.anticaps = on,
                    _ => self.antilinks = on,
                }
            }
            SettingKind::Number => {
                let n: u64 = value
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("'{}' expects a positive integer", key))?;
                if key == "max_warns" {
                    self.max_warns =
                        u32::try_from(n).map_err(|_| "max_warns is too large".to_string())?;
                } else {
                    self.mute_duration = n;
                }
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" | "вкл" => Some(true),
        "off" | "false" | "0" | "no" | "выкл" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: ChatSettings = serde_json::from_str(r#"{"anticaps": true}"#).unwrap();
        assert!(settings.anticaps);
        assert!(settings.antimat);
        assert_eq!(settings.max_warns, 3);
        assert_eq!(settings.mute_duration, 300);
    }

    #[test]
    fn set_flag_and_number() {
        let mut settings = ChatSettings::default();
        settings.set("antilinks", "off").unwrap();
        settings.set("anticaps", "вкл").unwrap();
        settings.set("max_warns", "5").unwrap();
        settings.set("Антимат", "выкл").unwrap();

        assert!(!settings.antilinks);
        assert!(settings.anticaps);
        assert!(!settings.antimat);
        assert_eq!(settings.max_warns, 5);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut settings = ChatSettings::default();
        assert!(settings.set("volume", "on").is_err());
        assert!(settings.set("antimat", "maybe").is_err());
        assert!(settings.set("max_warns", "0").is_err());
        assert!(settings.set("mute_duration", "-5").is_err());
        assert_eq!(settings, ChatSettings::default());
    }

    #[test]
    fn every_key_displays() {
        let settings = ChatSettings::default();
        for (key, _) in ChatSettings::KEYS {
            assert!(settings.display_value(key).is_some(), "{key}");
        }
        assert_eq!(settings.display_value("mute_duration").as_deref(), Some("300s"));
    }
}
