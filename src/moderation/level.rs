//! The ordered role hierarchy.

use std::fmt;

/// Permission rank of a user in a chat.
///
/// Variant order is rank order, so `Ord` compares ranks. `Developer` is never
/// stored; it comes from the configured developer identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Blocked,
    Guest,
    #[default]
    Member,
    Moderator,
    SeniorModerator,
    Administrator,
    ChatLeader,
    Owner,
    Developer,
}

impl Level {
    /// Every level that can be stored or granted, lowest first.
    pub const ASSIGNABLE: [Level; 8] = [
        Level::Blocked,
        Level::Guest,
        Level::Member,
        Level::Moderator,
        Level::SeniorModerator,
        Level::Administrator,
        Level::ChatLeader,
        Level::Owner,
    ];

    /// Numeric value as stored and as typed by users.
    pub fn value(self) -> i64 {
        match self {
            Level::Developer => 999,
            other => other as i64,
        }
    }

    /// Convert a stored value. Only `0..=7` are storable.
    pub fn from_stored(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ASSIGNABLE.get(i).copied())
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Level::Blocked => "Blocked",
            Level::Guest => "Guest",
            Level::Member => "Member",
            Level::Moderator => "Moderator",
            Level::SeniorModerator => "Senior Moderator",
            Level::Administrator => "Administrator",
            Level::ChatLeader => "Chat Leader",
            Level::Owner => "Conversation Owner",
            Level::Developer => "Developer",
        }
    }

    /// The next rank up. `Developer` is its own successor.
    pub fn next(self) -> Self {
        Self::from_stored(self.value() + 1).unwrap_or(Level::Developer)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.value())
    }
}
