//! Permission database models.

/// Stored level of a user nobody has touched.
pub const DEFAULT_LEVEL: i64 = 2;

/// A stored permission record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPermission {
    pub user_id: i64,
    pub chat_id: i64,
    pub level: i64,
    pub warn_count: i64,
    /// Unix seconds; muted while strictly in the future.
    pub muted_until: Option<i64>,
    /// Unix seconds; banned while strictly in the future.
    pub banned_until: Option<i64>,
}

impl UserPermission {
    /// The record implied by a missing row.
    pub fn default_for(user_id: i64, chat_id: i64) -> Self {
        Self {
            user_id,
            chat_id,
            level: DEFAULT_LEVEL,
            warn_count: 0,
            muted_until: None,
            banned_until: None,
        }
    }

    /// Whether the mute window is open at `now` (unix seconds).
    pub fn is_muted_at(&self, now: i64) -> bool {
        self.muted_until.is_some_and(|until| until > now)
    }

    /// Whether the ban window is open at `now` (unix seconds).
    pub fn is_banned_at(&self, now: i64) -> bool {
        self.banned_until.is_some_and(|until| until > now)
    }
}

/// Per-chat counters for the `stats` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatStats {
    /// Users with a stored record.
    pub known_users: i64,
    /// Users at Administrator (5) or above.
    pub administrators: i64,
    /// Users whose mute window is open.
    pub muted: i64,
}
