//! Warning counter and auto-mute policy.

use crate::config::{DurationError, ModerationConfig};
use crate::db::{Database, DbError};
use tracing::info;

/// How the engine reacts when a user reaches the warning threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnPolicy {
    /// Mute length applied when the threshold is reached.
    pub auto_mute: chrono::Duration,
    /// Zero the counter once the auto-mute fires.
    pub reset_on_auto_mute: bool,
}

impl Default for WarnPolicy {
    fn default() -> Self {
        Self {
            auto_mute: chrono::Duration::hours(1),
            reset_on_auto_mute: false,
        }
    }
}

impl WarnPolicy {
    pub fn from_config(config: &ModerationConfig) -> Result<Self, DurationError> {
        Ok(Self {
            auto_mute: config.auto_mute()?,
            reset_on_auto_mute: config.reset_warns_on_auto_mute,
        })
    }
}

/// Result of issuing one warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnOutcome {
    /// Counter value right after this warning.
    pub count: i64,
    pub max_warns: u32,
    /// Set when this warning triggered the auto-mute.
    pub auto_muted_until: Option<i64>,
}

/// Warning counter and mute windows.
#[derive(Clone)]
pub struct WarningEngine {
    db: Database,
    policy: WarnPolicy,
}

impl WarningEngine {
    pub fn new(db: Database, policy: WarnPolicy) -> Self {
        Self { db, policy }
    }

    #[cfg(test)]
    pub fn policy(&self) -> &WarnPolicy {
        &self.policy
    }

    /// Add a warning and apply the auto-mute once the count reaches
    /// `max_warns`.
    ///
    /// The comparison is `>=`, so every warning past the threshold renews the
    /// mute while the counter is kept. The increment, the mute and the
    /// optional reset commit as one transaction.
    pub async fn warn(
        &self,
        target_id: i64,
        chat_id: i64,
        max_warns: u32,
        now: i64,
    ) -> Result<WarnOutcome, DbError> {
        let until = now.saturating_add(self.policy.auto_mute.num_seconds());
        let (count, muted) = self
            .db
            .perms()
            .warn_and_maybe_mute(
                target_id,
                chat_id,
                i64::from(max_warns),
                until,
                self.policy.reset_on_auto_mute,
            )
            .await?;

        if muted {
            info!(target_id, chat_id, count, until, "Auto-mute applied");
        }

        Ok(WarnOutcome {
            count,
            max_warns,
            auto_muted_until: muted.then_some(until),
        })
    }

    /// Mute until `until` (unix seconds), replacing any current window.
    pub async fn set_mute(&self, target_id: i64, chat_id: i64, until: i64) -> Result<(), DbError> {
        self.db
            .perms()
            .set_muted_until(target_id, chat_id, Some(until))
            .await
    }

    pub async fn clear_mute(&self, target_id: i64, chat_id: i64) -> Result<(), DbError> {
        self.db.perms().set_muted_until(target_id, chat_id, None).await
    }

    /// Zero the counter. Returns the count that was cleared.
    pub async fn clear_warnings(&self, target_id: i64, chat_id: i64) -> Result<i64, DbError> {
        self.db.perms().reset_warnings(target_id, chat_id).await
    }

    /// Whether the mute window is open at `now`. Expired windows stay stored.
    pub async fn is_muted(&self, user_id: i64, chat_id: i64, now: i64) -> Result<bool, DbError> {
        Ok(self
            .db
            .perms()
            .get(user_id, chat_id)
            .await?
            .is_some_and(|record| record.is_muted_at(now)))
    }
}
