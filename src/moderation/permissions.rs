//! Effective-level resolution and level-change arbitration.

use super::Developers;
use super::gate::{Denial, DenialReason};
use super::level::Level;
use crate::db::{Database, DbError};
use crate::error::{ModerationError, ModerationResult};
use tracing::{debug, info, warn};

/// Resolves and changes permission levels for one store.
#[derive(Clone)]
pub struct PermissionModel {
    db: Database,
    developers: Developers,
}

impl PermissionModel {
    pub fn new(db: Database, developers: Developers) -> Self {
        Self { db, developers }
    }

    pub(super) fn db(&self) -> &Database {
        &self.db
    }

    pub fn is_developer(&self, user_id: i64) -> bool {
        self.developers.contains(user_id)
    }

    /// Resolve the level `user_id` acts with in `chat_id`.
    ///
    /// Order: developer identity, stored row, recorded chat owner (which is
    /// written back as level 7), then the Member default without a write.
    pub async fn effective_level(&self, user_id: i64, chat_id: i64) -> Result<Level, DbError> {
        if self.is_developer(user_id) {
            return Ok(Level::Developer);
        }

        if let Some(record) = self.db.perms().get(user_id, chat_id).await? {
            return Ok(Level::from_stored(record.level).unwrap_or_else(|| {
                warn!(
                    user_id,
                    chat_id,
                    level = record.level,
                    "Stored level out of range, treating as Member"
                );
                Level::Member
            }));
        }

        if self.db.chats().owner(chat_id).await? == Some(user_id) {
            self.set_level(user_id, chat_id, Level::Owner).await?;
            info!(user_id, chat_id, "Restored missing owner level");
            return Ok(Level::Owner);
        }

        Ok(Level::Member)
    }

    /// Store `level` for `user_id`. Level 7 also records the chat owner.
    pub async fn set_level(&self, user_id: i64, chat_id: i64, level: Level) -> Result<(), DbError> {
        if level == Level::Developer {
            return Err(DbError::Internal(
                "developer level is derived, never stored".to_string(),
            ));
        }

        self.db.perms().set_level(user_id, chat_id, level.value()).await
    }

    /// Resolve both parties and check whether `actor_id` may move `target_id`
    /// to `requested`.
    pub async fn authorize_level_change(
        &self,
        actor_id: i64,
        target_id: i64,
        chat_id: i64,
        requested: Level,
    ) -> ModerationResult<()> {
        let actor = self.effective_level(actor_id, chat_id).await?;
        let target = self.effective_level(target_id, chat_id).await?;

        check_level_change(actor, target, requested).inspect_err(|denial| {
            debug!(
                actor_id,
                target_id,
                chat_id,
                requested = requested.value(),
                %denial,
                "Level change denied"
            );
        })?;

        Ok(())
    }

    /// Validate, authorize and apply a level change typed as a number.
    pub async fn change_level(
        &self,
        actor_id: i64,
        target_id: i64,
        chat_id: i64,
        requested: i64,
    ) -> ModerationResult<Level> {
        let requested = Level::from_stored(requested).ok_or_else(|| {
            ModerationError::InvalidArgument(format!("level must be 0-7, got {}", requested))
        })?;

        self.authorize_level_change(actor_id, target_id, chat_id, requested)
            .await?;
        self.set_level(target_id, chat_id, requested).await?;

        info!(
            actor_id,
            target_id,
            chat_id,
            level = requested.value(),
            "Level changed"
        );
        Ok(requested)
    }
}

/// Decide a level change from already-resolved levels. First match wins.
pub fn check_level_change(actor: Level, target: Level, requested: Level) -> Result<(), Denial> {
    let required = target.max(requested).next();

    match actor {
        Level::Developer => Ok(()),
        Level::Blocked => Err(Denial::new(DenialReason::Blocked, required)),
        actor if target >= actor => Err(Denial::new(DenialReason::TargetOutranks, required)),
        actor if requested >= actor => Err(Denial::new(DenialReason::AboveOwnLevel, required)),
        _ => Ok(()),
    }
}
