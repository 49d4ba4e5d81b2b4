//! Command authorization gate.
//!
//! Every privileged command passes through [`PermissionModel::authorize`]
//! before it touches state.

use super::level::Level;
use super::permissions::PermissionModel;
use crate::error::ModerationResult;
use std::fmt;
use tracing::debug;

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The actor is Blocked (level 0) and may do nothing privileged.
    Blocked,
    /// The actor's level is below the command's requirement.
    InsufficientLevel,
    /// The target outranks or equals the actor.
    TargetOutranks,
    /// The actor tried to grant a level at or above their own.
    AboveOwnLevel,
}

/// A refused action, with the level that would have been enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenialReason,
    pub required: Level,
}

impl Denial {
    pub fn new(reason: DenialReason, required: Level) -> Self {
        Self { reason, required }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            DenialReason::Blocked => write!(f, "blocked users cannot use this command"),
            DenialReason::InsufficientLevel => {
                write!(f, "requires level {} or higher", self.required)
            }
            DenialReason::TargetOutranks => write!(f, "target outranks or equals actor"),
            DenialReason::AboveOwnLevel => write!(f, "cannot grant at/above own level"),
        }
    }
}

impl std::error::Error for Denial {}

/// Decide whether `level` may run something that needs `required`.
pub fn check_access(level: Level, required: Level) -> Result<(), Denial> {
    match level {
        Level::Developer => Ok(()),
        Level::Blocked => Err(Denial::new(DenialReason::Blocked, required)),
        level if level >= required => Ok(()),
        _ => Err(Denial::new(DenialReason::InsufficientLevel, required)),
    }
}

impl PermissionModel {
    /// Resolve the actor's effective level and check it against `required`.
    ///
    /// Returns the resolved level on success so callers need not look it up
    /// again.
    pub async fn authorize(
        &self,
        actor_id: i64,
        chat_id: i64,
        required: Level,
    ) -> ModerationResult<Level> {
        let level = self.effective_level(actor_id, chat_id).await?;
        check_access(level, required).inspect_err(|denial| {
            debug!(
                actor_id,
                chat_id,
                level = level.value(),
                required = required.value(),
                %denial,
                "Command denied"
            );
        })?;
        Ok(level)
    }
}
