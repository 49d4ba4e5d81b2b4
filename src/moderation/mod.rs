//! Core moderation: role hierarchy, warnings, succession and the command gate.
//!
//! Everything here works on plain ids and a [`Database`] handle; the
//! dispatcher and command handlers decide what the results mean for the chat.

mod gate;
mod level;
mod permissions;
mod succession;
mod warnings;

pub use gate::{Denial, DenialReason, check_access};
pub use level::Level;
pub use permissions::PermissionModel;
pub use succession::Succession;
pub use warnings::{WarnPolicy, WarningEngine};

use crate::config::{Config, DurationError};
use crate::db::Database;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Platform user ids that always resolve to [`Level::Developer`].
#[derive(Debug, Clone, Default)]
pub struct Developers(Arc<HashSet<i64>>);

impl Developers {
    pub fn contains(&self, user_id: i64) -> bool {
        self.0.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashSet<i64>> for Developers {
    fn from(ids: HashSet<i64>) -> Self {
        Self(Arc::new(ids))
    }
}

impl FromIterator<i64> for Developers {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

/// The core services, sharing one store.
#[derive(Clone)]
pub struct Moderation {
    pub permissions: PermissionModel,
    pub warnings: WarningEngine,
}

impl Moderation {
    pub fn new(permissions: PermissionModel, warnings: WarningEngine) -> Self {
        Self {
            permissions,
            warnings,
        }
    }

    /// Build the services from a validated configuration.
    pub fn from_config(db: Database, config: &Config) -> Result<Self, DurationError> {
        let developers = Developers::from(config.bot.developers.clone());
        let policy = WarnPolicy::from_config(&config.moderation)?;

        if developers.is_empty() {
            warn!("No developers configured, developer commands are unreachable");
        }
        info!(
            developers = developers.len(),
            auto_mute_secs = policy.auto_mute.num_seconds(),
            reset_on_auto_mute = policy.reset_on_auto_mute,
            "Moderation core ready"
        );

        Ok(Self::new(
            PermissionModel::new(db.clone(), developers),
            WarningEngine::new(db, policy),
        ))
    }
}
