//! Ownership succession when the recorded owner leaves.

use super::level::Level;
use super::permissions::PermissionModel;
use crate::db::DbError;
use tracing::{info, warn};

/// What happened to ownership after a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Succession {
    /// The departed user was not the recorded owner.
    NotOwner,
    /// `successor` now owns the chat; they previously held `previous_level`.
    Promoted {
        successor: i64,
        previous_level: Level,
    },
    /// Nobody eligible remains; the departed owner stays recorded.
    NoCandidate,
}

impl PermissionModel {
    /// Hand ownership to the highest-ranked remaining user if `departed_id`
    /// was the recorded owner.
    pub async fn handle_owner_departure(
        &self,
        chat_id: i64,
        departed_id: i64,
    ) -> Result<Succession, DbError> {
        if self.db().chats().owner(chat_id).await? != Some(departed_id) {
            return Ok(Succession::NotOwner);
        }

        let Some((successor, stored)) = self
            .db()
            .perms()
            .succession_candidate(chat_id, departed_id)
            .await?
        else {
            warn!(chat_id, departed_id, "Owner left with no eligible successor");
            return Ok(Succession::NoCandidate);
        };

        let previous_level = Level::from_stored(stored).unwrap_or_default();
        self.set_level(successor, chat_id, Level::Owner).await?;

        info!(
            chat_id,
            departed_id,
            successor,
            previous_level = previous_level.value(),
            "Ownership transferred"
        );
        Ok(Succession::Promoted {
            successor,
            previous_level,
        })
    }
}
