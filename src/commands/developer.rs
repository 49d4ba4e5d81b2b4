//! Developer commands: RELOAD, LEAVE, GLOBAL, LOGS.

use super::{CommandHandler, CommandOutcome, CommandRequest, Effect};
use super::{format_time, free_text};
use crate::error::{ModerationError, ModerationResult};
use std::fmt::Write as _;
use tracing::{info, warn};

/// Entries shown by `logs` without a count, and the most it will show.
const LOGS_DEFAULT: i64 = 10;
const LOGS_MAX: i64 = 50;

impl CommandHandler {
    /// Handle RELOAD command - rebuild the content filters from config.
    pub(super) fn handle_reload(&self) -> CommandOutcome {
        match self.filters.reload() {
            Ok(words) => {
                info!("Reload completed");
                CommandOutcome::reply(format!("Reload complete: {} banned words loaded", words))
            }
            Err(e) => {
                warn!(error = %e, "Reload failed, keeping previous filters");
                CommandOutcome::reply(format!("Reload failed: {}", e))
            }
        }
    }

    /// Handle LEAVE command - make the bot leave a chat.
    ///
    /// `leave <chat_id>`
    pub(super) async fn handle_leave(
        &self,
        req: &CommandRequest,
    ) -> ModerationResult<CommandOutcome> {
        let chat_id: i64 = req
            .raw_args
            .trim()
            .parse()
            .map_err(|_| ModerationError::InvalidArgument("chat id expected".to_string()))?;
        self.log_action(req, "leave", None, Some(&chat_id.to_string())).await;

        info!(actor_id = req.actor_id, target_chat = chat_id, "Leaving chat on request");
        Ok(CommandOutcome::with_effects(
            format!("Leaving chat {}", chat_id),
            vec![Effect::LeaveChat { chat_id }],
        ))
    }

    /// Handle GLOBAL command - broadcast to every chat.
    ///
    /// `global <text>`
    pub(super) async fn handle_global(
        &self,
        req: &CommandRequest,
    ) -> ModerationResult<CommandOutcome> {
        let text = free_text(&req.raw_args)
            .ok_or_else(|| ModerationError::InvalidArgument("empty broadcast".to_string()))?;
        self.log_action(req, "global", None, Some(text)).await;

        info!(actor_id = req.actor_id, "Global broadcast queued");
        Ok(CommandOutcome::with_effects(
            "Broadcast queued",
            vec![Effect::Broadcast {
                text: text.to_string(),
            }],
        ))
    }

    /// Handle LOGS command - recent moderation actions across all chats.
    ///
    /// `logs [count]`, default 10, at most 50.
    pub(super) async fn handle_logs(&self, req: &CommandRequest) -> ModerationResult<CommandOutcome> {
        let limit = match free_text(&req.raw_args) {
            None => LOGS_DEFAULT,
            Some(arg) => arg
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ModerationError::InvalidArgument("count expected".to_string()))?
                .min(LOGS_MAX),
        };

        let entries = self.db.action_log().recent(limit).await?;
        if entries.is_empty() {
            return Ok(CommandOutcome::reply("Action log is empty."));
        }

        let mut reply = format!("Last {} actions:", entries.len());
        for entry in &entries {
            let _ = write!(
                reply,
                "\n#{} {} chat {} by {}: {}",
                entry.id,
                format_time(entry.created_at),
                entry.chat_id,
                entry.actor_id,
                entry.action
            );
            if let Some(target) = entry.target_id {
                let _ = write!(reply, " -> {}", target);
            }
            if let Some(reason) = &entry.reason {
                let _ = write!(reply, " ({})", reason);
            }
        }
        Ok(CommandOutcome::reply(reply))
    }
}
