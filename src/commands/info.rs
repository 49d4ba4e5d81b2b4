//! Informational commands: START, HELP, PROFILE, STATS, TOP.

use super::{CommandHandler, CommandOutcome, CommandRequest, mention};
use super::{DEVELOPER_COMMANDS, STANDARD_COMMANDS, format_time};
use crate::error::ModerationResult;
use crate::moderation::{Level, check_access};
use std::fmt::Write as _;
use tracing::info;

/// Entries shown by `top`.
const TOP_LIMIT: i64 = 10;

impl CommandHandler {
    /// `start` - make sure the chat exists and record its creator as owner.
    ///
    /// An owner already on record is never replaced.
    pub(super) async fn handle_start(
        &self,
        req: &CommandRequest,
    ) -> ModerationResult<CommandOutcome> {
        self.chat_settings(req.chat_id).await?;

        let owner = match (self.db.chats().owner(req.chat_id).await?, req.chat_creator_id) {
            (Some(owner), _) => Some(owner),
            (None, Some(creator)) => {
                self.core
                    .permissions
                    .set_level(creator, req.chat_id, Level::Owner)
                    .await?;
                self.log_action(req, "start", Some(creator), None).await;
                info!(chat_id = req.chat_id, owner = creator, "Chat activated");
                Some(creator)
            }
            (None, None) => None,
        };

        let mut reply = format!(
            "Orbit Manager is active.\nUse {}help for the command list, {}settings to configure.",
            self.command_prefix, self.command_prefix
        );
        match owner {
            Some(owner) => {
                let _ = write!(reply, "\nOwner: {}", mention(owner));
            }
            None => reply.push_str("\nNo owner recorded yet."),
        }
        Ok(CommandOutcome::reply(reply))
    }

    /// `help` - commands the caller may run.
    pub(super) fn handle_help(&self, level: Level) -> CommandOutcome {
        let allowed = |required: Option<Level>| required.is_none_or(|r| check_access(level, r).is_ok());

        let mut reply = format!("Available commands ({}):", level);
        for spec in STANDARD_COMMANDS.iter().filter(|s| allowed(s.required)) {
            let _ = write!(
                reply,
                "\n{}{} ({}) - {}",
                self.command_prefix, spec.usage, spec.alias, spec.summary
            );
        }

        if level == Level::Developer {
            reply.push_str("\n\nDeveloper:");
            for spec in DEVELOPER_COMMANDS {
                let _ = write!(
                    reply,
                    "\n{}{} ({}) - {}",
                    self.dev_prefix, spec.usage, spec.alias, spec.summary
                );
            }
        }

        CommandOutcome::reply(reply)
    }

    /// `profile [@user]` - level, warnings and restrictions; defaults to the caller.
    pub(super) async fn handle_profile(
        &self,
        req: &CommandRequest,
        now: i64,
    ) -> ModerationResult<CommandOutcome> {
        let user_id = req.target_id.unwrap_or(req.actor_id);
        let level = self
            .core
            .permissions
            .effective_level(user_id, req.chat_id)
            .await?;
        let record = self.db.perms().get_or_default(user_id, req.chat_id).await?;
        let settings = self.chat_settings(req.chat_id).await?;
        let messages = self
            .db
            .activity()
            .message_count(user_id, req.chat_id)
            .await?;

        let mut reply = format!(
            "Profile of {}\nLevel: {}\nWarnings: {}/{}",
            mention(user_id),
            level,
            record.warn_count,
            settings.max_warns
        );
        match record.muted_until {
            Some(until) if record.is_muted_at(now) => {
                let _ = write!(reply, "\nMuted until {}", format_time(until));
            }
            _ => reply.push_str("\nNot muted"),
        }
        if let Some(until) = record.banned_until
            && record.is_banned_at(now)
        {
            let _ = write!(reply, "\nBanned {}", ban_span(until));
        }
        let _ = write!(reply, "\nMessages: {}", messages);

        Ok(CommandOutcome::reply(reply))
    }

    /// `stats` - known users, administrators and active mutes.
    pub(super) async fn handle_stats(
        &self,
        req: &CommandRequest,
        now: i64,
    ) -> ModerationResult<CommandOutcome> {
        let stats = self.db.perms().chat_stats(req.chat_id, now).await?;

        Ok(CommandOutcome::reply(format!(
            "Chat statistics:\nKnown users: {}\nAdministrators: {}\nMuted now: {}\nChat id: {}",
            stats.known_users, stats.administrators, stats.muted, req.chat_id
        )))
    }

    /// `top` - most active members by message count.
    pub(super) async fn handle_top(&self, req: &CommandRequest) -> ModerationResult<CommandOutcome> {
        let top = self.db.activity().top(req.chat_id, TOP_LIMIT).await?;
        if top.is_empty() {
            return Ok(CommandOutcome::reply("No activity recorded yet."));
        }

        let mut reply = String::from("Most active members:");
        for (rank, entry) in top.iter().enumerate() {
            let _ = write!(
                reply,
                "\n{}. {} - {} messages",
                rank + 1,
                mention(entry.user_id),
                entry.message_count
            );
        }
        Ok(CommandOutcome::reply(reply))
    }
}

fn ban_span(until: i64) -> String {
    if until == i64::MAX {
        "permanently".to_string()
    } else {
        format!("until {}", format_time(until))
    }
}
