//! Command handlers.
//!
//! This module contains all command handler implementations, organized into
//! submodules by functionality:
//! - [`info`]: start, help, profile, stats, top
//! - [`moderation`]: warn, unwarn, kick, mute, unmute
//! - [`admin`]: rights, ban, unban, settings
//! - [`developer`]: the `!!` namespace
//!
//! Every handler runs behind the authorization gate and returns a
//! [`CommandOutcome`]. Permission and argument errors become outcome
//! variants here; only store failures leave as `Err`.

mod admin;
mod developer;
mod effect;
mod info;
mod moderation;
mod table;

pub use effect::Effect;
pub use table::{CommandId, CommandSpec, DEVELOPER_COMMANDS, STANDARD_COMMANDS, lookup};

use crate::config::{BotConfig, ChatSettings};
use crate::db::{Database, DbError, NewLogEntry};
use crate::error::{ModerationError, ModerationResult};
use crate::filters::FilterSet;
use crate::moderation::{Denial, DenialReason, Level, Moderation};
use crate::telemetry::{CommandTimer, spans};
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

/// One parsed command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRequest {
    pub actor_id: i64,
    pub chat_id: i64,
    /// Command word as typed, without the prefix.
    pub command: String,
    /// Arguments after the command word, minus a consumed target mention.
    pub raw_args: String,
    /// Sent under the developer prefix.
    pub privileged: bool,
    pub target_id: Option<i64>,
    /// Chat creator as reported by the platform, used by `start`.
    pub chat_creator_id: Option<i64>,
}

/// Result of a command, for the dispatcher to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Ok { reply: String, effects: Vec<Effect> },
    Denied { reason: DenialReason, required: Level },
    InvalidArgs { usage: String },
}

impl CommandOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Ok {
            reply: text.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effects(text: impl Into<String>, effects: Vec<Effect>) -> Self {
        Self::Ok {
            reply: text.into(),
            effects,
        }
    }
}

/// Runs commands against the moderation core.
pub struct CommandHandler {
    pub(crate) db: Database,
    pub(crate) core: Moderation,
    pub(crate) chat_defaults: ChatSettings,
    pub(crate) filters: Arc<FilterSet>,
    pub(crate) command_prefix: String,
    pub(crate) dev_prefix: String,
}

impl CommandHandler {
    pub fn new(
        db: Database,
        core: Moderation,
        chat_defaults: ChatSettings,
        filters: Arc<FilterSet>,
        bot: &BotConfig,
    ) -> Self {
        Self {
            db,
            core,
            chat_defaults,
            filters,
            command_prefix: bot.command_prefix.clone(),
            dev_prefix: bot.dev_prefix.clone(),
        }
    }

    /// Run a command now. `Ok(None)` means the command word is unknown.
    pub async fn handle(&self, req: &CommandRequest) -> Result<Option<CommandOutcome>, DbError> {
        self.handle_at(req, chrono::Utc::now().timestamp()).await
    }

    /// Run a command as if at `now` (unix seconds).
    pub async fn handle_at(
        &self,
        req: &CommandRequest,
        now: i64,
    ) -> Result<Option<CommandOutcome>, DbError> {
        let Some(spec) = lookup(&req.command, req.privileged) else {
            debug!(command = %req.command, privileged = req.privileged, "Unknown command");
            return Ok(None);
        };

        let _timer = CommandTimer::new(spec.name);
        let span = spans::command(spec.name, req.actor_id, req.target_id);

        match self.run(spec, req, now).instrument(span).await {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                debug!(command = spec.name, error = %e, code = e.error_code(), "Command refused");
                match e {
                    ModerationError::PermissionDenied(denial) => Ok(Some(CommandOutcome::Denied {
                        reason: denial.reason,
                        required: denial.required,
                    })),
                    ModerationError::InvalidArgument(_) => Ok(Some(CommandOutcome::InvalidArgs {
                        usage: spec.usage.to_string(),
                    })),
                    ModerationError::Store(e) => Err(e),
                }
            }
        }
    }

    async fn run(
        &self,
        spec: &CommandSpec,
        req: &CommandRequest,
        now: i64,
    ) -> ModerationResult<CommandOutcome> {
        let permissions = &self.core.permissions;
        let level = match spec.required {
            Some(required) => permissions.authorize(req.actor_id, req.chat_id, required).await?,
            None => permissions.effective_level(req.actor_id, req.chat_id).await?,
        };

        match spec.id {
            CommandId::Start => self.handle_start(req).await,
            CommandId::Help => Ok(self.handle_help(level)),
            CommandId::Profile => self.handle_profile(req, now).await,
            CommandId::Stats => self.handle_stats(req, now).await,
            CommandId::Top => self.handle_top(req).await,
            CommandId::Warn => self.handle_warn(req, level, now).await,
            CommandId::Unwarn => self.handle_unwarn(req, level).await,
            CommandId::Kick => self.handle_kick(req, level).await,
            CommandId::Mute => self.handle_mute(req, level, now).await,
            CommandId::Unmute => self.handle_unmute(req, level).await,
            CommandId::Rights => self.handle_rights(req).await,
            CommandId::Ban => self.handle_ban(req, level, now).await,
            CommandId::Unban => self.handle_unban(req, level).await,
            CommandId::Settings => self.handle_settings(req).await,
            CommandId::Reload => Ok(self.handle_reload()),
            CommandId::Leave => self.handle_leave(req).await,
            CommandId::Global => self.handle_global(req).await,
            CommandId::Logs => self.handle_logs(req).await,
        }
    }

    // ========== Helper methods shared by handlers ==========

    /// Resolve the target and refuse when they rank at or above the actor.
    ///
    /// Resolving first also restores a missing owner row before any write
    /// creates a default one.
    pub(crate) async fn target_below(
        &self,
        req: &CommandRequest,
        actor: Level,
    ) -> ModerationResult<i64> {
        let target_id = req
            .target_id
            .ok_or_else(|| ModerationError::InvalidArgument("no target user".to_string()))?;

        let target = self
            .core
            .permissions
            .effective_level(target_id, req.chat_id)
            .await?;
        if actor != Level::Developer && target >= actor {
            return Err(Denial::new(DenialReason::TargetOutranks, target.next()).into());
        }

        Ok(target_id)
    }

    pub(crate) async fn chat_settings(&self, chat_id: i64) -> Result<ChatSettings, DbError> {
        self.db.chats().settings(chat_id, &self.chat_defaults).await
    }

    /// Append to the action log after the action itself has committed.
    ///
    /// Best-effort: a failed append is logged and the command still succeeds.
    pub(crate) async fn log_action(
        &self,
        req: &CommandRequest,
        action: &str,
        target_id: Option<i64>,
        reason: Option<&str>,
    ) {
        let entry = NewLogEntry {
            chat_id: req.chat_id,
            actor_id: req.actor_id,
            action,
            target_id,
            reason,
        };
        if let Err(e) = self.db.action_log().append(entry).await {
            warn!(
                chat_id = req.chat_id,
                action,
                error = %e,
                code = e.error_code(),
                "Action log append failed"
            );
        }
    }
}

/// Platform mention markup for a user.
pub(crate) fn mention(user_id: i64) -> String {
    format!("[id{0}|id{0}]", user_id)
}

/// Render unix seconds for replies. `i64::MAX` marks a permanent restriction.
pub(crate) fn format_time(timestamp: i64) -> String {
    if timestamp == i64::MAX {
        return "permanently".to_string();
    }
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Trimmed free text, or `None` when blank.
pub(crate) fn free_text(args: &str) -> Option<&str> {
    let text = args.trim();
    (!text.is_empty()).then_some(text)
}
