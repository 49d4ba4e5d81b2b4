//! Administration commands: RIGHTS, BAN, UNBAN, SETTINGS.

use super::{CommandHandler, CommandOutcome, CommandRequest, Effect};
use super::{format_time, free_text, mention};
use crate::config::{ChatSettings, parse_duration};
use crate::error::{ModerationError, ModerationResult};
use crate::moderation::Level;
use std::fmt::Write as _;
use tracing::info;

impl CommandHandler {
    /// Handle RIGHTS command - change a permission level.
    ///
    /// `rights @user <0-7>`
    pub(super) async fn handle_rights(
        &self,
        req: &CommandRequest,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = req
            .target_id
            .ok_or_else(|| ModerationError::InvalidArgument("no target user".to_string()))?;
        let requested: i64 = req
            .raw_args
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| ModerationError::InvalidArgument("missing level".to_string()))?;

        let level = self
            .core
            .permissions
            .change_level(req.actor_id, target_id, req.chat_id, requested)
            .await?;
        let detail = level.value().to_string();
        self.log_action(req, "rights", Some(target_id), Some(&detail)).await;

        Ok(CommandOutcome::reply(format!(
            "Rights updated\nUser: {}\nNew level: {}",
            mention(target_id),
            level
        )))
    }

    /// Handle BAN command - remove the target and keep them out.
    ///
    /// `ban @user [duration] [reason]`. A first argument starting with a digit
    /// must be a valid duration; without one the ban is permanent.
    pub(super) async fn handle_ban(
        &self,
        req: &CommandRequest,
        level: Level,
        now: i64,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;

        let args = req.raw_args.trim();
        let (until, reason) = match args.split_once(char::is_whitespace).unwrap_or((args, "")) {
            (first, rest) if first.starts_with(|c: char| c.is_ascii_digit() || c == '-') => {
                let duration = parse_duration(first)
                    .map_err(|e| ModerationError::InvalidArgument(e.to_string()))?;
                (now.saturating_add(duration.num_seconds()), free_text(rest))
            }
            _ => (i64::MAX, free_text(args)),
        };

        self.db
            .perms()
            .set_banned_until(target_id, req.chat_id, Some(until))
            .await?;
        self.log_action(req, "ban", Some(target_id), reason).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, target_id, until, "Member banned");
        let span = if until == i64::MAX {
            "permanently".to_string()
        } else {
            format!("until {}", format_time(until))
        };
        Ok(CommandOutcome::with_effects(
            format!(
                "{} is banned {}\nBy: {}\nReason: {}",
                mention(target_id),
                span,
                mention(req.actor_id),
                reason.unwrap_or("not specified")
            ),
            vec![Effect::RemoveMember {
                chat_id: req.chat_id,
                user_id: target_id,
            }],
        ))
    }

    /// Handle UNBAN command - lift a ban.
    pub(super) async fn handle_unban(
        &self,
        req: &CommandRequest,
        level: Level,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;
        self.db
            .perms()
            .set_banned_until(target_id, req.chat_id, None)
            .await?;
        self.log_action(req, "unban", Some(target_id), None).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, target_id, "Member unbanned");
        Ok(CommandOutcome::reply(format!(
            "{} is no longer banned",
            mention(target_id)
        )))
    }

    /// Handle SETTINGS command.
    ///
    /// Without arguments lists every setting; `settings <key> <value>`
    /// changes one.
    pub(super) async fn handle_settings(
        &self,
        req: &CommandRequest,
    ) -> ModerationResult<CommandOutcome> {
        let mut settings = self.chat_settings(req.chat_id).await?;
        let mut args = req.raw_args.split_whitespace();

        let (key, value) = match (args.next(), args.next()) {
            (None, _) => return Ok(CommandOutcome::reply(self.render_settings(req, &settings))),
            (Some(key), Some(value)) => (key, value),
            (Some(_), None) => {
                return Err(ModerationError::InvalidArgument(
                    "missing value".to_string(),
                ));
            }
        };

        settings
            .set(key, value)
            .map_err(ModerationError::InvalidArgument)?;
        self.db.chats().save_settings(req.chat_id, &settings).await?;

        let name = ChatSettings::canonical_key(key).unwrap_or(key);
        let shown = settings.display_value(name).unwrap_or_default();
        let detail = format!("{}={}", name, shown);
        self.log_action(req, "settings", None, Some(&detail)).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, setting = name, value = %shown, "Setting changed");
        Ok(CommandOutcome::reply(format!("Setting {} is now {}", name, shown)))
    }

    fn render_settings(&self, req: &CommandRequest, settings: &ChatSettings) -> String {
        let mut text = format!("Settings of chat {}:", req.chat_id);
        for (key, _) in ChatSettings::KEYS {
            let _ = write!(
                text,
                "\n{}: {}",
                key,
                settings.display_value(key).unwrap_or_default()
            );
        }
        let _ = write!(
            text,
            "\n\nChange with {}settings <key> <value>, e.g. {}settings anticaps on",
            self.command_prefix, self.command_prefix
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{CommandOutcome, Effect};
    use crate::moderation::{DenialReason, Level};

    #[tokio::test]
    async fn rights_changes_level() {
        let handler = handler().await;
        grant(&handler, 1, Level::Administrator).await;

        let outcome = run(&handler, request(1, "права", Some(2), "4")).await;
        assert!(reply_text(&outcome).contains("Senior Moderator (4)"));
        assert_eq!(handler.db.perms().get(2, CHAT).await.unwrap().unwrap().level, 4);

        let log = handler.db.action_log().recent(1).await.unwrap();
        assert_eq!(log[0].reason.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn rights_refuses_grant_at_own_level() {
        let handler = handler().await;
        grant(&handler, 1, Level::Administrator).await;

        let outcome = run(&handler, request(1, "rights", Some(2), "5")).await;
        assert!(matches!(
            outcome,
            CommandOutcome::Denied {
                reason: DenialReason::AboveOwnLevel,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn rights_rejects_bad_level() {
        let handler = handler().await;
        grant(&handler, 1, Level::Owner).await;

        for args in ["", "high", "8", "999"] {
            let outcome = run(&handler, request(1, "rights", Some(2), args)).await;
            assert_eq!(
                outcome,
                CommandOutcome::InvalidArgs {
                    usage: "rights @user <0-7>".to_string(),
                },
                "{args}"
            );
        }
    }

    #[tokio::test]
    async fn owner_transfer_through_rights() {
        let handler = handler().await;
        let outcome = run(&handler, request(DEV, "rights", Some(2), "7")).await;
        assert!(matches!(outcome, CommandOutcome::Ok { .. }));
        assert_eq!(handler.db.chats().owner(CHAT).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn permanent_and_timed_bans() {
        let handler = handler().await;
        grant(&handler, 1, Level::Administrator).await;

        let outcome = run(&handler, request(1, "ban", Some(2), "spam bot")).await;
        match &outcome {
            CommandOutcome::Ok { reply, effects } => {
                assert!(reply.contains("banned permanently"));
                assert!(reply.contains("Reason: spam bot"));
                assert_eq!(
                    effects,
                    &vec![Effect::RemoveMember {
                        chat_id: CHAT,
                        user_id: 2,
                    }]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        let record = handler.db.perms().get(2, CHAT).await.unwrap().unwrap();
        assert_eq!(record.banned_until, Some(i64::MAX));

        run(&handler, request(1, "бан", Some(3), "1d raid")).await;
        let record = handler.db.perms().get(3, CHAT).await.unwrap().unwrap();
        assert_eq!(record.banned_until, Some(NOW + 86_400));

        let outcome = run(&handler, request(1, "ban", Some(4), "0 oops")).await;
        assert!(matches!(outcome, CommandOutcome::InvalidArgs { .. }));
    }

    #[tokio::test]
    async fn unban_clears() {
        let handler = handler().await;
        grant(&handler, 1, Level::Administrator).await;
        run(&handler, request(1, "ban", Some(2), "")).await;

        run(&handler, request(1, "unban", Some(2), "")).await;
        let record = handler.db.perms().get(2, CHAT).await.unwrap().unwrap();
        assert_eq!(record.banned_until, None);
    }

    #[tokio::test]
    async fn settings_show_and_change() {
        let handler = handler().await;
        grant(&handler, 1, Level::Administrator).await;

        let listing = run(&handler, request(1, "settings", None, "")).await;
        assert!(reply_text(&listing).contains("anticaps: off"));

        let outcome = run(&handler, request(1, "настройки", None, "антикапс вкл")).await;
        assert!(reply_text(&outcome).contains("anticaps is now on"));
        assert!(handler.chat_settings(CHAT).await.unwrap().anticaps);

        let outcome = run(&handler, request(1, "settings", None, "max_warns five")).await;
        assert!(matches!(outcome, CommandOutcome::InvalidArgs { .. }));
        let outcome = run(&handler, request(1, "settings", None, "max_warns")).await;
        assert!(matches!(outcome, CommandOutcome::InvalidArgs { .. }));
    }

    #[tokio::test]
    async fn settings_require_administrator() {
        let handler = handler().await;
        grant(&handler, 1, Level::SeniorModerator).await;
        let outcome = run(&handler, request(1, "settings", None, "antimat off")).await;
        assert_eq!(
            outcome,
            CommandOutcome::Denied {
                reason: DenialReason::InsufficientLevel,
                required: Level::Administrator,
            }
        );
    }
}
