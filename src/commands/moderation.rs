//! Moderation commands: WARN, UNWARN, KICK, MUTE, UNMUTE.

use super::{CommandHandler, CommandOutcome, CommandRequest, Effect};
use super::{format_time, free_text, mention};
use crate::config::{format_duration, parse_duration};
use crate::error::{ModerationError, ModerationResult};
use crate::moderation::Level;
use tracing::info;

impl CommandHandler {
    /// Handle WARN command - add a warning, auto-muting at the chat's limit.
    ///
    /// `warn @user [reason]`
    pub(super) async fn handle_warn(
        &self,
        req: &CommandRequest,
        level: Level,
        now: i64,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;
        let reason = free_text(&req.raw_args);
        let settings = self.chat_settings(req.chat_id).await?;

        let outcome = self
            .core
            .warnings
            .warn(target_id, req.chat_id, settings.max_warns, now)
            .await?;
        self.log_action(req, "warn", Some(target_id), reason).await;

        info!(
            chat_id = req.chat_id,
            actor_id = req.actor_id,
            target_id,
            count = outcome.count,
            "Warning issued"
        );

        let mut reply = format!(
            "Warning issued to {}\nBy: {}\nReason: {}\nWarnings: {}/{}",
            mention(target_id),
            mention(req.actor_id),
            reason.unwrap_or("not specified"),
            outcome.count,
            outcome.max_warns
        );
        if let Some(until) = outcome.auto_muted_until {
            self.log_action(req, "auto_mute", Some(target_id), None).await;
            reply.push_str(&format!("\nAuto-muted until {}", format_time(until)));
        }

        Ok(CommandOutcome::reply(reply))
    }

    /// Handle UNWARN command - clear the warning counter.
    pub(super) async fn handle_unwarn(
        &self,
        req: &CommandRequest,
        level: Level,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;
        let cleared = self
            .core
            .warnings
            .clear_warnings(target_id, req.chat_id)
            .await?;
        self.log_action(req, "unwarn", Some(target_id), None).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, target_id, cleared, "Warnings cleared");
        Ok(CommandOutcome::reply(format!(
            "Warnings of {} cleared (was {})",
            mention(target_id),
            cleared
        )))
    }

    /// Handle KICK command - remove a member from the chat.
    ///
    /// `kick @user [reason]`
    pub(super) async fn handle_kick(
        &self,
        req: &CommandRequest,
        level: Level,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;
        let reason = free_text(&req.raw_args);
        self.log_action(req, "kick", Some(target_id), reason).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, target_id, "Member kicked");
        Ok(CommandOutcome::with_effects(
            format!(
                "{} was kicked\nBy: {}\nReason: {}",
                mention(target_id),
                mention(req.actor_id),
                reason.unwrap_or("not specified")
            ),
            vec![Effect::RemoveMember {
                chat_id: req.chat_id,
                user_id: target_id,
            }],
        ))
    }

    /// Handle MUTE command - delete the target's messages for a while.
    ///
    /// `mute @user [duration]`; without a duration the chat's
    /// `mute_duration` applies.
    pub(super) async fn handle_mute(
        &self,
        req: &CommandRequest,
        level: Level,
        now: i64,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;

        let seconds = match req.raw_args.split_whitespace().next() {
            Some(token) => parse_duration(token)
                .map_err(|e| ModerationError::InvalidArgument(e.to_string()))?
                .num_seconds(),
            None => {
                let settings = self.chat_settings(req.chat_id).await?;
                i64::try_from(settings.mute_duration).unwrap_or(i64::MAX)
            }
        };

        let until = now.saturating_add(seconds);
        self.core
            .warnings
            .set_mute(target_id, req.chat_id, until)
            .await?;
        self.log_action(req, "mute", Some(target_id), None).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, target_id, until, "Member muted");
        let length = chrono::Duration::try_seconds(seconds)
            .map(format_duration)
            .unwrap_or_else(|| format!("{}s", seconds));
        Ok(CommandOutcome::reply(format!(
            "{} is muted for {} (until {})\nBy: {}",
            mention(target_id),
            length,
            format_time(until),
            mention(req.actor_id)
        )))
    }

    /// Handle UNMUTE command - lift a mute early.
    pub(super) async fn handle_unmute(
        &self,
        req: &CommandRequest,
        level: Level,
    ) -> ModerationResult<CommandOutcome> {
        let target_id = self.target_below(req, level).await?;
        self.core
            .warnings
            .clear_mute(target_id, req.chat_id)
            .await?;
        self.log_action(req, "unmute", Some(target_id), None).await;

        info!(chat_id = req.chat_id, actor_id = req.actor_id, target_id, "Member unmuted");
        Ok(CommandOutcome::reply(format!("{} is no longer muted", mention(target_id))))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{CommandOutcome, Effect};
    use crate::moderation::Level;

    #[tokio::test]
    async fn third_warning_auto_mutes() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;

        for count in 1..=2 {
            let outcome = run(&handler, request(1, "warn", Some(2), "flood")).await;
            let text = reply_text(&outcome);
            assert!(text.contains(&format!("Warnings: {count}/3")), "{text}");
            assert!(!text.contains("Auto-muted"));
        }

        let outcome = run(&handler, request(1, "варн", Some(2), "")).await;
        let text = reply_text(&outcome);
        assert!(text.contains("Warnings: 3/3"));
        assert!(text.contains("Auto-muted until"));

        let record = handler.db.perms().get(2, CHAT).await.unwrap().unwrap();
        assert_eq!(record.muted_until, Some(NOW + 3_600));

        let log = handler.db.action_log().recent(10).await.unwrap();
        assert_eq!(log[0].action, "auto_mute");
        assert_eq!(log[1].action, "warn");
        assert_eq!(log.len(), 4);
    }

    #[tokio::test]
    async fn warn_uses_chat_limit() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;
        let mut settings = handler.chat_settings(CHAT).await.unwrap();
        settings.max_warns = 1;
        handler.db.chats().save_settings(CHAT, &settings).await.unwrap();

        let outcome = run(&handler, request(1, "warn", Some(2), "")).await;
        assert!(reply_text(&outcome).contains("Auto-muted"));
    }

    #[tokio::test]
    async fn warn_heals_target_owner_first() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;
        grant(&handler, 7, Level::Owner).await;
        sqlx::query("DELETE FROM user_perms WHERE user_id = 7")
            .execute(handler.db.pool())
            .await
            .unwrap();

        let outcome = run(&handler, request(1, "warn", Some(7), "")).await;
        assert!(matches!(outcome, CommandOutcome::Denied { .. }));
        let record = handler.db.perms().get(7, CHAT).await.unwrap().unwrap();
        assert_eq!(record.level, 7);
        assert_eq!(record.warn_count, 0);
    }

    #[tokio::test]
    async fn unwarn_clears() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;
        run(&handler, request(1, "warn", Some(2), "")).await;
        run(&handler, request(1, "warn", Some(2), "")).await;

        let outcome = run(&handler, request(1, "unwarn", Some(2), "")).await;
        assert!(reply_text(&outcome).contains("(was 2)"));
        assert_eq!(handler.db.perms().get(2, CHAT).await.unwrap().unwrap().warn_count, 0);
    }

    #[tokio::test]
    async fn kick_emits_remove_member() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;

        let outcome = run(&handler, request(1, "кик", Some(2), "rude")).await;
        match outcome {
            CommandOutcome::Ok { reply, effects } => {
                assert!(reply.contains("Reason: rude"));
                assert_eq!(
                    effects,
                    vec![Effect::RemoveMember {
                        chat_id: CHAT,
                        user_id: 2,
                    }]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn mute_with_and_without_duration() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;

        let outcome = run(&handler, request(1, "mute", Some(2), "2ч")).await;
        assert!(reply_text(&outcome).contains("for 2h"));
        let record = handler.db.perms().get(2, CHAT).await.unwrap().unwrap();
        assert_eq!(record.muted_until, Some(NOW + 7_200));

        run(&handler, request(1, "mute", Some(3), "")).await;
        let record = handler.db.perms().get(3, CHAT).await.unwrap().unwrap();
        assert_eq!(record.muted_until, Some(NOW + 300));
    }

    #[tokio::test]
    async fn mute_rejects_bad_duration() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;

        for args in ["soon", "0", "-5m"] {
            let outcome = run(&handler, request(1, "mute", Some(2), args)).await;
            assert!(matches!(outcome, CommandOutcome::InvalidArgs { .. }), "{args}");
        }
        assert!(handler.db.perms().get(2, CHAT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unmute_lifts() {
        let handler = handler().await;
        grant(&handler, 1, Level::Moderator).await;
        run(&handler, request(1, "mute", Some(2), "1d")).await;

        run(&handler, request(1, "размут", Some(2), "")).await;
        let record = handler.db.perms().get(2, CHAT).await.unwrap().unwrap();
        assert_eq!(record.muted_until, None);
    }
}
