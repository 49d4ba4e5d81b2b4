//! Event dispatch.
//!
//! Turns inbound platform events into effects:
//! - messages: mute pre-filter, activity tracking, command routing and
//!   content filtering
//! - membership changes: ban enforcement on join, ownership succession on
//!   leave
//! - bot membership: greeting and logging
//!
//! Store failures surface as `Err`; the caller logs them and drops the event.

mod event;
mod parse;

pub use event::InboundEvent;
pub use parse::{CommandParser, ParsedCommand};

use crate::commands::{CommandHandler, CommandOutcome, CommandRequest, Effect, lookup, mention};
use crate::config::{ChatSettings, Config};
use crate::db::{Database, DbError};
use crate::filters::{ContentFilters, FilterSet};
use crate::moderation::{Denial, Level, Moderation, Succession};
use crate::telemetry::spans;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Instrument, debug, info};

/// One message event, borrowed from [`InboundEvent::Message`].
#[derive(Debug, Clone, Copy)]
struct Message<'a> {
    chat_id: i64,
    from_id: i64,
    message_id: Option<i64>,
    text: &'a str,
    chat_creator_id: Option<i64>,
    reply_from_id: Option<i64>,
}

/// Routes events to the moderation core.
pub struct Dispatcher {
    db: Database,
    core: Moderation,
    commands: CommandHandler,
    filters: Arc<FilterSet>,
    parser: CommandParser,
    chat_defaults: ChatSettings,
}

impl Dispatcher {
    /// Build every component from a validated configuration.
    ///
    /// `source` is the config file the `reload` command re-reads.
    pub fn from_config(
        db: Database,
        config: &Config,
        source: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let core = Moderation::from_config(db.clone(), config)?;
        let filters = Arc::new(FilterSet::new(ContentFilters::new(&config.filters)?, source));
        let parser = CommandParser::new(&config.bot)?;
        let commands = CommandHandler::new(
            db.clone(),
            core.clone(),
            config.chat_defaults.clone(),
            Arc::clone(&filters),
            &config.bot,
        );

        Ok(Self {
            db,
            core,
            commands,
            filters,
            parser,
            chat_defaults: config.chat_defaults.clone(),
        })
    }

    /// Handle one event now.
    pub async fn handle_event(&self, event: &InboundEvent) -> Result<Vec<Effect>, DbError> {
        self.handle_event_at(event, chrono::Utc::now().timestamp())
            .await
    }

    /// Handle one event as if at `now` (unix seconds).
    pub async fn handle_event_at(
        &self,
        event: &InboundEvent,
        now: i64,
    ) -> Result<Vec<Effect>, DbError> {
        let span = spans::event(event.kind(), event.chat_id());
        async {
            match *event {
                InboundEvent::Message {
                    chat_id,
                    from_id,
                    message_id,
                    ref text,
                    chat_creator_id,
                    reply_from_id,
                } => {
                    let message = Message {
                        chat_id,
                        from_id,
                        message_id,
                        text,
                        chat_creator_id,
                        reply_from_id,
                    };
                    self.on_message(message, now).await
                }
                InboundEvent::MemberJoined { chat_id, user_id } => {
                    self.on_member_joined(chat_id, user_id, now).await
                }
                InboundEvent::MemberLeft { chat_id, user_id } => {
                    self.on_member_left(chat_id, user_id).await
                }
                InboundEvent::BotAdded { chat_id } => self.on_bot_added(chat_id).await,
                InboundEvent::BotRemoved { chat_id } => {
                    info!(chat_id, "Bot removed from chat");
                    Ok(Vec::new())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn on_message(&self, msg: Message<'_>, now: i64) -> Result<Vec<Effect>, DbError> {
        if msg.text.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Muted senders lose every message, commands included.
        if self.core.warnings.is_muted(msg.from_id, msg.chat_id, now).await? {
            debug!(user_id = msg.from_id, "Message from muted user deleted");
            return Ok(delete(msg.chat_id, msg.message_id));
        }

        self.db
            .activity()
            .record_message(msg.from_id, msg.chat_id, now)
            .await?;

        match self.parser.parse(msg.text) {
            Some(parsed) => self.on_command(&msg, parsed, now).await,
            None => self.filter_message(&msg).await,
        }
    }

    async fn on_command(
        &self,
        msg: &Message<'_>,
        parsed: ParsedCommand<'_>,
        now: i64,
    ) -> Result<Vec<Effect>, DbError> {
        let takes_target = lookup(parsed.command, parsed.privileged).is_some_and(|s| s.takes_target);
        let (target_id, raw_args) = if takes_target {
            self.parser.split_target(parsed.args, msg.reply_from_id)
        } else {
            (None, parsed.args)
        };

        let req = CommandRequest {
            actor_id: msg.from_id,
            chat_id: msg.chat_id,
            command: parsed.command.to_string(),
            raw_args: raw_args.to_string(),
            privileged: parsed.privileged,
            target_id,
            chat_creator_id: msg.chat_creator_id,
        };

        if let Some(outcome) = self.commands.handle_at(&req, now).await? {
            return Ok(self.render(msg.chat_id, parsed.privileged, outcome));
        }
        if parsed.privileged {
            return Ok(Vec::new());
        }

        // Unknown standard command: fall back to the chat's custom replies.
        Ok(self
            .db
            .custom_commands()
            .lookup(msg.chat_id, parsed.command)
            .await?
            .map(|response| {
                debug!(command = parsed.command, "Custom command");
                vec![Effect::send(msg.chat_id, response)]
            })
            .unwrap_or_default())
    }

    /// Content filters for ordinary chat from users below Moderator.
    async fn filter_message(&self, msg: &Message<'_>) -> Result<Vec<Effect>, DbError> {
        let level = self
            .core
            .permissions
            .effective_level(msg.from_id, msg.chat_id)
            .await?;
        if level >= Level::Moderator {
            return Ok(Vec::new());
        }

        let settings = self
            .db
            .chats()
            .settings(msg.chat_id, &self.chat_defaults)
            .await?;
        let filters = self.filters.current();
        match filters.check(msg.chat_id, msg.from_id, msg.text, &settings) {
            Some(hit) => {
                info!(user_id = msg.from_id, filter = hit.as_str(), "Message removed by filter");
                Ok(delete(msg.chat_id, msg.message_id))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Turn a command outcome into effects for the chat it came from.
    fn render(&self, chat_id: i64, privileged: bool, outcome: CommandOutcome) -> Vec<Effect> {
        match outcome {
            CommandOutcome::Ok { reply, effects } => {
                let mut out = Vec::with_capacity(effects.len() + 1);
                out.push(Effect::send(chat_id, reply));
                out.extend(effects);
                out
            }
            CommandOutcome::Denied { reason, required } if privileged => {
                debug!(?reason, required = required.value(), "Developer command denied silently");
                Vec::new()
            }
            CommandOutcome::Denied { reason, required } => vec![Effect::send(
                chat_id,
                format!("Access denied: {}", Denial::new(reason, required)),
            )],
            CommandOutcome::InvalidArgs { usage } => {
                let prefix = if privileged {
                    self.parser.dev_prefix()
                } else {
                    self.parser.command_prefix()
                };
                vec![Effect::send(chat_id, format!("Usage: {}{}", prefix, usage))]
            }
        }
    }

    async fn on_member_joined(
        &self,
        chat_id: i64,
        user_id: i64,
        now: i64,
    ) -> Result<Vec<Effect>, DbError> {
        let banned = self
            .db
            .perms()
            .get(user_id, chat_id)
            .await?
            .is_some_and(|record| record.is_banned_at(now));
        if !banned {
            return Ok(Vec::new());
        }

        info!(user_id, "Banned user rejoined, removing");
        Ok(vec![Effect::RemoveMember { chat_id, user_id }])
    }

    async fn on_member_left(&self, chat_id: i64, user_id: i64) -> Result<Vec<Effect>, DbError> {
        self.filters.current().forget_user(chat_id, user_id);

        let text = match self
            .core
            .permissions
            .handle_owner_departure(chat_id, user_id)
            .await?
        {
            Succession::NotOwner => return Ok(Vec::new()),
            Succession::Promoted {
                successor,
                previous_level,
            } => format!(
                "The owner {} left the chat.\nOwnership passed to {} (was {}).",
                mention(user_id),
                mention(successor),
                previous_level
            ),
            Succession::NoCandidate => format!(
                "The owner {} left the chat and nobody is eligible to take over.",
                mention(user_id)
            ),
        };
        Ok(vec![Effect::send(chat_id, text)])
    }

    async fn on_bot_added(&self, chat_id: i64) -> Result<Vec<Effect>, DbError> {
        self.db.chats().ensure(chat_id, &self.chat_defaults).await?;
        info!(chat_id, "Bot added to chat");

        let prefix = self.parser.command_prefix();
        Ok(vec![Effect::send(
            chat_id,
            format!(
                "Hello! I'm Orbit Manager.\nThe chat owner should send {}start to activate moderation, then {}help for the command list.",
                prefix, prefix
            ),
        )])
    }
}

fn delete(chat_id: i64, message_id: Option<i64>) -> Vec<Effect> {
    message_id
        .map(|message_id| Effect::DeleteMessage {
            chat_id,
            message_id,
        })
        .into_iter()
        .collect()
}
