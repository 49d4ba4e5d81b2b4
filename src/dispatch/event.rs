//! Inbound platform events.

use serde::{Deserialize, Serialize};

/// One event from the chat platform, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message {
        chat_id: i64,
        from_id: i64,
        #[serde(default)]
        message_id: Option<i64>,
        #[serde(default)]
        text: String,
        /// Platform-reported chat creator, consulted by `start`.
        #[serde(default)]
        chat_creator_id: Option<i64>,
        /// Author of the message this one replies to.
        #[serde(default)]
        reply_from_id: Option<i64>,
    },
    MemberJoined {
        chat_id: i64,
        user_id: i64,
    },
    MemberLeft {
        chat_id: i64,
        user_id: i64,
    },
    BotAdded {
        chat_id: i64,
    },
    BotRemoved {
        chat_id: i64,
    },
}

impl InboundEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Message { chat_id, .. }
            | Self::MemberJoined { chat_id, .. }
            | Self::MemberLeft { chat_id, .. }
            | Self::BotAdded { chat_id }
            | Self::BotRemoved { chat_id } => *chat_id,
        }
    }

    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::MemberJoined { .. } => "member_joined",
            Self::MemberLeft { .. } => "member_left",
            Self::BotAdded { .. } => "bot_added",
            Self::BotRemoved { .. } => "bot_removed",
        }
    }
}
