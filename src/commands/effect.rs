//! Outbound instructions for the transport.

use serde::{Deserialize, Serialize};

/// Something the platform should do on the bot's behalf.
///
/// The core never calls the platform directly; handlers return effects and
/// the transport carries them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Post a message in a chat.
    SendMessage { chat_id: i64, text: String },

    /// Delete one message (muted sender, filter hit).
    DeleteMessage { chat_id: i64, message_id: i64 },

    /// Remove a member from a chat (kick, ban, banned user rejoining).
    RemoveMember { chat_id: i64, user_id: i64 },

    /// Make the bot leave a chat.
    LeaveChat { chat_id: i64 },

    /// Post a message in every chat the bot is in.
    Broadcast { text: String },
}

impl Effect {
    pub fn send(chat_id: i64, text: impl Into<String>) -> Self {
        Self::SendMessage {
            chat_id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_string(&Effect::RemoveMember {
            chat_id: 1,
            user_id: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"remove_member","chat_id":1,"user_id":2}"#);

        let effect: Effect =
            serde_json::from_str(r#"{"type":"send_message","chat_id":5,"text":"hi"}"#).unwrap();
        assert_eq!(effect, Effect::send(5, "hi"));
    }
}
