//! Chat database models.

/// A chat known to the bot.
#[derive(Debug, Clone)]
pub struct ChatRecord {
    pub chat_id: i64,
    /// Recorded owner. Can be stale after the owner left with no successor.
    pub owner_user_id: Option<i64>,
    /// Raw settings JSON as stored.
    pub settings: String,
    pub created_at: i64,
}
