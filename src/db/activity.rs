//! Message activity counters.
//!
//! Kept apart from `user_perms` so tracking a message never creates a
//! permission row (a row there would hide the owner self-heal).

use crate::db::DbError;
use sqlx::SqlitePool;

/// Per-(user, chat) message counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub user_id: i64,
    pub message_count: i64,
    pub last_message_at: i64,
}

/// Repository for activity counters.
pub struct ActivityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ActivityRepository<'a> {
    /// Create a new activity repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Count one message from `user_id` in `chat_id` at `now` (unix seconds).
    pub async fn record_message(&self, user_id: i64, chat_id: i64, now: i64) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO activity (user_id, chat_id, message_count, last_message_at)
            VALUES (?, ?, 1, ?)
            ON CONFLICT(user_id, chat_id) DO UPDATE SET
                message_count = message_count + 1,
                last_message_at = excluded.last_message_at
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Messages counted for one user in one chat.
    pub async fn message_count(&self, user_id: i64, chat_id: i64) -> Result<i64, DbError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT message_count FROM activity WHERE user_id = ? AND chat_id = ?",
        )
        .bind(user_id)
        .bind(chat_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    /// Most active users of a chat, busiest first.
    pub async fn top(&self, chat_id: i64, limit: i64) -> Result<Vec<ActivityRecord>, DbError> {
        let rows = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT user_id, message_count, last_message_at
            FROM activity
            WHERE chat_id = ?
            ORDER BY message_count DESC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, message_count, last_message_at)| ActivityRecord {
                user_id,
                message_count,
                last_message_at,
            })
            .collect())
    }
}
