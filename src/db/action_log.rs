//! Moderation action log.

use crate::db::DbError;
use sqlx::SqlitePool;

/// A logged moderation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogEntry {
    pub id: i64,
    pub chat_id: i64,
    pub actor_id: i64,
    pub action: String,
    pub target_id: Option<i64>,
    pub reason: Option<String>,
    pub created_at: i64,
}

/// An action about to be logged.
#[derive(Debug, Clone, Copy)]
pub struct NewLogEntry<'e> {
    pub chat_id: i64,
    pub actor_id: i64,
    pub action: &'e str,
    pub target_id: Option<i64>,
    pub reason: Option<&'e str>,
}

/// Repository for the action log.
pub struct ActionLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ActionLogRepository<'a> {
    /// Create a new action log repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an entry stamped with the current time.
    pub async fn append(&self, entry: NewLogEntry<'_>) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO action_log (chat_id, actor_id, action, target_id, reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.chat_id)
        .bind(entry.actor_id)
        .bind(entry.action)
        .bind(entry.target_id)
        .bind(entry.reason)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Most recent entries across all chats, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ActionLogEntry>, DbError> {
        let rows = sqlx::query_as::<_, (i64, i64, i64, String, Option<i64>, Option<String>, i64)>(
            r#"
            SELECT id, chat_id, actor_id, action, target_id, reason, created_at
            FROM action_log
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, chat_id, actor_id, action, target_id, reason, created_at)| ActionLogEntry {
                    id,
                    chat_id,
                    actor_id,
                    action,
                    target_id,
                    reason,
                    created_at,
                },
            )
            .collect())
    }
}
