//! Chat repository for database queries.

use super::models::ChatRecord;
use crate::config::ChatSettings;
use crate::db::DbError;
use sqlx::{SqliteConnection, SqlitePool};

/// Repository for chat operations.
pub struct ChatRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ChatRepository<'a> {
    /// Create a new chat repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a chat by id.
    pub async fn find(&self, chat_id: i64) -> Result<Option<ChatRecord>, DbError> {
        let row = sqlx::query_as::<_, (i64, Option<i64>, String, i64)>(
            r#"
            SELECT chat_id, owner_user_id, settings, created_at
            FROM chats
            WHERE chat_id = ?
            "#,
        )
        .bind(chat_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(
            |(chat_id, owner_user_id, settings, created_at)| ChatRecord {
                chat_id,
                owner_user_id,
                settings,
                created_at,
            },
        ))
    }

    /// Recorded owner of a chat, if any.
    pub async fn owner(&self, chat_id: i64) -> Result<Option<i64>, DbError> {
        Ok(self.find(chat_id).await?.and_then(|c| c.owner_user_id))
    }

    /// Get a chat, creating it with `defaults` as its settings if absent.
    pub async fn ensure(
        &self,
        chat_id: i64,
        defaults: &ChatSettings,
    ) -> Result<ChatRecord, DbError> {
        let settings = serde_json::to_string(defaults)
            .map_err(|source| DbError::Settings { chat_id, source })?;
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO chats (chat_id, owner_user_id, settings, created_at)
            VALUES (?, NULL, ?, ?)
            ON CONFLICT(chat_id) DO NOTHING
            "#,
        )
        .bind(chat_id)
        .bind(&settings)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.find(chat_id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("chat {} vanished after insert", chat_id)))
    }

    /// Effective settings of a chat.
    ///
    /// Creates the chat on first access. Keys missing from the stored object
    /// take their value from `defaults`.
    pub async fn settings(
        &self,
        chat_id: i64,
        defaults: &ChatSettings,
    ) -> Result<ChatSettings, DbError> {
        let record = self.ensure(chat_id, defaults).await?;
        merge_settings(chat_id, &record.settings, defaults)
    }

    /// Replace the stored settings of a chat.
    pub async fn save_settings(
        &self,
        chat_id: i64,
        settings: &ChatSettings,
    ) -> Result<(), DbError> {
        let json = serde_json::to_string(settings)
            .map_err(|source| DbError::Settings { chat_id, source })?;
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO chats (chat_id, owner_user_id, settings, created_at)
            VALUES (?, NULL, ?, ?)
            ON CONFLICT(chat_id) DO UPDATE SET settings = excluded.settings
            "#,
        )
        .bind(chat_id)
        .bind(json)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

/// Record `owner_user_id` on a chat, creating the row if needed.
///
/// Takes a connection so it can join the caller's transaction.
pub(crate) async fn upsert_owner(
    conn: &mut SqliteConnection,
    chat_id: i64,
    owner_user_id: i64,
) -> Result<(), DbError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO chats (chat_id, owner_user_id, settings, created_at)
        VALUES (?, ?, '{}', ?)
        ON CONFLICT(chat_id) DO UPDATE SET owner_user_id = excluded.owner_user_id
        "#,
    )
    .bind(chat_id)
    .bind(owner_user_id)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}

fn merge_settings(
    chat_id: i64,
    stored: &str,
    defaults: &ChatSettings,
) -> Result<ChatSettings, DbError> {
    let wrap = |source| DbError::Settings { chat_id, source };

    let mut merged = serde_json::to_value(defaults).map_err(wrap)?;
    let stored: serde_json::Value = serde_json::from_str(stored).map_err(wrap)?;

    if let (Some(base), serde_json::Value::Object(overrides)) = (merged.as_object_mut(), stored)
    {
        base.extend(overrides);
    }

    serde_json::from_value(merged).map_err(wrap)
}
