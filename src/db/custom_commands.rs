//! Per-chat custom commands.

use crate::db::DbError;
use sqlx::SqlitePool;

/// Repository for custom command replies.
pub struct CustomCommandRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomCommandRepository<'a> {
    /// Create a new custom command repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored response for `command` in `chat_id`. Matching ignores case.
    pub async fn lookup(&self, chat_id: i64, command: &str) -> Result<Option<String>, DbError> {
        let response = sqlx::query_scalar(
            "SELECT response FROM custom_commands WHERE chat_id = ? AND command = ?",
        )
        .bind(chat_id)
        .bind(command.to_lowercase())
        .fetch_optional(self.pool)
        .await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    async fn insert(db: &Database, chat_id: i64, command: &str, response: &str) {
        sqlx::query(
            r#"
            INSERT INTO custom_commands (chat_id, command, response, created_by, created_at)
            VALUES (?, ?, ?, 1, 0)
            "#,
        )
        .bind(chat_id)
        .bind(command)
        .bind(response)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn lookup_is_per_chat() {
        let db = Database::new(":memory:").await.unwrap();
        insert(&db, 10, "rules", "Be nice.").await;

        assert_eq!(
            db.custom_commands().lookup(10, "rules").await.unwrap().as_deref(),
            Some("Be nice.")
        );
        assert_eq!(
            db.custom_commands().lookup(10, "RULES").await.unwrap().as_deref(),
            Some("Be nice.")
        );
        assert_eq!(db.custom_commands().lookup(11, "rules").await.unwrap(), None);
        assert_eq!(db.custom_commands().lookup(10, "faq").await.unwrap(), None);
    }
}
