//! Permission repository for database queries.

use super::models::{ChatStats, UserPermission};
use crate::db::DbError;
use crate::db::chats::queries::upsert_owner;
use sqlx::{SqliteConnection, SqlitePool};

/// Stored level that makes a user the chat owner.
pub const OWNER_LEVEL: i64 = 7;

type PermRow = (i64, i64, i64, i64, Option<i64>, Option<i64>);

fn from_row(row: PermRow) -> UserPermission {
    let (user_id, chat_id, level, warn_count, muted_until, banned_until) = row;
    UserPermission {
        user_id,
        chat_id,
        level,
        warn_count,
        muted_until,
        banned_until,
    }
}

/// Repository for permission operations.
pub struct PermissionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PermissionRepository<'a> {
    /// Create a new permission repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the stored record, if a row exists.
    pub async fn get(&self, user_id: i64, chat_id: i64) -> Result<Option<UserPermission>, DbError> {
        let row = sqlx::query_as::<_, PermRow>(
            r#"
            SELECT user_id, chat_id, level, warn_count, muted_until, banned_until
            FROM user_perms
            WHERE user_id = ? AND chat_id = ?
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// Get the record, falling back to the default member record.
    pub async fn get_or_default(
        &self,
        user_id: i64,
        chat_id: i64,
    ) -> Result<UserPermission, DbError> {
        Ok(self
            .get(user_id, chat_id)
            .await?
            .unwrap_or_else(|| UserPermission::default_for(user_id, chat_id)))
    }

    /// Upsert the stored level.
    ///
    /// Level 7 also records the user as chat owner; both writes commit together.
    /// The previous owner's row is left as it is.
    pub async fn set_level(&self, user_id: i64, chat_id: i64, level: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_perms (user_id, chat_id, level)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, chat_id) DO UPDATE SET level = excluded.level
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(level)
        .execute(&mut *tx)
        .await?;

        if level == OWNER_LEVEL {
            upsert_owner(&mut *tx, chat_id, user_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Add one warning and, once the count reaches `max_warns`, mute until
    /// `mute_until` (zeroing the counter when `reset` is set).
    ///
    /// Returns the count after the increment and whether the mute was
    /// applied. All writes commit together or not at all.
    pub async fn warn_and_maybe_mute(
        &self,
        user_id: i64,
        chat_id: i64,
        max_warns: i64,
        mute_until: i64,
        reset: bool,
    ) -> Result<(i64, bool), DbError> {
        let mut tx = self.pool.begin().await?;

        let count = increment_warnings(&mut *tx, user_id, chat_id).await?;

        let muted = count >= max_warns;
        if muted {
            sqlx::query(
                r#"
                UPDATE user_perms
                SET muted_until = ?,
                    warn_count = CASE WHEN ? THEN 0 ELSE warn_count END
                WHERE user_id = ? AND chat_id = ?
                "#,
            )
            .bind(mute_until)
            .bind(reset)
            .bind(user_id)
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok((count, muted))
    }

    /// Reset the warning counter. Returns the count that was cleared.
    pub async fn reset_warnings(&self, user_id: i64, chat_id: i64) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<i64> = sqlx::query_scalar(
            "SELECT warn_count FROM user_perms WHERE user_id = ? AND chat_id = ?",
        )
        .bind(user_id)
        .bind(chat_id)
        .fetch_optional(&mut *tx)
        .await?;

        sqlx::query("UPDATE user_perms SET warn_count = 0 WHERE user_id = ? AND chat_id = ?")
            .bind(user_id)
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(previous.unwrap_or(0))
    }

    /// Upsert `muted_until` (unix seconds, `None` to lift the mute).
    pub async fn set_muted_until(
        &self,
        user_id: i64,
        chat_id: i64,
        until: Option<i64>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_perms (user_id, chat_id, muted_until)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, chat_id) DO UPDATE SET muted_until = excluded.muted_until
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(until)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Upsert `banned_until` (unix seconds, `None` to lift the ban).
    pub async fn set_banned_until(
        &self,
        user_id: i64,
        chat_id: i64,
        until: Option<i64>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_perms (user_id, chat_id, banned_until)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, chat_id) DO UPDATE SET banned_until = excluded.banned_until
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(until)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Highest-level remaining user eligible to inherit ownership.
    ///
    /// Excludes `departed` and blocked users (level 0). Equal levels go to the
    /// lowest user id.
    pub async fn succession_candidate(
        &self,
        chat_id: i64,
        departed: i64,
    ) -> Result<Option<(i64, i64)>, DbError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT user_id, level
            FROM user_perms
            WHERE chat_id = ? AND user_id != ? AND level > 0
            ORDER BY level DESC, user_id ASC
            LIMIT 1
            "#,
        )
        .bind(chat_id)
        .bind(departed)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Counters for the `stats` command.
    pub async fn chat_stats(&self, chat_id: i64, now: i64) -> Result<ChatStats, DbError> {
        let (known_users, administrators, muted) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN level >= 5 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN muted_until > ? THEN 1 ELSE 0 END), 0)
            FROM user_perms
            WHERE chat_id = ?
            "#,
        )
        .bind(now)
        .bind(chat_id)
        .fetch_one(self.pool)
        .await?;

        Ok(ChatStats {
            known_users,
            administrators,
            muted,
        })
    }
}

/// Add one warning and return the new count (always >= 1).
///
/// A single upsert, so concurrent warnings for the same user never lose an
/// increment. Takes a connection so it can join the caller's transaction.
pub(crate) async fn increment_warnings(
    conn: &mut SqliteConnection,
    user_id: i64,
    chat_id: i64,
) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO user_perms (user_id, chat_id, warn_count)
        VALUES (?, ?, 1)
        ON CONFLICT(user_id, chat_id) DO UPDATE SET warn_count = warn_count + 1
        RETURNING warn_count
        "#,
    )
    .bind(user_id)
    .bind(chat_id)
    .fetch_one(conn)
    .await?;

    Ok(count)
}
