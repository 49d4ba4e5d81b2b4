//! Database module for persistent storage.
//!
//! Provides async SQLite database access using SQLx for:
//! - Chat records (owner, settings)
//! - Per-chat user permissions (level, warnings, mute and ban windows)
//! - Message activity counters
//! - The moderation action log
//! - Per-chat custom command replies

mod action_log;
mod activity;
mod chats;
mod custom_commands;
mod perms;

pub use action_log::{ActionLogEntry, ActionLogRepository, NewLogEntry};
pub use activity::{ActivityRecord, ActivityRepository};
pub use chats::{ChatRecord, ChatRepository};
pub use custom_commands::CustomCommandRepository;
pub use perms::{ChatStats, PermissionRepository, UserPermission};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("malformed chat settings for chat {chat_id}: {source}")]
    Settings {
        chat_id: i64,
        source: serde_json::Error,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlx(_) => "sqlx",
            Self::Migration(_) => "migration",
            Self::Settings { .. } => "settings",
            Self::Internal(_) => "internal",
        }
    }
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - keeps a stuck writer from blocking a command forever.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a new database connection, running migrations if needed.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let pool = if path == ":memory:" {
            // `file::memory:` is shared by every caller in the process, which
            // makes parallel tests trample each other. Name each one.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:orbit-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);

            // The database lives only as long as one connection stays open.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(None)
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .busy_timeout(Self::ACQUIRE_TIMEOUT);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        Self::run_migrations(&pool).await?;

        // WAL lets command reads proceed while a warning increment is committing.
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await?;

        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&pool)
            .await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Internal(format!(
                "integrity check failed: {}",
                integrity_result
            )));
        }

        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }

    /// Get chat repository.
    pub fn chats(&self) -> ChatRepository<'_> {
        ChatRepository::new(&self.pool)
    }

    /// Get permission repository.
    pub fn perms(&self) -> PermissionRepository<'_> {
        PermissionRepository::new(&self.pool)
    }

    /// Get activity repository.
    pub fn activity(&self) -> ActivityRepository<'_> {
        ActivityRepository::new(&self.pool)
    }

    /// Get action log repository.
    pub fn action_log(&self) -> ActionLogRepository<'_> {
        ActionLogRepository::new(&self.pool)
    }

    /// Get custom command repository.
    pub fn custom_commands(&self) -> CustomCommandRepository<'_> {
        CustomCommandRepository::new(&self.pool)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}
