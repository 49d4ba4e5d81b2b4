//! Unified error handling for orbit-manager.
//!
//! Permission and argument errors are expected and user-facing; command
//! handlers turn them into [`CommandOutcome`](crate::commands::CommandOutcome)
//! variants. Only store failures leave a handler as an `Err`.

use crate::db::DbError;
use crate::moderation::Denial;
use thiserror::Error;

// ============================================================================
// Moderation Errors (core operations and command handlers)
// ============================================================================

/// Errors raised by core moderation operations.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("permission denied: {0}")]
    PermissionDenied(#[from] Denial),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store failure: {0}")]
    Store(#[from] DbError),
}

impl ModerationError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permission_denied",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Store(_) => "store_failure",
        }
    }
}

/// Result type for moderation operations.
pub type ModerationResult<T> = Result<T, ModerationError>;

// ============================================================================
// Transport Errors (platform boundary)
// ============================================================================

/// Errors at the chat-platform boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
