//! Error types module
//!
//! All failures surface through the `AppError` enum so every boundary renders
//! the same machine-readable shape: an HTTP status, a stable error code, and a
//! human-readable message. Nothing is swallowed silently at the boundary.

use sqlx::Error as SqlxError;
use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Requested range not satisfiable: {0}")]
    RangeNotSatisfiable(String),

    #[error("Conflicting write: {0}")]
    ConflictingWrite(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl AppError {
    /// HTTP status code to return for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Unauthenticated(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::InvalidMediaType(_) | AppError::InvalidInput(_) => 400,
            AppError::PayloadTooLarge { .. } => 413,
            AppError::NotFound(_) => 404,
            AppError::RangeNotSatisfiable(_) => 416,
            AppError::ConflictingWrite(_) | AppError::Conflict(_) => 409,
            AppError::Storage(_) => 502,
            AppError::Database(_) | AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code (e.g. "RANGE_NOT_SATISFIABLE").
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InvalidMediaType(_) => "INVALID_MEDIA_TYPE",
            AppError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RangeNotSatisfiable(_) => "RANGE_NOT_SATISFIABLE",
            AppError::ConflictingWrite(_) => "CONFLICTING_WRITE",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether internal details should be hidden from clients.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_)
        )
    }

    /// Log level for this error at the HTTP boundary.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                LogLevel::Error
            }
            AppError::ConflictingWrite(_) => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }

    /// Client-facing message. Sensitive variants get a generic message so
    /// internals never leak through the API.
    pub fn client_message(&self) -> String {
        if self.is_sensitive() {
            match self {
                AppError::Storage(_) => "Storage backend unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        }
    }
}
