//! Error types for persistence operations.

use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur talking to the persistence service.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Malformed {table} record: missing or invalid '{field}'")]
    MalformedRecord {
        table: &'static str,
        field: &'static str,
    },

    #[error("Invalid {table} record: {reason}")]
    InvalidRecord {
        table: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn malformed_record(table: &'static str, field: &'static str) -> Self {
        Self::MalformedRecord { table, field }
    }

    pub fn invalid_record(table: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            table,
            reason: reason.into(),
        }
    }
}
