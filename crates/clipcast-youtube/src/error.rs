//! Error types for publishing operations.

use thiserror::Error;

/// Result type for publishing operations.
pub type YoutubeResult<T> = Result<T, YoutubeError>;

/// Errors that can occur during token refresh or upload.
#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token refresh failed with status {status}: {body}")]
    TokenRefreshFailed { status: u16, body: String },

    #[error("Upload initiation failed with status {status}: {body}")]
    InitiationFailed { status: u16, body: String },

    #[error("no resumable upload URL returned")]
    NoUploadUrl,

    #[error("Upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
