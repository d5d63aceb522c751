//! Worker error types.

use std::path::PathBuf;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("merged video not found at {0}")]
    MergedVideoNotFound(PathBuf),

    #[error("highlight file missing at {0}")]
    HighlightMissing(PathBuf),

    #[error("Media error: {0}")]
    Media(#[from] clipcast_media::MediaError),

    #[error("Persistence error: {0}")]
    Persist(#[from] clipcast_persist::PersistError),

    #[error("Storage error: {0}")]
    Storage(#[from] clipcast_storage::StorageError),

    #[error("Queue error: {0}")]
    Queue(#[from] clipcast_queue::QueueError),

    #[error("Publish error: {0}")]
    Youtube(#[from] clipcast_youtube::YoutubeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }
}
