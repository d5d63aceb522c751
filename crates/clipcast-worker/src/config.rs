//! Worker configuration.

use std::time::Duration;

use clipcast_media::{StagingConfig, WatermarkConfig};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Consumer name registered with the queue's consumer group
    pub consumer_name: String,
    /// How long one consume call blocks waiting for work
    pub poll_block: Duration,
    /// Maximum jobs pulled per consume call
    pub batch_size: usize,
    /// Staging roots for the four filesystem stages
    pub staging: StagingConfig,
    /// Watermark overlay settings
    pub watermark: WatermarkConfig,
    /// Duration ceiling for shorts-mode publishes, seconds
    pub shorts_max_duration: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            consumer_name: format!("clipcast-worker-{}", uuid::Uuid::new_v4()),
            poll_block: Duration::from_secs(5),
            batch_size: 1,
            staging: StagingConfig::default(),
            watermark: WatermarkConfig::default(),
            shorts_max_duration: 60,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// Recognized: `WORKER_CONSUMER_NAME` (default: random, per process),
    /// `WORKER_POLL_BLOCK_MS` (default 5000), `WORKER_BATCH_SIZE`
    /// (default 1), `SHORTS_MAX_DURATION` (default 60), plus everything
    /// [`StagingConfig`] and [`WatermarkConfig`] recognize.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            consumer_name: std::env::var("WORKER_CONSUMER_NAME")
                .unwrap_or(defaults.consumer_name),
            poll_block: Duration::from_millis(
                std::env::var("WORKER_POLL_BLOCK_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
            batch_size: std::env::var("WORKER_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            staging: StagingConfig::from_env(),
            watermark: WatermarkConfig::from_env(),
            shorts_max_duration: std::env::var("SHORTS_MAX_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}
