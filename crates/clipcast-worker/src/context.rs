//! Shared stage context and optional-collaborator wiring.

use std::sync::Arc;

use tracing::info;

use clipcast_media::{CommandRunner, StagingConfig, SystemRunner, WatermarkConfig};
use clipcast_persist::{JobRepo, SegmentRepo, SupabaseClient, SupabaseConfig, TokenRepo};
use clipcast_storage::{ObjectStore, StorageConfig};
use clipcast_youtube::YoutubeClient;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;

/// Repositories backed by one persistence client.
#[derive(Clone)]
pub struct PersistHandles {
    pub segments: SegmentRepo,
    pub jobs: JobRepo,
    pub tokens: TokenRepo,
}

impl PersistHandles {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            segments: SegmentRepo::new(client.clone()),
            jobs: JobRepo::new(client.clone()),
            tokens: TokenRepo::new(client),
        }
    }
}

/// Everything a stage handler needs.
///
/// Persistence and object storage are optional collaborators: each use
/// site checks for presence explicitly rather than hiding the absence in
/// a no-op.
pub struct StageContext {
    pub runner: Arc<dyn CommandRunner>,
    pub staging: StagingConfig,
    pub watermark: WatermarkConfig,
    pub persist: Option<PersistHandles>,
    pub storage: Option<ObjectStore>,
    pub youtube: YoutubeClient,
    pub shorts_max_duration: u64,
}

impl StageContext {
    /// Wire up a context from the environment.
    ///
    /// Collaborators are constructed only when fully configured; a partial
    /// configuration of a required collaborator is still an error.
    pub fn from_env(config: &WorkerConfig) -> WorkerResult<Self> {
        let persist = if SupabaseConfig::configured() {
            Some(PersistHandles::new(SupabaseClient::from_env()?))
        } else {
            info!("Persistence not configured; side-channel writes disabled");
            None
        };

        let storage = if StorageConfig::configured() {
            Some(ObjectStore::from_env()?)
        } else {
            info!("Object storage not configured; highlights stay local");
            None
        };

        Ok(Self {
            runner: Arc::new(SystemRunner),
            staging: config.staging.clone(),
            watermark: config.watermark.clone(),
            persist,
            storage,
            youtube: YoutubeClient::from_env()?,
            shorts_max_duration: config.shorts_max_duration,
        })
    }
}
