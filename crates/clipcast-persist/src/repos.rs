//! Per-table repositories.

use std::path::Path;

use serde_json::json;
use tracing::debug;

use clipcast_models::{ClipJob, JobId, Segment, TokenSet};

use crate::client::SupabaseClient;
use crate::error::PersistResult;
use crate::records::{job_from_record, segment_from_record, tokens_from_record};

/// Access to `clip_segments` rows.
#[derive(Clone)]
pub struct SegmentRepo {
    client: SupabaseClient,
}

impl SegmentRepo {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Write back the trimmed part path for one segment.
    pub async fn update_trimmed_path(&self, segment_id: &str, path: &Path) -> PersistResult<()> {
        debug!(segment_id, path = %path.display(), "Recording trimmed path");
        self.client
            .update(
                "clip_segments",
                "id",
                segment_id,
                &json!({ "trimmed_path": path.to_string_lossy() }),
            )
            .await
    }

    /// Fetch a job's segments in playback order.
    pub async fn segments_for_job(&self, job_id: &JobId) -> PersistResult<Vec<Segment>> {
        let rows = self
            .client
            .select("clip_segments", "job_id", job_id.as_str(), Some("position"))
            .await?;
        rows.iter().map(segment_from_record).collect()
    }
}

/// Access to `clip_jobs` rows.
#[derive(Clone)]
pub struct JobRepo {
    client: SupabaseClient,
}

impl JobRepo {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Fetch one job, if it exists.
    pub async fn fetch(&self, job_id: &JobId) -> PersistResult<Option<ClipJob>> {
        let rows = self
            .client
            .select("clip_jobs", "id", job_id.as_str(), None)
            .await?;
        rows.first().map(job_from_record).transpose()
    }

    /// Record the staged highlight's public location.
    pub async fn set_output_url(&self, job_id: &JobId, url: &str) -> PersistResult<()> {
        self.client
            .update(
                "clip_jobs",
                "id",
                job_id.as_str(),
                &json!({ "output_url": url }),
            )
            .await
    }

    /// Record the canonical playback URL after publishing.
    pub async fn set_youtube_url(&self, job_id: &JobId, url: &str) -> PersistResult<()> {
        self.client
            .update(
                "clip_jobs",
                "id",
                job_id.as_str(),
                &json!({ "youtube_url": url }),
            )
            .await
    }
}

/// Access to `youtube_tokens` rows, keyed by user.
#[derive(Clone)]
pub struct TokenRepo {
    client: SupabaseClient,
}

impl TokenRepo {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Insert or replace a user's token set.
    pub async fn upsert_tokens(&self, user_id: &str, tokens: &TokenSet) -> PersistResult<()> {
        self.client
            .upsert(
                "youtube_tokens",
                "user_id",
                &json!({
                    "user_id": user_id,
                    "access_token": tokens.access_token,
                    "refresh_token": tokens.refresh_token,
                    "expires_at": tokens.expires_at,
                }),
            )
            .await
    }

    /// Fetch a user's token set, if authorized.
    pub async fn tokens_for_user(&self, user_id: &str) -> PersistResult<Option<TokenSet>> {
        let rows = self
            .client
            .select("youtube_tokens", "user_id", user_id, None)
            .await?;
        rows.first().map(tokens_from_record).transpose()
    }
}
