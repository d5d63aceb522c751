//! Stage job payloads.
//!
//! One variant per pipeline stage. Payloads carry everything a stage needs
//! as explicit arguments — file paths and identifiers cross stage
//! boundaries through these, never through shared state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use clipcast_models::{JobId, MergeSource, Segment, SourceId, TokenSet, TransitionStyle, UploadMetadata};

/// Scheduling lane. Priority is reserved for paid-tier jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    #[default]
    Default,
    Priority,
}

/// Fetch the source container file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadJob {
    /// Source video URL
    pub source_url: String,
    /// Namespacing identifier for the staging directories
    pub source_id: SourceId,
}

/// Cut the requested ranges out of the downloaded container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimJob {
    pub source_id: SourceId,
    /// Downloaded container file
    pub input_path: PathBuf,
    /// Ranges to extract; processed in ascending position order
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

/// Join the trimmed parts into one highlight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeJob {
    pub source_id: SourceId,
    /// Trimmed parts with their playback positions and timing
    pub segments: Vec<MergeSource>,
    #[serde(default)]
    pub transition: TransitionStyle,
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

fn default_transition_duration() -> f64 {
    1.0
}

/// Stage, watermark and clean up the merged highlight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightJob {
    pub source_id: SourceId,
    /// Output of the merge stage
    pub merged_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

/// Publish the watermarked highlight to the video platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishJob {
    pub source_id: SourceId,
    /// Watermarked highlight file
    pub file_path: PathBuf,
    pub metadata: UploadMetadata,
    /// Token set captured when the stage was enqueued
    pub tokens: TokenSet,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

/// One unit of pipeline work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageJob {
    Download(DownloadJob),
    Trim(TrimJob),
    Merge(MergeJob),
    Highlight(HighlightJob),
    Publish(PublishJob),
}

impl StageJob {
    /// Stage name, for logs and metrics.
    pub fn stage_name(&self) -> &'static str {
        match self {
            StageJob::Download(_) => "download",
            StageJob::Trim(_) => "trim",
            StageJob::Merge(_) => "merge",
            StageJob::Highlight(_) => "highlight",
            StageJob::Publish(_) => "publish",
        }
    }

    /// The source this work is namespaced under.
    pub fn source_id(&self) -> &SourceId {
        match self {
            StageJob::Download(job) => &job.source_id,
            StageJob::Trim(job) => &job.source_id,
            StageJob::Merge(job) => &job.source_id,
            StageJob::Highlight(job) => &job.source_id,
            StageJob::Publish(job) => &job.source_id,
        }
    }
}
