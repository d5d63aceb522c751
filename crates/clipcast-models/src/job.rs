//! Highlight job identifiers and records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{SourceId, TransitionStyle};

/// Unique identifier for a highlight job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One highlight-production request.
///
/// Created by the API layer when a user submits segments; the pipeline only
/// writes back the output location fields. Stages for a single job are
/// strictly ordered, so no two stages ever mutate the same job concurrently.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClipJob {
    /// Unique job ID
    pub id: JobId,

    /// Owning user ID
    pub user_id: String,

    /// Source video the segments are cut from
    pub source_id: SourceId,

    /// Transition joining adjacent segments
    pub transition: TransitionStyle,

    /// Public location of the produced highlight, once staged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,

    /// Canonical playback URL on the publishing platform, once published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
