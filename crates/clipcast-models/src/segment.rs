//! Clip segments and merge descriptors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Validation errors for segment records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("start and end must be non-negative")]
    NegativeBounds,

    #[error("end must be greater than start")]
    EmptyRange,
}

/// One trimmed sub-range of the source video.
///
/// Immutable once created, except for `trimmed_path` which the trim stage
/// populates. `position` defines playback order within a job; it is unique
/// per job but not necessarily contiguous.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Persistence-layer row ID, if the segment came from a stored record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Start of the range, seconds into the source
    pub start_seconds: f64,

    /// End of the range, seconds into the source
    pub end_seconds: f64,

    /// Playback order within the job
    pub position: u32,

    /// Path of the trimmed part, once produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trimmed_path: Option<PathBuf>,
}

impl Segment {
    /// Validate the time bounds.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.start_seconds < 0.0 || self.end_seconds < 0.0 {
            return Err(SegmentError::NegativeBounds);
        }
        if self.end_seconds <= self.start_seconds {
            return Err(SegmentError::EmptyRange);
        }
        Ok(())
    }

    /// Duration of the range in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Input descriptor for the transition merger: a trimmed file plus its
/// playback position and timing.
///
/// Duration may be carried explicitly or derived from a start/end pair;
/// callers never rely on input ordering, the merger sorts by `position`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MergeSource {
    /// Path to the trimmed part file
    pub path: PathBuf,

    /// Playback order within the job
    pub position: u32,

    /// Explicit duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Range start, used to derive duration when no explicit value is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,

    /// Range end, used to derive duration when no explicit value is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl MergeSource {
    /// Resolve the segment duration: explicit value first, else `end - start`.
    pub fn duration_secs(&self) -> Option<f64> {
        if let Some(d) = self.duration {
            return Some(d);
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64) -> Segment {
        Segment {
            id: None,
            start_seconds: start,
            end_seconds: end,
            position: 0,
            trimmed_path: None,
        }
    }

    #[test]
    fn test_validate_accepts_ordered_bounds() {
        assert!(segment(1.0, 5.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_bounds() {
        assert_eq!(
            segment(-1.0, 5.0).validate(),
            Err(SegmentError::NegativeBounds)
        );
    }

    #[test]
    fn test_validate_rejects_empty_range() {
        assert_eq!(segment(5.0, 5.0).validate(), Err(SegmentError::EmptyRange));
        assert_eq!(segment(5.0, 2.0).validate(), Err(SegmentError::EmptyRange));
    }

    #[test]
    fn test_merge_source_duration_prefers_explicit() {
        let source = MergeSource {
            path: PathBuf::from("part1.mp4"),
            position: 0,
            duration: Some(2.5),
            start: Some(0.0),
            end: Some(10.0),
        };
        assert_eq!(source.duration_secs(), Some(2.5));
    }

    #[test]
    fn test_merge_source_duration_derives_from_range() {
        let source = MergeSource {
            path: PathBuf::from("part1.mp4"),
            position: 0,
            duration: None,
            start: Some(1.0),
            end: Some(5.5),
        };
        assert_eq!(source.duration_secs(), Some(4.5));
    }

    #[test]
    fn test_merge_source_duration_missing() {
        let source = MergeSource {
            path: PathBuf::from("part1.mp4"),
            position: 0,
            duration: None,
            start: Some(1.0),
            end: None,
        };
        assert_eq!(source.duration_secs(), None);
    }
}
