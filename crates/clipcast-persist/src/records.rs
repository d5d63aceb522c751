//! Typed mapping of dynamic REST rows.
//!
//! Rows arrive as loosely-typed JSON; this is the single place they become
//! the pipeline's typed models, with validation. Anything malformed is
//! rejected here rather than deep inside a stage.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::DateTime;
use serde_json::Value;

use clipcast_models::{ClipJob, JobId, Segment, SourceId, TokenSet, TransitionStyle};

use crate::error::{PersistError, PersistResult};

/// Convert a `clip_segments` row into a validated [`Segment`].
pub fn segment_from_record(record: &Value) -> PersistResult<Segment> {
    const TABLE: &str = "clip_segments";

    let start_seconds = record
        .get("start_seconds")
        .and_then(Value::as_f64)
        .ok_or(PersistError::malformed_record(TABLE, "start_seconds"))?;
    let end_seconds = record
        .get("end_seconds")
        .and_then(Value::as_f64)
        .ok_or(PersistError::malformed_record(TABLE, "end_seconds"))?;
    let position = record
        .get("position")
        .and_then(Value::as_u64)
        .ok_or(PersistError::malformed_record(TABLE, "position"))?
        as u32;

    let segment = Segment {
        id: record.get("id").and_then(Value::as_str).map(String::from),
        start_seconds,
        end_seconds,
        position,
        trimmed_path: record
            .get("trimmed_path")
            .and_then(Value::as_str)
            .map(PathBuf::from),
    };

    segment
        .validate()
        .map_err(|e| PersistError::invalid_record(TABLE, e.to_string()))?;

    Ok(segment)
}

/// Convert a `clip_jobs` row into a typed [`ClipJob`].
pub fn job_from_record(record: &Value) -> PersistResult<ClipJob> {
    const TABLE: &str = "clip_jobs";

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .ok_or(PersistError::malformed_record(TABLE, "id"))?;
    let user_id = record
        .get("user_id")
        .and_then(Value::as_str)
        .ok_or(PersistError::malformed_record(TABLE, "user_id"))?;
    let source_id = record
        .get("source_id")
        .and_then(Value::as_str)
        .ok_or(PersistError::malformed_record(TABLE, "source_id"))?;

    let transition = record
        .get("transition")
        .and_then(Value::as_str)
        .unwrap_or("fade");
    let transition = TransitionStyle::from_str(transition)
        .map_err(|e| PersistError::invalid_record(TABLE, e.to_string()))?;

    Ok(ClipJob {
        id: JobId::from_string(id),
        user_id: user_id.to_string(),
        source_id: SourceId::from(source_id),
        transition,
        output_url: record
            .get("output_url")
            .and_then(Value::as_str)
            .map(String::from),
        youtube_url: record
            .get("youtube_url")
            .and_then(Value::as_str)
            .map(String::from),
        created_at: record
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.to_utc()),
    })
}

/// Convert a `youtube_tokens` row into a [`TokenSet`].
pub fn tokens_from_record(record: &Value) -> PersistResult<TokenSet> {
    const TABLE: &str = "youtube_tokens";

    let access_token = record
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or(PersistError::malformed_record(TABLE, "access_token"))?;

    Ok(TokenSet {
        access_token: access_token.to_string(),
        refresh_token: record
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(String::from),
        expires_at: record
            .get("expires_at")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segment_record_maps_and_validates() {
        let record = json!({
            "id": "seg-1",
            "job_id": "job-1",
            "start_seconds": 1.0,
            "end_seconds": 5.0,
            "position": 2,
            "trimmed_path": "/tmp/part1.mp4"
        });

        let segment = segment_from_record(&record).unwrap();
        assert_eq!(segment.id.as_deref(), Some("seg-1"));
        assert_eq!(segment.position, 2);
        assert_eq!(segment.trimmed_path, Some(PathBuf::from("/tmp/part1.mp4")));
    }

    #[test]
    fn test_segment_record_missing_field() {
        let record = json!({"id": "seg-1", "start_seconds": 1.0, "position": 0});
        let err = segment_from_record(&record).unwrap_err();
        assert!(matches!(
            err,
            PersistError::MalformedRecord {
                field: "end_seconds",
                ..
            }
        ));
    }

    #[test]
    fn test_segment_record_invalid_bounds() {
        let record = json!({
            "start_seconds": 5.0,
            "end_seconds": 2.0,
            "position": 0
        });
        let err = segment_from_record(&record).unwrap_err();
        assert!(matches!(err, PersistError::InvalidRecord { .. }));
    }

    #[test]
    fn test_job_record_maps_transition() {
        let record = json!({
            "id": "job-1",
            "user_id": "user-1",
            "source_id": "abc123def45",
            "transition": "slide"
        });

        let job = job_from_record(&record).unwrap();
        assert_eq!(job.transition, TransitionStyle::Slide);
        assert_eq!(job.source_id.as_str(), "abc123def45");
    }

    #[test]
    fn test_job_record_unknown_transition_rejected() {
        let record = json!({
            "id": "job-1",
            "user_id": "user-1",
            "source_id": "abc123def45",
            "transition": "sparkle"
        });
        assert!(job_from_record(&record).is_err());
    }

    #[test]
    fn test_tokens_record_keeps_optional_fields() {
        let record = json!({
            "user_id": "user-1",
            "access_token": "tok",
        });
        let tokens = tokens_from_record(&record).unwrap();
        assert_eq!(tokens.access_token, "tok");
        assert!(tokens.refresh_token.is_none());
        assert!(tokens.expires_at.is_none());
    }
}
