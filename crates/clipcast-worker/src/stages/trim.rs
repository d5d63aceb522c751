//! Trim stage: cut the requested ranges into part files.

use std::path::PathBuf;

use tracing::{debug, info};

use clipcast_media::{trim_segment, StagingConfig};
use clipcast_queue::TrimJob;

use crate::context::StageContext;
use crate::error::{WorkerError, WorkerResult};

/// Trim each segment of `job` into a numbered part file.
///
/// Segments are processed in ascending position order and land as
/// `part1.mp4`, `part2.mp4`, … so playback order is recoverable by
/// filename. Trimmed paths are written back per segment when the
/// persistence collaborator is configured; its absence just skips the
/// side channel.
pub async fn run_trim(ctx: &StageContext, job: &TrimJob) -> WorkerResult<Vec<PathBuf>> {
    let trim_dir = ctx.staging.trim_dir(&job.source_id);
    StagingConfig::ensure_dir(&trim_dir).await?;

    let mut ordered = job.segments.clone();
    ordered.sort_by_key(|segment| segment.position);

    let mut produced: Vec<(Option<String>, PathBuf)> = Vec::with_capacity(ordered.len());
    for (idx, segment) in ordered.iter().enumerate() {
        segment
            .validate()
            .map_err(|e| WorkerError::job_failed(format!("invalid segment: {e}")))?;

        let output = trim_dir.join(format!("part{}.mp4", idx + 1));
        let path = trim_segment(
            ctx.runner.as_ref(),
            &job.input_path,
            segment.start_seconds,
            segment.end_seconds,
            &output,
        )
        .await?;

        produced.push((segment.id.clone(), path));
    }

    match &ctx.persist {
        Some(persist) => {
            for (segment_id, path) in &produced {
                if let Some(segment_id) = segment_id {
                    persist
                        .segments
                        .update_trimmed_path(segment_id, path)
                        .await?;
                }
            }
        }
        None => debug!("Persistence not configured; skipping trimmed-path write-back"),
    }

    info!(
        source = %job.source_id,
        parts = produced.len(),
        "Segments trimmed"
    );

    Ok(produced.into_iter().map(|(_, path)| path).collect())
}
