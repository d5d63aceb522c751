//! Merge stage: join trimmed parts into one highlight.

use std::path::PathBuf;

use tracing::info;

use clipcast_media::merge_segments;
use clipcast_queue::MergeJob;

use crate::context::StageContext;
use crate::error::WorkerResult;

/// Merge the job's parts under the source's merge directory.
///
/// The output is named `<job id>.mp4` when a job id is present, else
/// `merged.mp4`.
pub async fn run_merge(ctx: &StageContext, job: &MergeJob) -> WorkerResult<PathBuf> {
    let filename = match &job.job_id {
        Some(job_id) => format!("{job_id}.mp4"),
        None => "merged.mp4".to_string(),
    };
    let output = ctx.staging.merge_dir(&job.source_id).join(filename);

    let merged = merge_segments(
        ctx.runner.as_ref(),
        &job.segments,
        job.transition,
        job.transition_duration,
        &output,
    )
    .await?;

    info!(source = %job.source_id, output = %merged.display(), "Segments merged");
    Ok(merged)
}
