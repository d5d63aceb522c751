//! Highlight stage: stage, watermark, upload, clean up.

use std::path::Path;

use tracing::{debug, info};

use clipcast_media::{apply_watermark, StagingConfig};
use clipcast_queue::HighlightJob;

use crate::context::StageContext;
use crate::error::{WorkerError, WorkerResult};

/// Produce the terminal highlight artifact for a job.
///
/// Copies the merged file into the per-source output area, applies the
/// watermark, uploads when an object store is configured, and always
/// deletes the download/trim/merge staging directories afterwards — a
/// failed upload cannot be retried from the merged file, by design.
/// Returns the public URL if uploaded, else the local watermarked path.
pub async fn run_highlight(ctx: &StageContext, job: &HighlightJob) -> WorkerResult<String> {
    if !job.merged_path.exists() {
        return Err(WorkerError::MergedVideoNotFound(job.merged_path.clone()));
    }

    let dir = ctx.staging.highlight_dir(&job.source_id);
    StagingConfig::ensure_dir(&dir).await?;

    let basename = match &job.job_id {
        Some(job_id) => job_id.as_str(),
        None => job.source_id.as_str(),
    };
    let staged = dir.join(format!("{basename}_highlight.mp4"));
    tokio::fs::copy(&job.merged_path, &staged).await?;

    let watermarked = apply_watermark(ctx.runner.as_ref(), &staged, &ctx.watermark).await?;

    // Upload result is held until after cleanup: intermediate artifacts go
    // away once the highlight exists, whether or not the upload worked.
    let upload_result = upload_and_record(ctx, job, &watermarked).await;

    ctx.staging.cleanup_intermediates(&job.source_id).await;

    let public_url = upload_result?;

    let location = public_url.unwrap_or_else(|| watermarked.to_string_lossy().to_string());
    info!(source = %job.source_id, location, "Highlight staged");
    Ok(location)
}

/// Push the watermarked file to object storage and record its URL.
async fn upload_and_record(
    ctx: &StageContext,
    job: &HighlightJob,
    watermarked: &Path,
) -> WorkerResult<Option<String>> {
    let Some(storage) = &ctx.storage else {
        debug!("Object storage not configured; highlight stays local");
        return Ok(None);
    };

    let filename = watermarked
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "highlight.mp4".to_string());

    let url = storage
        .upload_highlight(watermarked, job.source_id.as_str(), &filename)
        .await?;

    match (&ctx.persist, &job.job_id) {
        (Some(persist), Some(job_id)) => persist.jobs.set_output_url(job_id, &url).await?,
        _ => debug!("No persistence or job id; output URL not recorded"),
    }

    Ok(Some(url))
}
