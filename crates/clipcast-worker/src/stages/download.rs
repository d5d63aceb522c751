//! Download stage: fetch the source container.

use std::path::PathBuf;

use tracing::info;

use clipcast_media::{download_source, StagingConfig};
use clipcast_queue::DownloadJob;

use crate::context::StageContext;
use crate::error::WorkerResult;

/// Deposit the source video at its deterministic staging path.
pub async fn run_download(ctx: &StageContext, job: &DownloadJob) -> WorkerResult<PathBuf> {
    let dir = ctx.staging.download_dir(&job.source_id);
    StagingConfig::ensure_dir(&dir).await?;

    let template = ctx.staging.source_template(&job.source_id);
    let expected = ctx.staging.source_file(&job.source_id);

    let path = download_source(ctx.runner.as_ref(), &job.source_url, &template, &expected).await?;

    info!(source = %job.source_id, path = %path.display(), "Source downloaded");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::testing::{context_with, StubRunner};
    use clipcast_models::SourceId;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_download_lands_at_deterministic_path() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(StubRunner::default());
        let ctx = context_with(runner, dir.path());

        let job = DownloadJob {
            source_url: "https://youtu.be/abc123def45".to_string(),
            source_id: SourceId::from("abc123def45"),
        };

        let path = run_download(&ctx, &job).await.unwrap();
        assert_eq!(
            path,
            ctx.staging.source_file(&job.source_id),
            "downloaded file must land at the documented path"
        );
        assert!(path.exists());
    }
}
