//! Queue-driven stage executor.

use tracing::{error, info, warn};

use clipcast_queue::{StageJob, StageQueue};

use crate::config::WorkerConfig;
use crate::context::StageContext;
use crate::error::WorkerResult;
use crate::stages;

/// Consumes stage jobs and dispatches them to their handlers.
///
/// Each stage either completes or fails atomically from the queue's point
/// of view; failures are logged loudly and the message is acknowledged —
/// cross-stage retry policy belongs to whoever enqueues, not the worker.
pub struct StageExecutor {
    config: WorkerConfig,
    context: StageContext,
    queue: StageQueue,
}

impl StageExecutor {
    /// Create a new executor.
    pub fn new(config: WorkerConfig, context: StageContext, queue: StageQueue) -> Self {
        Self {
            config,
            context,
            queue,
        }
    }

    /// Run the consume loop until the process is stopped.
    pub async fn run(&self) -> WorkerResult<()> {
        self.queue.init().await?;
        info!(consumer = %self.config.consumer_name, "Worker ready");

        loop {
            let jobs = match self
                .queue
                .consume(
                    &self.config.consumer_name,
                    self.config.poll_block.as_millis() as u64,
                    self.config.batch_size,
                )
                .await
            {
                Ok(jobs) => jobs,
                Err(e) => {
                    warn!("Consume failed: {e}");
                    tokio::time::sleep(self.config.poll_block).await;
                    continue;
                }
            };

            for (handle, job) in jobs {
                let stage = job.stage_name();
                let source = job.source_id().clone();

                match self.dispatch(job).await {
                    Ok(summary) => {
                        info!(stage, source = %source, summary, "Stage complete")
                    }
                    Err(e) => error!(stage, source = %source, "Stage failed: {e}"),
                }

                if let Err(e) = self.queue.ack(&handle).await {
                    warn!(id = %handle.id, "Failed to ack message: {e}");
                }
            }
        }
    }

    /// Route one job to its stage handler.
    async fn dispatch(&self, job: StageJob) -> WorkerResult<String> {
        match job {
            StageJob::Download(job) => stages::run_download(&self.context, &job)
                .await
                .map(|path| path.display().to_string()),
            StageJob::Trim(job) => stages::run_trim(&self.context, &job)
                .await
                .map(|parts| format!("{} parts", parts.len())),
            StageJob::Merge(job) => stages::run_merge(&self.context, &job)
                .await
                .map(|path| path.display().to_string()),
            StageJob::Highlight(job) => stages::run_highlight(&self.context, &job).await,
            StageJob::Publish(job) => {
                stages::run_publish(&self.context, &job).await.map(|result| {
                    result
                        .video_id
                        .map(|id| format!("video {id}"))
                        .unwrap_or_else(|| "uploaded".to_string())
                })
            }
        }
    }
}
