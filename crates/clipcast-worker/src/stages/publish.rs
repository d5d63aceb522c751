//! Publish stage: token-aware resumable upload plus write-back.

use tracing::{debug, info};

use clipcast_queue::PublishJob;

use crate::context::StageContext;
use crate::error::{WorkerError, WorkerResult};

/// Outcome of a publish run.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Remote video identifier, when the platform returned one
    pub video_id: Option<String>,
    /// Resumable session URL that received the bytes
    pub upload_url: String,
}

/// Publish the watermarked highlight.
///
/// Precondition: the file must exist before any network call. The client
/// refreshes the token set if it is about to expire; afterwards the
/// (possibly refreshed) tokens are upserted and, when a job id was
/// supplied, the canonical playback URL is recorded.
pub async fn run_publish(ctx: &StageContext, job: &PublishJob) -> WorkerResult<PublishResult> {
    if !job.file_path.exists() {
        return Err(WorkerError::HighlightMissing(job.file_path.clone()));
    }

    if job.metadata.shorts_mode {
        debug!(
            ceiling_secs = ctx.shorts_max_duration,
            "Publishing in shorts mode"
        );
    }

    let outcome = ctx
        .youtube
        .publish(&job.file_path, &job.metadata, &job.tokens)
        .await?;

    match &ctx.persist {
        Some(persist) => {
            persist
                .tokens
                .upsert_tokens(&job.user_id, &outcome.tokens)
                .await?;

            if let (Some(job_id), Some(video_id)) = (&job.job_id, &outcome.video_id) {
                persist
                    .jobs
                    .set_youtube_url(job_id, &format!("https://youtu.be/{video_id}"))
                    .await?;
            }
        }
        None => debug!("Persistence not configured; skipping token and URL write-back"),
    }

    info!(
        source = %job.source_id,
        video_id = ?outcome.video_id,
        "Highlight published"
    );

    Ok(PublishResult {
        video_id: outcome.video_id,
        upload_url: outcome.upload_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PersistHandles, StageContext};
    use crate::stages::testing::{context_with, StubRunner};
    use clipcast_models::{JobId, SourceId, TokenSet, UploadMetadata};
    use clipcast_persist::{SupabaseClient, SupabaseConfig};
    use clipcast_youtube::{YoutubeClient, YoutubeConfig};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publish_job(file_path: PathBuf) -> PublishJob {
        PublishJob {
            source_id: SourceId::from("abc123"),
            file_path,
            metadata: UploadMetadata {
                title: "Test".to_string(),
                ..Default::default()
            },
            tokens: TokenSet {
                access_token: "token".to_string(),
                refresh_token: Some("refresh".to_string()),
                expires_at: Some((chrono_now_plus_hour()).to_rfc3339()),
            },
            user_id: "user-1".to_string(),
            job_id: Some(JobId::from_string("job-1")),
        }
    }

    fn chrono_now_plus_hour() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now() + chrono::Duration::hours(1)
    }

    async fn youtube_for(server: &MockServer) -> YoutubeClient {
        Mock::given(method("POST"))
            .and(path("/upload/videos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Location", format!("{}/session", server.uri()).as_str()),
            )
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "yt123"
            })))
            .mount(server)
            .await;

        YoutubeClient::new(YoutubeConfig {
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            token_endpoint: format!("{}/token", server.uri()),
            upload_endpoint: format!("{}/upload/videos", server.uri()),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn persist_for(server: &MockServer) -> PersistHandles {
        PersistHandles::new(
            SupabaseClient::new(SupabaseConfig {
                base_url: server.uri(),
                service_key: "key".to_string(),
                timeout: Duration::from_secs(5),
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_publish_uploads_and_persists_results() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("highlight.mp4");
        std::fs::write(&file, b"video-bytes").unwrap();

        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/youtube_tokens"))
            .and(query_param("on_conflict", "user_id"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/clip_jobs"))
            .and(query_param("id", "eq.job-1"))
            .and(body_string_contains("https://youtu.be/yt123"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let runner = Arc::new(StubRunner::default());
        let ctx = StageContext {
            persist: Some(persist_for(&server)),
            youtube: youtube_for(&server).await,
            ..context_with(runner, dir.path())
        };

        let result = run_publish(&ctx, &publish_job(file)).await.unwrap();
        assert_eq!(result.video_id.as_deref(), Some("yt123"));
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_any_network_call() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let runner = Arc::new(StubRunner::default());
        let ctx = StageContext {
            youtube: youtube_for(&server).await,
            ..context_with(runner, dir.path())
        };

        let err = run_publish(&ctx, &publish_job(dir.path().join("missing.mp4")))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::HighlightMissing(_)));
    }

    #[tokio::test]
    async fn test_publish_without_persistence_still_succeeds() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("highlight.mp4");
        std::fs::write(&file, b"video-bytes").unwrap();

        let server = MockServer::start().await;
        let runner = Arc::new(StubRunner::default());
        let ctx = StageContext {
            youtube: youtube_for(&server).await,
            ..context_with(runner, dir.path())
        };

        let result = run_publish(&ctx, &publish_job(file)).await.unwrap();
        assert_eq!(result.video_id.as_deref(), Some("yt123"));
    }
}
