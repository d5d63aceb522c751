//! YouTube publishing client.

use std::path::Path;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use reqwest::{Body, Client};
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use clipcast_models::{TokenSet, UploadMetadata};

use crate::error::{YoutubeError, YoutubeResult};

/// OAuth token exchange endpoint.
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Resumable-upload initiation endpoint.
pub const UPLOAD_ENDPOINT: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status";

/// An access token within this margin of expiry is refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Token lifetime assumed when the refresh response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Publisher configuration.
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    /// OAuth client ID; refresh is skipped without it
    pub client_id: Option<String>,
    /// OAuth client secret; refresh is skipped without it
    pub client_secret: Option<String>,
    /// Token exchange endpoint
    pub token_endpoint: String,
    /// Resumable-upload initiation endpoint
    pub upload_endpoint: String,
    /// Timeout for token and initiation calls (never applied to the stream)
    pub request_timeout: StdDuration,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            upload_endpoint: UPLOAD_ENDPOINT.to_string(),
            request_timeout: StdDuration::from_secs(10),
        }
    }
}

impl YoutubeConfig {
    /// Create config from environment variables.
    ///
    /// Recognized: `YOUTUBE_CLIENT_ID` and `YOUTUBE_CLIENT_SECRET`; both
    /// are optional, but refresh requires the pair plus a refresh token.
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("YOUTUBE_CLIENT_ID").ok(),
            client_secret: std::env::var("YOUTUBE_CLIENT_SECRET").ok(),
            ..Default::default()
        }
    }
}

/// Result of one publish run.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Remote video identifier, when the session returned one
    pub video_id: Option<String>,
    /// Resumable session URL the bytes were streamed to
    pub upload_url: String,
    /// Token set actually used (refreshed when the old one was expiring)
    pub tokens: TokenSet,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    id: Option<String>,
}

/// YouTube publishing client.
pub struct YoutubeClient {
    http: Client,
    /// Separate client for the byte stream: upload duration is unbounded.
    upload_http: Client,
    config: YoutubeConfig,
}

impl YoutubeClient {
    /// Create a new client.
    pub fn new(config: YoutubeConfig) -> YoutubeResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("clipcast-youtube/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(YoutubeError::Network)?;

        let upload_http = Client::builder()
            .user_agent(concat!("clipcast-youtube/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(YoutubeError::Network)?;

        Ok(Self {
            http,
            upload_http,
            config,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> YoutubeResult<Self> {
        Self::new(YoutubeConfig::from_env())
    }

    /// Return tokens fit for an upload, refreshing when expiring.
    ///
    /// Refresh happens only when the access token expires within the
    /// 30-second margin AND client credentials plus a refresh token are all
    /// present; otherwise the existing set is used as-is.
    pub async fn ensure_fresh(&self, tokens: &TokenSet) -> YoutubeResult<TokenSet> {
        if !tokens.is_expiring_within(Duration::seconds(EXPIRY_MARGIN_SECS)) {
            return Ok(tokens.clone());
        }

        let (Some(client_id), Some(client_secret), Some(refresh_token)) = (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
            tokens.refresh_token.as_deref(),
        ) else {
            debug!("Access token expiring but refresh credentials incomplete; using as-is");
            return Ok(tokens.clone());
        };

        self.refresh_access_token(client_id, client_secret, refresh_token)
            .await
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> YoutubeResult<TokenSet> {
        info!("Refreshing expiring access token");

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::TokenRefreshFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let payload: TokenResponse = response.json().await?;
        let lifetime = payload.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

        Ok(TokenSet {
            access_token: payload.access_token,
            // The endpoint may omit the refresh token; keep the original
            refresh_token: payload
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            expires_at: Some((Utc::now() + Duration::seconds(lifetime)).to_rfc3339()),
        })
    }

    /// Initiate a resumable upload session, returning its location.
    pub async fn initiate_resumable_upload(
        &self,
        access_token: &str,
        metadata: &UploadMetadata,
    ) -> YoutubeResult<String> {
        let body = json!({
            "snippet": {
                "title": metadata.title,
                "description": metadata.description,
                "tags": metadata.effective_tags(),
            },
            "status": { "privacyStatus": metadata.privacy_status },
        });

        let response = self
            .http
            .post(&self.config.upload_endpoint)
            .bearer_auth(access_token)
            .header("X-Upload-Content-Type", "video/mp4")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::InitiationFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let upload_url = response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or(YoutubeError::NoUploadUrl)?;

        debug!(upload_url, "Resumable upload session created");
        Ok(upload_url)
    }

    /// Stream the file bytes to the upload session.
    ///
    /// No client-side timeout: large files may take arbitrarily long.
    pub async fn stream_upload(
        &self,
        upload_url: &str,
        file_path: &Path,
        access_token: &str,
    ) -> YoutubeResult<UploadOutcome> {
        let file = tokio::fs::File::open(file_path).await?;
        let size = file.metadata().await?.len();

        info!(
            file = %file_path.display(),
            size_mb = size as f64 / (1024.0 * 1024.0),
            "Streaming upload"
        );

        let response = self
            .upload_http
            .put(upload_url)
            .bearer_auth(access_token)
            .header("Content-Type", "video/mp4")
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::UploadFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await.unwrap_or_default();
        let video_id = if text.is_empty() {
            None
        } else {
            serde_json::from_str::<UploadResponse>(&text)
                .ok()
                .and_then(|r| r.id)
        };

        Ok(UploadOutcome { video_id })
    }

    /// Run the full publish protocol: token check, initiation, streaming.
    pub async fn publish(
        &self,
        file_path: &Path,
        metadata: &UploadMetadata,
        tokens: &TokenSet,
    ) -> YoutubeResult<PublishOutcome> {
        let active = self.ensure_fresh(tokens).await?;
        let upload_url = self
            .initiate_resumable_upload(&active.access_token, metadata)
            .await?;
        let uploaded = self
            .stream_upload(&upload_url, file_path, &active.access_token)
            .await?;

        Ok(PublishOutcome {
            video_id: uploaded.video_id,
            upload_url,
            tokens: active,
        })
    }
}

/// Result of streaming bytes to a session.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Remote video identifier, when the session returned one
    pub video_id: Option<String>,
}
