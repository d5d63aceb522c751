//! R2 client implementation.

use std::path::Path;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Configuration for the object store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket holding published highlights
    pub bucket: String,
    /// Region (usually "auto" for R2)
    pub region: String,
    /// Base URL public objects are served from
    pub public_base_url: String,
}

impl StorageConfig {
    /// Create config from environment variables.
    ///
    /// Requires `R2_ENDPOINT_URL`, `R2_ACCESS_KEY_ID`,
    /// `R2_SECRET_ACCESS_KEY`, `MEDIA_BUCKET` and `R2_PUBLIC_BASE_URL`;
    /// `R2_REGION` defaults to `auto`.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: require_env("R2_ENDPOINT_URL")?,
            access_key_id: require_env("R2_ACCESS_KEY_ID")?,
            secret_access_key: require_env("R2_SECRET_ACCESS_KEY")?,
            bucket: require_env("MEDIA_BUCKET")?,
            region: std::env::var("R2_REGION").unwrap_or_else(|_| "auto".to_string()),
            public_base_url: require_env("R2_PUBLIC_BASE_URL")?,
        })
    }

    /// Whether the environment carries a full storage configuration.
    pub fn configured() -> bool {
        [
            "R2_ENDPOINT_URL",
            "R2_ACCESS_KEY_ID",
            "R2_SECRET_ACCESS_KEY",
            "MEDIA_BUCKET",
            "R2_PUBLIC_BASE_URL",
        ]
        .iter()
        .all(|key| std::env::var(key).is_ok())
    }
}

fn require_env(key: &'static str) -> StorageResult<String> {
    std::env::var(key).map_err(|_| StorageError::config_error(format!("{key} not set")))
}

/// S3-compatible object storage client.
#[derive(Clone)]
pub struct ObjectStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStore {
    /// Create a new client from configuration.
    pub fn new(config: StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "r2",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(StorageConfig::from_env()?))
    }

    /// Upload a file under `key`.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        info!("Uploaded {} to {}", path.display(), key);
        Ok(())
    }

    /// Upload a highlight file under a source-namespaced key and return its
    /// public URL.
    pub async fn upload_highlight(
        &self,
        path: impl AsRef<Path>,
        source_id: &str,
        filename: &str,
    ) -> StorageResult<String> {
        let key = format!("{source_id}/{filename}");
        self.upload_file(path, &key, "video/mp4").await?;
        Ok(self.public_url(&key))
    }

    /// Public URL an uploaded key is served from.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
