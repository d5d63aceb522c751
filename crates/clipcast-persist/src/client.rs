//! Supabase REST API client.
//!
//! Thin PostgREST wrapper: selects with `?col=eq.val` filters, PATCH
//! updates and upserts with `on_conflict`, all authenticated with the
//! service key.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::{PersistError, PersistResult};
use crate::metrics::record_request;

/// Supabase client configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Service-role API key
    pub service_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Create config from environment variables.
    ///
    /// Requires `SUPABASE_URL` and `SUPABASE_SERVICE_KEY`.
    pub fn from_env() -> PersistResult<Self> {
        Ok(Self {
            base_url: std::env::var("SUPABASE_URL")
                .map_err(|_| PersistError::config_error("SUPABASE_URL not set"))?,
            service_key: std::env::var("SUPABASE_SERVICE_KEY")
                .map_err(|_| PersistError::config_error("SUPABASE_SERVICE_KEY not set"))?,
            timeout: Duration::from_secs(
                std::env::var("SUPABASE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        })
    }

    /// Whether both required variables are present, without constructing.
    pub fn configured() -> bool {
        std::env::var("SUPABASE_URL").is_ok() && std::env::var("SUPABASE_SERVICE_KEY").is_ok()
    }
}

/// Supabase REST API client.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    rest_base: String,
    service_key: String,
}

impl SupabaseClient {
    /// Create a new client.
    pub fn new(config: SupabaseConfig) -> PersistResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("clipcast-persist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PersistError::Network)?;

        let rest_base = format!("{}/rest/v1", config.base_url.trim_end_matches('/'));

        Ok(Self {
            http,
            rest_base,
            service_key: config.service_key,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> PersistResult<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Select rows where `filter_col` equals `value`, optionally ordered.
    pub async fn select(
        &self,
        table: &str,
        filter_col: &str,
        value: &str,
        order_col: Option<&str>,
    ) -> PersistResult<Vec<Value>> {
        let mut url = format!(
            "{}/{}?{}=eq.{}&select=*",
            self.rest_base,
            table,
            filter_col,
            urlencoding::encode(value)
        );
        if let Some(order) = order_col {
            url.push_str(&format!("&order={order}.asc"));
        }

        let started = Instant::now();
        let response = self.request(Method::GET, &url).send().await?;
        let status = response.status();
        record_request("select", status.as_u16(), elapsed_ms(started));

        if !status.is_success() {
            return Err(request_failed(status.as_u16(), response).await);
        }

        let rows: Vec<Value> = response.json().await?;
        debug!(table, rows = rows.len(), "Selected rows");
        Ok(rows)
    }

    /// Patch rows where `filter_col` equals `value`.
    pub async fn update(
        &self,
        table: &str,
        filter_col: &str,
        value: &str,
        body: &Value,
    ) -> PersistResult<()> {
        let url = format!(
            "{}/{}?{}=eq.{}",
            self.rest_base,
            table,
            filter_col,
            urlencoding::encode(value)
        );

        let started = Instant::now();
        let response = self
            .request(Method::PATCH, &url)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        record_request("update", status.as_u16(), elapsed_ms(started));

        if !status.is_success() {
            return Err(request_failed(status.as_u16(), response).await);
        }
        Ok(())
    }

    /// Insert-or-merge a row, resolving conflicts on `on_conflict`.
    pub async fn upsert(&self, table: &str, on_conflict: &str, body: &Value) -> PersistResult<()> {
        let url = format!("{}/{}?on_conflict={}", self.rest_base, table, on_conflict);

        let started = Instant::now();
        let response = self
            .request(Method::POST, &url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        record_request("upsert", status.as_u16(), elapsed_ms(started));

        if !status.is_success() {
            return Err(request_failed(status.as_u16(), response).await);
        }
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

async fn request_failed(status: u16, response: reqwest::Response) -> PersistError {
    let body = response.text().await.unwrap_or_default();
    PersistError::RequestFailed { status, body }
}
