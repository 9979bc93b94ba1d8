// Pulseboard HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, JSON decoding, and
// error classification. Endpoint methods are thin typed wrappers over
// `get_json`.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{HealthResponse, MetricRecord, MetricsSummary, NotificationRecord, Page, PageQuery};

const PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the pulseboard backend.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, so
/// each fetch task can own its own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:5000`). A
    /// path prefix such as `https://ops.example.com/dashboard` is kept.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client from a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The backend root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `path` with the given query parameters and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {url} {params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let url = resp.url().to_string();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Parse {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/metrics`: one page of metric samples.
    pub async fn list_metrics(&self, query: &PageQuery) -> Result<Page<MetricRecord>, Error> {
        self.get_json("api/metrics", &query.to_params()).await
    }

    /// `GET /api/metrics/summary?days=N`: aggregates over the last `days` days.
    pub async fn metrics_summary(&self, days: u32) -> Result<MetricsSummary, Error> {
        self.get_json("api/metrics/summary", &[("days", days.to_string())])
            .await
    }

    /// `GET /api/notifications`: one page of notifications.
    pub async fn list_notifications(
        &self,
        query: &PageQuery,
    ) -> Result<Page<NotificationRecord>, Error> {
        self.get_json("api/notifications", &query.to_params()).await
    }

    /// `GET /api/health`: backend health check.
    ///
    /// Backends often answer 503 with a regular health body when they are
    /// down. That body is the answer, so a non-2xx status is only an error
    /// when it does not decode as a `HealthResponse`.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        match self.get_json("api/health", &[]).await {
            Err(Error::Http { status, url, body }) => {
                serde_json::from_str(&body).map_err(|_| Error::Http { status, url, body })
            }
            other => other,
        }
    }
}

/// Ensure the base URL path ends in `/` so `Url::join` appends rather than
/// replacing the last segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
