// ── Runtime dashboard configuration ──
//
// These types describe *where* the backend lives and how often to poll
// it. They never touch disk: the CLI/TUI builds a `DashboardConfig`
// (usually via `pulseboard-config`) and hands it in.

use std::time::Duration;

use pulseboard_api::TransportConfig;
use url::Url;

/// Rows per table page.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Records requested for the charts (page 1, unfiltered).
pub const DEFAULT_CHART_SAMPLE: u32 = 100;
/// Initial summary window in days.
pub const DEFAULT_DAYS: u32 = 7;

/// Configuration for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend root (e.g., `http://localhost:5000`).
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
    pub per_page: u32,
    pub chart_sample_size: u32,
    /// Full refresh cadence in seconds. 0 = never.
    pub refresh_interval_secs: u64,
    /// Health poll cadence in seconds. 0 = never.
    pub health_interval_secs: u64,
    pub default_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:5000").expect("static URL is valid"),
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
            per_page: DEFAULT_PER_PAGE,
            chart_sample_size: DEFAULT_CHART_SAMPLE,
            refresh_interval_secs: 60,
            health_interval_secs: 30,
            default_days: DEFAULT_DAYS,
        }
    }
}

impl DashboardConfig {
    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .insecure(self.accept_invalid_certs)
    }
}
