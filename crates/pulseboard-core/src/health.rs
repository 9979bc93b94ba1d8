// ── Health monitor ──
//
// Each poll replaces the whole `HealthState`. Only a healthy answer moves
// `last_checked`; unhealthy answers and failed fetches carry it over.

use chrono::{DateTime, Utc};
use pulseboard_api::HealthResponse;
use tracing::warn;

use crate::error::CoreError;
use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    pub status: HealthStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            status: HealthStatus::Unknown,
            last_checked: None,
            error: None,
        }
    }
}

impl HealthState {
    /// Derive the next state from one poll result.
    pub fn from_poll(
        previous: &HealthState,
        result: Result<&HealthResponse, &CoreError>,
        now: DateTime<Utc>,
    ) -> Self {
        match result {
            Ok(resp) if resp.is_healthy() => Self {
                status: HealthStatus::Healthy,
                last_checked: Some(now),
                error: None,
            },
            Ok(resp) => {
                let error = resp.error.clone().unwrap_or_else(|| resp.status.clone());
                warn!(status = %resp.status, error = %error, "backend reports unhealthy");
                Self {
                    status: HealthStatus::Unhealthy,
                    last_checked: previous.last_checked,
                    error: Some(error),
                }
            }
            Err(e) => Self {
                status: HealthStatus::Error,
                last_checked: previous.last_checked,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn badge(&self) -> HealthBadge {
        let severity = match self.status {
            HealthStatus::Healthy => Severity::Success,
            HealthStatus::Unknown => Severity::Info,
            HealthStatus::Unhealthy | HealthStatus::Error => Severity::Danger,
        };
        HealthBadge {
            text: self.status.to_string(),
            severity,
            last_checked: self
                .last_checked
                .map(|t| format!("Last checked: {}", t.format("%H:%M:%S"))),
            error: self.error.clone(),
        }
    }
}

/// Display form of [`HealthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthBadge {
    pub text: String,
    pub severity: Severity,
    pub last_checked: Option<String>,
    pub error: Option<String>,
}
