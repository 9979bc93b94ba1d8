//! Backend health handler.

use chrono::Utc;
use serde::Serialize;

use pulseboard_core::{CoreError, HealthResponse, HealthState, HealthStatus};

use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Serialize)]
struct HealthReport {
    url: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    checked_at: String,
}

/// Prints the health badge, then fails with `Unhealthy` when the backend
/// says so, so scripts can branch on the exit code.
pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    let response: HealthResponse = ctx.client.health().await.map_err(CoreError::from)?;

    let now = Utc::now();
    let state = HealthState::from_poll(&HealthState::default(), Ok(&response), now);
    let badge = state.badge();

    let report = HealthReport {
        url: ctx.config.url.to_string(),
        status: response.status.clone(),
        error: response.error.clone(),
        checked_at: now.to_rfc3339(),
    };
    let out = output::render_single(
        ctx.format,
        &report,
        |r| {
            let mut line = format!(
                "{}  {}",
                output::paint(&badge.text, badge.severity, ctx.color),
                r.url
            );
            if let Some(ref checked) = badge.last_checked {
                line.push_str(&format!("  {checked}"));
            }
            if let Some(ref error) = badge.error {
                line.push_str(&format!("\n{error}"));
            }
            line
        },
        |r| r.status.clone(),
    );
    output::print_output(&out, ctx.quiet);

    if state.status == HealthStatus::Healthy {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            status: response.status,
            error: response.error,
        })
    }
}
