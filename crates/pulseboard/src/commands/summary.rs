//! Summary card handler.

use serde::Serialize;
use tabled::Tabled;

use pulseboard_core::{CoreError, MetricsSummary, SummaryView, TIME_RANGE_DAYS};

use crate::cli::SummaryArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Structured output: the raw aggregates plus the window they cover.
#[derive(Serialize)]
struct SummaryReport {
    days: u32,
    #[serde(flatten)]
    summary: MetricsSummary,
}

fn summary_rows(view: &SummaryView, color: bool) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            metric: "Avg Uptime",
            value: output::paint(&view.avg_uptime, view.uptime_severity, color),
        },
        SummaryRow {
            metric: "Max Concurrent Users",
            value: view.max_concurrent_users.clone(),
        },
        SummaryRow {
            metric: "Avg Users",
            value: view.avg_users.clone(),
        },
        SummaryRow {
            metric: "Suspicious Activities",
            value: view.suspicious_activities.clone(),
        },
    ]
}

fn resolve_days(requested: Option<u32>, default_days: u32) -> Result<u32, CliError> {
    let days = requested.unwrap_or(default_days);
    if days == 0 {
        return Err(CliError::Validation {
            field: "days".into(),
            reason: "must be at least 1".into(),
        });
    }
    if !TIME_RANGE_DAYS.contains(&days) {
        tracing::warn!(days, "window is not one of the dashboard ranges");
    }
    Ok(days)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: &SummaryArgs) -> Result<(), CliError> {
    let days = resolve_days(args.days, ctx.config.default_days)?;
    let summary = ctx
        .client
        .metrics_summary(days)
        .await
        .map_err(CoreError::from)?;

    let view = SummaryView::build(Some(&summary), days);
    let report = SummaryReport { days, summary };
    let out = output::render_single(
        ctx.format,
        &report,
        |_| {
            format!(
                "{}\nLast {days} day(s)",
                output::render_table(&summary_rows(&view, ctx.color))
            )
        },
        |_| {
            summary_rows(&view, false)
                .into_iter()
                .map(|r| format!("{}\t{}", r.metric, r.value))
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_card_order() {
        let summary = MetricsSummary {
            avg_uptime: 99.5,
            max_concurrent_users: 42,
            avg_users: 19.6,
            suspicious_activities: 1,
        };
        let rows = summary_rows(&SummaryView::build(Some(&summary), 7), false);
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["99.5%", "42", "20", "1"]);
    }

    #[test]
    fn report_flattens_summary() {
        let report = SummaryReport {
            days: 30,
            summary: MetricsSummary::default(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["days"], 30);
        assert_eq!(value["suspicious_activities"], 0);
    }

    #[test]
    fn days_default_from_config() {
        assert_eq!(resolve_days(None, 7).unwrap(), 7);
        assert_eq!(resolve_days(Some(90), 7).unwrap(), 90);
        assert!(resolve_days(Some(0), 7).is_err());
    }
}
