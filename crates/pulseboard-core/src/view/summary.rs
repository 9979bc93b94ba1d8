use pulseboard_api::MetricsSummary;

use crate::severity::{Severity, classify_uptime};

const MISSING: &str = "--";

/// Summary cards plus the average-uptime bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub avg_uptime: String,
    /// Bar fill in percent, 0–100.
    pub uptime_percent: f64,
    pub uptime_severity: Severity,
    pub max_concurrent_users: String,
    pub avg_users: String,
    pub suspicious_activities: String,
    /// Days-back window the figures cover.
    pub days: u32,
}

impl SummaryView {
    pub fn build(summary: Option<&MetricsSummary>, days: u32) -> Self {
        let Some(s) = summary else {
            return Self {
                avg_uptime: MISSING.into(),
                uptime_percent: 0.0,
                uptime_severity: Severity::Info,
                max_concurrent_users: MISSING.into(),
                avg_users: MISSING.into(),
                suspicious_activities: MISSING.into(),
                days,
            };
        };

        Self {
            avg_uptime: format!("{:.1}%", s.avg_uptime),
            uptime_percent: s.avg_uptime.clamp(0.0, 100.0),
            uptime_severity: classify_uptime(s.avg_uptime),
            max_concurrent_users: s.max_concurrent_users.to_string(),
            avg_users: format!("{:.0}", s.avg_users.round()),
            suspicious_activities: s.suspicious_activities.to_string(),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_loaded_summary() {
        let summary = MetricsSummary {
            avg_uptime: 94.5,
            max_concurrent_users: 49,
            avg_users: 27.5,
            suspicious_activities: 3,
        };
        let view = SummaryView::build(Some(&summary), 7);
        assert_eq!(view.avg_uptime, "94.5%");
        assert_eq!(view.uptime_severity, Severity::Warning);
        assert_eq!(view.avg_users, "28");
        assert_eq!(view.max_concurrent_users, "49");
    }

    #[test]
    fn unloaded_summary_shows_dashes() {
        let view = SummaryView::build(None, 30);
        assert_eq!(view.avg_uptime, "--");
        assert_eq!(view.days, 30);
    }
}
