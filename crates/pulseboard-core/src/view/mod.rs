// ── View models ──
//
// Pure `(state) -> view` projections. Renderers (TUI screens, CLI output)
// consume these and never read `DashboardState` directly.

pub mod summary;
pub mod table;

use crate::chart::ChartSeries;
use crate::filter::FilterCriteria;
use crate::health::HealthBadge;
use crate::state::{DashboardState, WidgetId, WidgetStatus};

pub use summary::SummaryView;
pub use table::{Cell, TableId, TableRecord, TableRow, TableView};

/// Everything one frame of the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: SummaryView,
    pub metrics: TableView,
    pub notifications: TableView,
    pub uptime_chart: ChartSeries,
    pub users_chart: ChartSeries,
    pub health: HealthBadge,
    pub filters: FilterCriteria,
    pub days: u32,
    pub widgets: Vec<(WidgetId, WidgetStatus)>,
}

impl DashboardView {
    pub fn build(state: &DashboardState) -> Self {
        let metrics = state.metrics();
        let notifications = state.notifications();

        Self {
            summary: SummaryView::build(state.summary(), state.days()),
            metrics: TableView::render(&metrics.records, &metrics.pagination),
            notifications: TableView::render(&notifications.records, &notifications.pagination),
            uptime_chart: state.uptime_series().clone(),
            users_chart: state.users_series().clone(),
            health: state.health().badge(),
            filters: state.filters().clone(),
            days: state.days(),
            widgets: WidgetId::ALL
                .iter()
                .map(|w| (*w, state.status(*w).clone()))
                .collect(),
        }
    }

    pub fn status(&self, widget: WidgetId) -> &WidgetStatus {
        self.widgets
            .iter()
            .find(|(w, _)| *w == widget)
            .map_or(&WidgetStatus::Idle, |(_, s)| s)
    }

    pub fn is_loading(&self) -> bool {
        self.widgets.iter().any(|(_, s)| *s == WidgetStatus::Loading)
    }

    pub fn table(&self, table: TableId) -> &TableView {
        match table {
            TableId::Metrics => &self.metrics,
            TableId::Notifications => &self.notifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use pulseboard_api::{Activity, MetricRecord, Page, Pagination};

    use super::*;
    use crate::config::DashboardConfig;
    use crate::severity::Severity;
    use crate::state::{FetchOutcome, FetchPayload};

    #[test]
    fn fresh_state_renders_placeholders() {
        let state = DashboardState::new(&DashboardConfig::default());
        let view = DashboardView::build(&state);

        assert_eq!(view.metrics.page_info, "Page 1 of 1 (0 total records)");
        assert!(matches!(view.metrics.rows[0], TableRow::Placeholder { colspan: 4, .. }));
        assert!(view.uptime_chart.is_empty());
        assert_eq!(view.health.text, "Unknown");
        assert_eq!(view.days, 7);
        assert!(!view.is_loading());
    }

    #[test]
    fn loaded_metric_flows_into_view() {
        let mut state = DashboardState::new(&DashboardConfig::default());
        let request = state
            .next_page(TableId::Metrics)
            .into_iter()
            .next()
            .unwrap();
        assert!(DashboardView::build(&state).is_loading());

        let page = Page {
            data: vec![MetricRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                uptime: 97.5,
                users_connected: 3,
                activity: Activity::Normal,
            }],
            pagination: Pagination {
                page: 1,
                pages: 1,
                total: 1,
            },
        };
        state.apply(FetchOutcome::new(
            &request,
            Ok(FetchPayload::Metrics(page)),
            Utc::now(),
        ));

        let view = DashboardView::build(&state);
        let table = view.table(TableId::Metrics);
        assert_eq!(table.rows.len(), 1);
        let TableRow::Data(cells) = &table.rows[0] else {
            panic!("expected data row");
        };
        assert!(matches!(cells[1], Cell::Progress { severity: Severity::Info, .. }));
        assert_eq!(table.page_info, "Page 1 of 1 (1 total records)");
        assert!(!table.prev_enabled);
        assert!(!table.next_enabled);
        assert_eq!(*view.status(WidgetId::MetricsTable), WidgetStatus::Loaded);
    }
}
