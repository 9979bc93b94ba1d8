// ── Dashboard state & refresh orchestration ──
//
// `DashboardState` is the single owner of everything the dashboard shows.
// Each user or timer event has one entry point that mutates the state and
// returns the `RefreshPlan` to execute. Completed fetches come back through
// `apply()`, which drops any response older than the latest request issued
// for the same widget.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pulseboard_api::{
    HealthResponse, MetricRecord, MetricsSummary, NotificationRecord, Page, PageQuery,
};
use tracing::{debug, warn};

use crate::chart::{ChartSeries, SeriesId};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::filter::FilterCriteria;
use crate::health::HealthState;
use crate::pagination::{PageCursor, PageState};
use crate::view::table::TableId;

/// Selectable summary windows, in days.
pub const TIME_RANGE_DAYS: [u32; 4] = [1, 7, 30, 90];

pub const REFRESH_SUCCESS: &str = "Data refreshed successfully";

// ── Widgets ──────────────────────────────────────────────────────

/// Independently refreshed regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum WidgetId {
    Summary,
    MetricsTable,
    NotificationsTable,
    Charts,
    Health,
}

impl WidgetId {
    pub const ALL: [Self; 5] = [
        Self::Summary,
        Self::MetricsTable,
        Self::NotificationsTable,
        Self::Charts,
        Self::Health,
    ];

    fn slot(self) -> usize {
        match self {
            Self::Summary => 0,
            Self::MetricsTable => 1,
            Self::NotificationsTable => 2,
            Self::Charts => 3,
            Self::Health => 4,
        }
    }

    /// Toast text when a fetch for this widget fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Summary => "Error loading summary data",
            Self::MetricsTable => "Error loading metrics data",
            Self::NotificationsTable => "Error loading notifications data",
            Self::Charts => "Error loading chart data",
            Self::Health => "Error checking system health",
        }
    }
}

impl From<TableId> for WidgetId {
    fn from(table: TableId) -> Self {
        match table {
            TableId::Metrics => Self::MetricsTable,
            TableId::Notifications => Self::NotificationsTable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WidgetStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
struct WidgetSlot {
    status: WidgetStatus,
    /// Latest generation issued. Only outcomes carrying it are applied.
    generation: u64,
}

// ── Plans & outcomes ─────────────────────────────────────────────

/// Who asked for a full refresh. Only user refreshes report success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    User,
    Background,
}

/// Groups the requests of one user-triggered full refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    Summary { days: u32 },
    Metrics(PageQuery),
    Notifications(PageQuery),
    Charts(PageQuery),
    Health,
}

impl FetchKind {
    pub fn widget(&self) -> WidgetId {
        match self {
            Self::Summary { .. } => WidgetId::Summary,
            Self::Metrics(_) => WidgetId::MetricsTable,
            Self::Notifications(_) => WidgetId::NotificationsTable,
            Self::Charts(_) => WidgetId::Charts,
            Self::Health => WidgetId::Health,
        }
    }
}

/// One fetch to execute, tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: FetchKind,
    pub generation: u64,
    pub batch: Option<BatchId>,
}

impl FetchRequest {
    pub fn widget(&self) -> WidgetId {
        self.kind.widget()
    }
}

/// The fetches an event requires, in issue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshPlan {
    requests: Vec<FetchRequest>,
}

impl RefreshPlan {
    pub fn requests(&self) -> &[FetchRequest] {
        &self.requests
    }

    pub fn widgets(&self) -> Vec<WidgetId> {
        self.requests.iter().map(FetchRequest::widget).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}

impl IntoIterator for RefreshPlan {
    type Item = FetchRequest;
    type IntoIter = std::vec::IntoIter<FetchRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    Summary(MetricsSummary),
    Metrics(Page<MetricRecord>),
    Notifications(Page<NotificationRecord>),
    Charts(Vec<MetricRecord>),
    Health(HealthResponse),
}

/// A completed fetch, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub widget: WidgetId,
    pub generation: u64,
    pub batch: Option<BatchId>,
    pub completed_at: DateTime<Utc>,
    pub result: Result<FetchPayload, CoreError>,
}

impl FetchOutcome {
    pub fn new(
        request: &FetchRequest,
        result: Result<FetchPayload, CoreError>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            widget: request.widget(),
            generation: request.generation,
            batch: request.batch,
            completed_at,
            result,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    fn success(message: &str) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// What applying one outcome did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyEffect {
    /// `false` when the outcome was stale and dropped.
    pub applied: bool,
    pub toasts: Vec<Toast>,
}

// ── Table data ───────────────────────────────────────────────────

/// The page of records currently shown in one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData<R> {
    pub records: Vec<R>,
    pub pagination: PageState,
}

impl<R> Default for TableData<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            pagination: PageState::default(),
        }
    }
}

impl<R> From<Page<R>> for TableData<R> {
    fn from(page: Page<R>) -> Self {
        Self {
            records: page.data,
            pagination: page.pagination.into(),
        }
    }
}

// ── DashboardState ───────────────────────────────────────────────

/// All dashboard state. Owned by the UI loop; never shared.
#[derive(Debug)]
pub struct DashboardState {
    per_page: u32,
    chart_sample_size: u32,
    days: u32,
    filters: FilterCriteria,
    metrics_cursor: PageCursor,
    notifications_cursor: PageCursor,
    summary: Option<MetricsSummary>,
    metrics: TableData<MetricRecord>,
    notifications: TableData<NotificationRecord>,
    uptime_series: ChartSeries,
    users_series: ChartSeries,
    health: HealthState,
    widgets: [WidgetSlot; 5],
    next_batch: u64,
    /// Outstanding request count per user batch.
    pending_batches: HashMap<BatchId, usize>,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            per_page: config.per_page.max(1),
            chart_sample_size: config.chart_sample_size.max(1),
            days: config.default_days.max(1),
            filters: FilterCriteria::default(),
            metrics_cursor: PageCursor::default(),
            notifications_cursor: PageCursor::default(),
            summary: None,
            metrics: TableData::default(),
            notifications: TableData::default(),
            uptime_series: ChartSeries::empty(SeriesId::Uptime),
            users_series: ChartSeries::empty(SeriesId::Users),
            health: HealthState::default(),
            widgets: Default::default(),
            next_batch: 0,
            pending_batches: HashMap::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn cursor(&self, table: TableId) -> PageCursor {
        match table {
            TableId::Metrics => self.metrics_cursor,
            TableId::Notifications => self.notifications_cursor,
        }
    }

    pub fn summary(&self) -> Option<&MetricsSummary> {
        self.summary.as_ref()
    }

    pub fn metrics(&self) -> &TableData<MetricRecord> {
        &self.metrics
    }

    pub fn notifications(&self) -> &TableData<NotificationRecord> {
        &self.notifications
    }

    pub fn uptime_series(&self) -> &ChartSeries {
        &self.uptime_series
    }

    pub fn users_series(&self) -> &ChartSeries {
        &self.users_series
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn status(&self, widget: WidgetId) -> &WidgetStatus {
        &self.widgets[widget.slot()].status
    }

    pub fn is_loading(&self) -> bool {
        self.widgets
            .iter()
            .any(|w| w.status == WidgetStatus::Loading)
    }

    // ── Entry points ─────────────────────────────────────────────

    /// Refresh every widget with the current cursors, filters, and window.
    pub fn full_refresh(&mut self, trigger: Trigger) -> RefreshPlan {
        let batch = match trigger {
            Trigger::User => {
                let id = BatchId(self.next_batch);
                self.next_batch += 1;
                Some(id)
            }
            Trigger::Background => None,
        };

        let kinds = vec![
            self.summary_kind(),
            self.table_kind(TableId::Metrics),
            self.table_kind(TableId::Notifications),
            FetchKind::Health,
            self.chart_kind(),
        ];
        let plan = self.issue(kinds, batch);
        if let Some(id) = batch {
            self.pending_batches.insert(id, plan.len());
        }
        plan
    }

    /// Store new filters and reload both tables (from page 1) and the charts.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> RefreshPlan {
        debug!(filters = %criteria.describe(), "applying filters");
        self.filters = criteria;
        self.reload_after_filter_change()
    }

    pub fn clear_filters(&mut self) -> RefreshPlan {
        self.filters = FilterCriteria::default();
        self.reload_after_filter_change()
    }

    pub fn next_page(&mut self, table: TableId) -> RefreshPlan {
        self.cursor_mut(table).next();
        let kind = self.table_kind(table);
        self.issue(vec![kind], None)
    }

    /// Step back one page. `None` when already on page 1.
    pub fn prev_page(&mut self, table: TableId) -> Option<RefreshPlan> {
        if !self.cursor_mut(table).prev() {
            return None;
        }
        let kind = self.table_kind(table);
        Some(self.issue(vec![kind], None))
    }

    /// Change the summary window. Reloads the summary and charts.
    pub fn set_time_range(&mut self, days: u32) -> RefreshPlan {
        self.days = days.max(1);
        let kinds = vec![self.summary_kind(), self.chart_kind()];
        self.issue(kinds, None)
    }

    /// Advance to the next entry of [`TIME_RANGE_DAYS`].
    pub fn cycle_time_range(&mut self) -> RefreshPlan {
        let next = TIME_RANGE_DAYS
            .iter()
            .position(|&d| d == self.days)
            .map_or(TIME_RANGE_DAYS[0], |i| {
                TIME_RANGE_DAYS[(i + 1) % TIME_RANGE_DAYS.len()]
            });
        self.set_time_range(next)
    }

    pub fn poll_health(&mut self) -> RefreshPlan {
        self.issue(vec![FetchKind::Health], None)
    }

    /// Apply one completed fetch.
    pub fn apply(&mut self, outcome: FetchOutcome) -> ApplyEffect {
        let mut effect = ApplyEffect::default();
        let widget = outcome.widget;
        let latest = self.widgets[widget.slot()].generation;

        if outcome.generation == latest {
            effect.applied = true;
            match outcome.result {
                Ok(payload) => {
                    self.store(payload, outcome.completed_at);
                    self.widgets[widget.slot()].status = WidgetStatus::Loaded;
                }
                Err(e) => {
                    warn!(widget = %widget, error = %e, "fetch failed");
                    if widget == WidgetId::Health {
                        self.health = HealthState::from_poll(&self.health, Err(&e), outcome.completed_at);
                    }
                    self.widgets[widget.slot()].status = WidgetStatus::Failed(e.to_string());
                    effect.toasts.push(Toast::error(widget.failure_message()));
                }
            }
        } else {
            debug!(
                widget = %widget,
                generation = outcome.generation,
                latest,
                "discarding stale response"
            );
        }

        if let Some(batch) = outcome.batch {
            if self.finish_batch_request(batch) {
                effect.toasts.push(Toast::success(REFRESH_SUCCESS));
            }
        }
        effect
    }

    // ── Internals ────────────────────────────────────────────────

    fn reload_after_filter_change(&mut self) -> RefreshPlan {
        self.metrics_cursor.reset();
        self.notifications_cursor.reset();
        let kinds = vec![
            self.table_kind(TableId::Metrics),
            self.table_kind(TableId::Notifications),
            self.chart_kind(),
        ];
        self.issue(kinds, None)
    }

    fn cursor_mut(&mut self, table: TableId) -> &mut PageCursor {
        match table {
            TableId::Metrics => &mut self.metrics_cursor,
            TableId::Notifications => &mut self.notifications_cursor,
        }
    }

    fn summary_kind(&self) -> FetchKind {
        FetchKind::Summary { days: self.days }
    }

    fn table_kind(&self, table: TableId) -> FetchKind {
        let query = self.filters.query(self.cursor(table).page(), self.per_page);
        match table {
            TableId::Metrics => FetchKind::Metrics(query),
            TableId::Notifications => FetchKind::Notifications(query),
        }
    }

    /// Charts always read page 1 of the unfiltered data.
    fn chart_kind(&self) -> FetchKind {
        FetchKind::Charts(PageQuery::new(1, self.chart_sample_size))
    }

    fn issue(&mut self, kinds: Vec<FetchKind>, batch: Option<BatchId>) -> RefreshPlan {
        let requests = kinds
            .into_iter()
            .map(|kind| {
                let slot = &mut self.widgets[kind.widget().slot()];
                slot.generation += 1;
                slot.status = WidgetStatus::Loading;
                FetchRequest {
                    kind,
                    generation: slot.generation,
                    batch,
                }
            })
            .collect();
        RefreshPlan { requests }
    }

    fn store(&mut self, payload: FetchPayload, completed_at: DateTime<Utc>) {
        match payload {
            FetchPayload::Summary(summary) => self.summary = Some(summary),
            FetchPayload::Metrics(page) => self.metrics = page.into(),
            FetchPayload::Notifications(page) => self.notifications = page.into(),
            FetchPayload::Charts(records) => {
                self.uptime_series = ChartSeries::project(SeriesId::Uptime, &records);
                self.users_series = ChartSeries::project(SeriesId::Users, &records);
            }
            FetchPayload::Health(resp) => {
                self.health = HealthState::from_poll(&self.health, Ok(&resp), completed_at);
            }
        }
    }

    /// Count one finished request against its batch. Returns `true` when it
    /// was the last outstanding one.
    fn finish_batch_request(&mut self, batch: BatchId) -> bool {
        let Some(remaining) = self.pending_batches.get_mut(&batch) else {
            return false;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.pending_batches.remove(&batch);
            true
        } else {
            false
        }
    }
}
