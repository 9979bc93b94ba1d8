//! Dashboard state and refresh orchestration between `pulseboard-api` and
//! the UI consumers (CLI / TUI).
//!
//! - **[`DashboardState`]**: single owner of everything the dashboard
//!   shows. One entry point per event ([`full_refresh`], [`apply_filters`],
//!   [`next_page`], ...) returns a [`RefreshPlan`]; completed fetches come
//!   back through [`apply`], which drops stale responses by per-widget
//!   generation.
//!
//! - **[`Controller`]**: executes plans as independent tokio tasks and runs
//!   the periodic refresh/health schedulers. Results and ticks flow back
//!   over an mpsc channel as [`ControllerEvent`]s.
//!
//! - **View models** ([`view`], [`chart`], [`health`]): pure projections
//!   consumed by renderers: table rows with uptime banding, the summary
//!   cards, windowed chart series, and the health badge.
//!
//! [`full_refresh`]: DashboardState::full_refresh
//! [`apply_filters`]: DashboardState::apply_filters
//! [`next_page`]: DashboardState::next_page
//! [`apply`]: DashboardState::apply

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod health;
pub mod pagination;
pub mod severity;
pub mod state;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chart::{CHART_WINDOW, ChartPoint, ChartSeries, SeriesId};
pub use config::DashboardConfig;
pub use controller::{Controller, ControllerEvent, ScheduleTick};
pub use error::CoreError;
pub use filter::{FilterCriteria, parse_date};
pub use health::{HealthBadge, HealthState, HealthStatus};
pub use pagination::{PageCursor, PageState};
pub use severity::{Severity, classify_uptime};
pub use state::{
    ApplyEffect, DashboardState, FetchKind, FetchOutcome, FetchPayload, FetchRequest,
    REFRESH_SUCCESS, RefreshPlan, TIME_RANGE_DAYS, Toast, ToastLevel, Trigger, WidgetId,
    WidgetStatus,
};
pub use view::{Cell, DashboardView, SummaryView, TableId, TableRow, TableView};

// Wire types and the client for one-shot consumers (the CLI).
pub use pulseboard_api::{
    Activity, ApiClient, HealthResponse, MetricRecord, MetricsSummary, NotificationRecord, Page,
    PageQuery, Pagination, TransportConfig,
};
