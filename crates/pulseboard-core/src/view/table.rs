// ── Table view models ──
//
// Pure mapping from one page of records plus its pagination to display
// rows. Every render replaces the previous rows wholesale.

use pulseboard_api::{Activity, MetricRecord, NotificationRecord};

use crate::pagination::PageState;
use crate::severity::{Severity, classify_uptime};

pub const EMPTY_PLACEHOLDER: &str = "No data found";

/// Timestamps render in UTC so output does not depend on the host zone.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum TableId {
    Metrics,
    Notifications,
}

impl TableId {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Metrics => &["Timestamp", "Uptime", "Users Connected", "Activity"],
            Self::Notifications => &["Timestamp", "Event Type", "Description"],
        }
    }
}

/// One display cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Progress bar, `value` in percent.
    Progress {
        value: f64,
        label: String,
        severity: Severity,
    },
    Badge {
        text: String,
        severity: Severity,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Data(Vec<Cell>),
    /// Single full-width row shown when the page is empty.
    Placeholder { text: String, colspan: usize },
}

/// A record type that renders into one table.
pub trait TableRecord {
    const TABLE: TableId;

    fn cells(&self) -> Vec<Cell>;
}

impl TableRecord for MetricRecord {
    const TABLE: TableId = TableId::Metrics;

    fn cells(&self) -> Vec<Cell> {
        let activity_severity = match self.activity {
            Activity::Suspicious => Severity::Danger,
            Activity::Normal => Severity::Success,
        };
        vec![
            Cell::Text(self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            Cell::Progress {
                value: self.uptime,
                label: format!("{:.1}%", self.uptime),
                severity: classify_uptime(self.uptime),
            },
            Cell::Text(self.users_connected.to_string()),
            Cell::Badge {
                text: self.activity.to_string(),
                severity: activity_severity,
            },
        ]
    }
}

impl TableRecord for NotificationRecord {
    const TABLE: TableId = TableId::Notifications;

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            Cell::Badge {
                text: self.event_type.clone(),
                severity: Severity::Warning,
            },
            Cell::Text(self.description.clone()),
        ]
    }
}

/// Rendered table: header, rows, and pagination controls.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub table: TableId,
    pub columns: &'static [&'static str],
    pub rows: Vec<TableRow>,
    pub page_info: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl TableView {
    pub fn render<R: TableRecord>(records: &[R], pagination: &PageState) -> Self {
        let columns = R::TABLE.columns();
        let rows = if records.is_empty() {
            vec![TableRow::Placeholder {
                text: EMPTY_PLACEHOLDER.into(),
                colspan: columns.len(),
            }]
        } else {
            records.iter().map(|r| TableRow::Data(r.cells())).collect()
        };

        Self {
            table: R::TABLE,
            columns,
            rows,
            page_info: pagination.label(),
            prev_enabled: pagination.has_prev(),
            next_enabled: pagination.has_next(),
        }
    }
}
