//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table output goes
//! through the core view models so the CLI and the TUI band uptime and
//! badge activity identically; structured formats serialize the wire data.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use pulseboard_core::view::TableRecord;
use pulseboard_core::{Cell, Page, PageState, Severity, TableRow, TableView};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Paint `text` in its severity color.
pub fn paint(text: &str, severity: Severity, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match severity {
        Severity::Success => text.green().to_string(),
        Severity::Info => text.cyan().to_string(),
        Severity::Warning => text.yellow().to_string(),
        Severity::Danger => text.red().bold().to_string(),
    }
}

fn cell_text(cell: &Cell, color: bool) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Progress {
            label, severity, ..
        } => paint(label, *severity, color),
        Cell::Badge { text, severity } => paint(text, *severity, color),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render one page of records in the chosen format.
///
/// - `table`: the shared table view model, one row per record, then the
///   page-info line
/// - `json` / `json-compact` / `yaml`: the `{ data, pagination }` page
/// - `plain`: one tab-separated line per record
pub fn render_page<R>(format: OutputFormat, page: &Page<R>, color: bool) -> String
where
    R: serde::Serialize + TableRecord,
{
    match format {
        OutputFormat::Table => {
            let view = TableView::render(&page.data, &PageState::from(page.pagination));
            render_table_view(&view, color)
        }
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
        OutputFormat::Plain => page
            .data
            .iter()
            .map(|r| {
                r.cells()
                    .iter()
                    .map(|c| cell_text(c, false))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string; plain uses `plain_fn`.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_table_view(view: &TableView, color: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(view.columns.iter().copied());

    for row in &view.rows {
        match row {
            TableRow::Data(cells) => {
                builder.push_record(cells.iter().map(|c| cell_text(c, color)));
            }
            TableRow::Placeholder { text, colspan } => {
                let mut record = vec![text.clone()];
                record.resize(*colspan, String::new());
                builder.push_record(record);
            }
        }
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    format!("{table}\n{}", view.page_info)
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        render_json_compact(data)
    } else {
        render_json_pretty(data)
    }
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pulseboard_core::{Activity, MetricRecord, NotificationRecord, Pagination};

    use super::*;

    fn metrics_page() -> Page<MetricRecord> {
        Page {
            data: vec![MetricRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 15, 0).unwrap(),
                uptime: 93.4,
                users_connected: 12,
                activity: Activity::Suspicious,
            }],
            pagination: Pagination {
                page: 1,
                pages: 3,
                total: 25,
            },
        }
    }

    #[test]
    fn table_has_header_row_and_page_info() {
        let out = render_page(OutputFormat::Table, &metrics_page(), false);
        assert!(out.contains("Users Connected"));
        assert!(out.contains("93.4%"));
        assert!(out.contains("Suspicious"));
        assert!(out.ends_with("Page 1 of 3 (25 total records)"));
    }

    #[test]
    fn empty_page_shows_placeholder() {
        let page: Page<NotificationRecord> = Page {
            data: Vec::new(),
            pagination: Pagination {
                page: 1,
                pages: 0,
                total: 0,
            },
        };
        let out = render_page(OutputFormat::Table, &page, false);
        assert!(out.contains("No data found"));
        assert!(out.ends_with("Page 1 of 1 (0 total records)"));
    }

    #[test]
    fn plain_is_tab_separated() {
        let out = render_page(OutputFormat::Plain, &metrics_page(), false);
        assert_eq!(out, "2024-01-01 08:15:00\t93.4%\t12\tSuspicious");
    }

    #[test]
    fn json_keeps_page_envelope() {
        let out = render_page(OutputFormat::JsonCompact, &metrics_page(), false);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["pagination"]["total"], 25);
        assert_eq!(value["data"][0]["users_connected"], 12);
    }

    #[test]
    fn paint_without_color_is_identity() {
        assert_eq!(paint("Healthy", Severity::Success, false), "Healthy");
        assert!(paint("Healthy", Severity::Success, true).contains("\u{1b}["));
    }
}
