//! Paged table screen, shared by the metrics and notifications tabs.
//!
//! Layout:
//! ┌─ Metrics ── filters: none ────────────────────────────────────┐
//! │ Timestamp            Uptime              Users    Activity    │
//! │ 2024-01-01 00:00:00  ████████░░ 97.5%    7        Normal      │
//! │                                                               │
//! ├─ Page 1 of 3 (25 total records) ─────── ← p prev  n next → ───┤
//! └───────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell as TableCell, Paragraph, Row, Table},
};

use pulseboard_core::{Cell, DashboardView, TableId, TableRow, TableView, WidgetId, WidgetStatus};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::progress;

/// Width of the inline uptime bar, excluding its label.
const BAR_WIDTH: usize = 10;

pub struct TableScreen {
    table: TableId,
    focused: bool,
    view: Option<Arc<DashboardView>>,
}

impl TableScreen {
    pub fn new(table: TableId) -> Self {
        Self {
            table,
            focused: false,
            view: None,
        }
    }

    fn widths(&self) -> Vec<Constraint> {
        match self.table {
            TableId::Metrics => vec![
                Constraint::Length(20),
                Constraint::Length(20),
                Constraint::Length(16),
                Constraint::Min(12),
            ],
            TableId::Notifications => vec![
                Constraint::Length(20),
                Constraint::Length(18),
                Constraint::Min(20),
            ],
        }
    }
}

fn render_cell(cell: &Cell) -> TableCell<'static> {
    match cell {
        Cell::Text(text) => TableCell::from(text.clone()),
        Cell::Progress {
            value,
            label,
            severity,
        } => TableCell::from(progress::progress_line(*value, label, *severity, BAR_WIDTH)),
        Cell::Badge { text, severity } => {
            TableCell::from(Line::from(Span::styled(format!(" {text} "), theme::badge(*severity))))
        }
    }
}

/// Footer: page info on the left, prev/next hints on the right, dimmed
/// when that direction is unavailable.
fn pager_line(view: &TableView) -> (Line<'static>, Line<'static>) {
    let info = Line::from(Span::styled(
        format!(" {}", view.page_info),
        Style::default().fg(theme::DIM_WHITE),
    ));

    let hint = |enabled: bool, key: &'static str, label: &'static str| {
        if enabled {
            vec![
                Span::styled(key, theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ]
        } else {
            vec![Span::styled(
                format!("{key}{label}"),
                Style::default().fg(theme::BG_HIGHLIGHT),
            )]
        }
    };

    let mut spans = hint(view.prev_enabled, "← p", " prev  ");
    spans.extend(hint(view.next_enabled, "n →", " next "));
    (info, Line::from(spans))
}

impl Component for TableScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Right | KeyCode::Char('n') => Some(Action::NextPage(self.table)),
            KeyCode::Left | KeyCode::Char('p') => Some(Action::PrevPage(self.table)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewUpdated(view) = action {
            self.view = Some(Arc::clone(view));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref dashboard) = self.view else {
            return;
        };
        let view = dashboard.table(self.table);

        let status = match dashboard.status(WidgetId::from(self.table)) {
            WidgetStatus::Loading => Span::styled(" loading… ", theme::key_hint()),
            WidgetStatus::Failed(_) => {
                Span::styled(" failed ", Style::default().fg(theme::ERROR_RED))
            }
            WidgetStatus::Idle | WidgetStatus::Loaded => Span::raw(""),
        };

        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(format!(" {} ", self.table), theme::title_style()),
                Span::styled(
                    format!("─ filters: {} ", dashboard.filters.describe()),
                    theme::key_hint(),
                ),
                status,
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(2), Constraint::Length(1)]).split(inner);

        let header = Row::new(
            view.columns
                .iter()
                .map(|c| TableCell::from(*c))
                .collect::<Vec<_>>(),
        )
        .style(theme::table_header());

        match view.rows.first() {
            Some(TableRow::Placeholder { text, .. }) => {
                let body = Layout::vertical([Constraint::Length(2), Constraint::Min(1)])
                    .split(layout[0]);
                frame.render_widget(Table::new(Vec::<Row>::new(), self.widths()).header(header), body[0]);
                frame.render_widget(
                    Paragraph::new(text.clone())
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(theme::BORDER_GRAY)),
                    body[1],
                );
            }
            _ => {
                let rows: Vec<Row> = view
                    .rows
                    .iter()
                    .enumerate()
                    .filter_map(|(i, row)| match row {
                        TableRow::Data(cells) => {
                            let style = if i % 2 == 0 {
                                theme::table_row()
                            } else {
                                theme::table_row_alt()
                            };
                            Some(Row::new(cells.iter().map(render_cell).collect::<Vec<_>>()).style(style))
                        }
                        TableRow::Placeholder { .. } => None,
                    })
                    .collect();
                frame.render_widget(Table::new(rows, self.widths()).header(header), layout[0]);
            }
        }

        let (info, hints) = pager_line(view);
        frame.render_widget(Paragraph::new(info), layout[1]);
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        match self.table {
            TableId::Metrics => "metrics",
            TableId::Notifications => "notifications",
        }
    }
}
