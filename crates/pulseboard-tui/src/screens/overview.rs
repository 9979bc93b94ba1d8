//! Overview screen: summary cards, health, and the two trend charts.
//!
//! Layout:
//! ┌─ Avg Uptime ─┐┌─ Max Users ─┐┌─ Avg Users ─┐┌─ Suspicious ─┐
//! │ 98.1% ████   ││ 42          ││ 20          ││ 3            │
//! └──────────────┘└─────────────┘└─────────────┘└──────────────┘
//!  ● Healthy  Last checked: 12:00:00      Range: 1d [7d] 30d 90d
//! ┌─ Uptime % ──────────────────┐┌─ Connected Users ────────────┐
//! │ Braille line, y 90–100      ││ area fill + Braille line     │
//! └─────────────────────────────┘└──────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
};

use pulseboard_core::{
    ChartSeries, DashboardView, SeriesId, TIME_RANGE_DAYS, WidgetId, WidgetStatus,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs;

/// The uptime axis never starts above this, so small dips stay visible.
const UPTIME_AXIS_FLOOR: f64 = 90.0;

pub struct OverviewScreen {
    focused: bool,
    view: Option<Arc<DashboardView>>,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: None,
        }
    }

    fn panel(&self, title: &str) -> Block<'static> {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect, view: &DashboardView) {
        let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let summary = &view.summary;
        let failed = matches!(view.status(WidgetId::Summary), WidgetStatus::Failed(_));

        // Avg uptime: value over a severity-colored gauge
        let block = self.panel("Avg Uptime");
        let inner = block.inner(cols[0]);
        frame.render_widget(block, cols[0]);
        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);
        frame.render_widget(big_number(&summary.avg_uptime, failed), rows[0]);
        frame.render_widget(
            Gauge::default()
                .gauge_style(
                    Style::default()
                        .fg(theme::severity_color(summary.uptime_severity))
                        .bg(theme::BG_HIGHLIGHT),
                )
                .ratio(summary.uptime_percent / 100.0)
                .label(""),
            rows[1],
        );

        let cards = [
            ("Max Concurrent Users", &summary.max_concurrent_users),
            ("Avg Users", &summary.avg_users),
            ("Suspicious Activities", &summary.suspicious_activities),
        ];
        for ((title, value), area) in cards.into_iter().zip(cols.iter().skip(1)) {
            let block = self.panel(title);
            let inner = block.inner(*area);
            frame.render_widget(block, *area);
            frame.render_widget(big_number(value, failed), inner);
        }
    }

    #[allow(clippy::unused_self)]
    fn render_status_line(&self, frame: &mut Frame, area: Rect, view: &DashboardView) {
        let cols = Layout::horizontal([Constraint::Min(30), Constraint::Length(34)]).split(area);

        let health = &view.health;
        let color = theme::severity_color(health.severity);
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(format!(" {} ", health.text), theme::badge(health.severity)),
        ];
        if let Some(ref checked) = health.last_checked {
            spans.push(Span::styled(format!("  {checked}"), theme::key_hint()));
        }
        if let Some(ref error) = health.error {
            spans.push(Span::styled(format!("  {error}"), Style::default().fg(color)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

        let labels: Vec<String> = TIME_RANGE_DAYS.iter().map(|d| format!("{d}d")).collect();
        let active = TIME_RANGE_DAYS.iter().position(|&d| d == view.days);
        let mut range = vec![Span::styled("Range: ", theme::key_hint())];
        range.extend(sub_tabs::render_sub_tabs(&labels, active).spans);
        frame.render_widget(
            Paragraph::new(Line::from(range)).alignment(Alignment::Right),
            cols[1],
        );
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect, series: &ChartSeries, failed: bool) {
        let block = self.panel(&series.id.to_string());

        let Some((lo, hi)) = series.value_bounds() else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let text = if failed { "  Chart data unavailable" } else { "  No data yet" };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        };

        let data = chart_data(series);
        let x_max = index_f64(series.points.len().saturating_sub(1)).max(1.0);
        let (y_min, y_max) = y_bounds(series.id, lo, hi);

        let mut datasets = Vec::with_capacity(2);
        let color = match series.id {
            SeriesId::Uptime => theme::NEON_CYAN,
            SeriesId::Users => theme::CORAL,
        };
        // Users is drawn filled; fill renders first so the line sits on top
        if series.id == SeriesId::Users {
            datasets.push(
                Dataset::default()
                    .marker(Marker::HalfBlock)
                    .graph_type(GraphType::Bar)
                    .style(Style::default().fg(theme::USERS_FILL))
                    .data(&data),
            );
        }
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&data),
        );

        let axis_style = Style::default().fg(theme::BORDER_GRAY);
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(x_labels(series))
                    .style(axis_style),
            )
            .y_axis(
                Axis::default()
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::styled(format!("{y_min:.0}"), axis_style),
                        Span::styled(format!("{y_max:.0}"), axis_style),
                    ])
                    .style(axis_style),
            );

        frame.render_widget(chart, area);
    }
}

fn big_number(value: &str, failed: bool) -> Paragraph<'static> {
    let style = if failed {
        Style::default().fg(theme::ERROR_RED)
    } else {
        Style::default()
            .fg(theme::ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD)
    };
    Paragraph::new(Span::styled(format!(" {value}"), style))
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn index_f64(i: usize) -> f64 {
    i as f64
}

/// Points keyed by position, so gaps in time do not stretch the line.
fn chart_data(series: &ChartSeries) -> Vec<(f64, f64)> {
    series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (index_f64(i), p.value))
        .collect()
}

/// First, middle, and last point labels.
fn x_labels(series: &ChartSeries) -> Vec<Span<'static>> {
    let n = series.points.len();
    let mut picks = vec![0, n / 2, n.saturating_sub(1)];
    picks.dedup();
    picks
        .into_iter()
        .filter_map(|i| series.points.get(i))
        .map(|p| Span::styled(p.label.clone(), theme::key_hint()))
        .collect()
}

fn y_bounds(id: SeriesId, lo: f64, hi: f64) -> (f64, f64) {
    match id {
        SeriesId::Uptime => (lo.floor().min(UPTIME_AXIS_FLOOR), hi.ceil().max(100.0)),
        SeriesId::Users => (0.0, (hi * 1.1).max(1.0)),
    }
}

impl Component for OverviewScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewUpdated(view) = action {
            self.view = Some(Arc::clone(view));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref view) = self.view else {
            frame.render_widget(
                Paragraph::new("  Loading…").style(Style::default().fg(theme::BORDER_GRAY)),
                area,
            );
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(4), // summary cards
            Constraint::Length(1), // health + time range
            Constraint::Min(6),    // charts
        ])
        .split(area);

        self.render_cards(frame, layout[0], view);
        self.render_status_line(frame, layout[1], view);

        let charts = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(layout[2]);
        let failed = matches!(view.status(WidgetId::Charts), WidgetStatus::Failed(_));
        self.render_chart(frame, charts[0], &view.uptime_chart, failed);
        self.render_chart(frame, charts[1], &view.users_chart, failed);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "overview"
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pulseboard_core::ChartPoint;

    use super::*;

    fn series(id: SeriesId, values: &[f64]) -> ChartSeries {
        ChartSeries {
            id,
            points: values
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    let day = u32::try_from(i + 1).unwrap();
                    ChartPoint {
                        timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
                        label: format!("Jan {day}"),
                        value,
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn uptime_axis_spans_ninety_to_hundred() {
        assert_eq!(y_bounds(SeriesId::Uptime, 96.2, 99.8), (90.0, 100.0));
        assert_eq!(y_bounds(SeriesId::Uptime, 84.5, 99.0), (84.0, 100.0));
    }

    #[test]
    fn users_axis_starts_at_zero_with_headroom() {
        let (lo, hi) = y_bounds(SeriesId::Users, 3.0, 50.0);
        assert!(lo.abs() < f64::EPSILON);
        assert!((hi - 55.0).abs() < 1e-9);
    }

    #[test]
    fn x_labels_pick_first_middle_last() {
        let s = series(SeriesId::Users, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let labels: Vec<String> = x_labels(&s).iter().map(|l| l.content.to_string()).collect();
        assert_eq!(labels, vec!["Jan 1", "Jan 3", "Jan 5"]);

        let single = series(SeriesId::Users, &[1.0]);
        assert_eq!(x_labels(&single).len(), 1);
    }

    #[test]
    fn chart_data_is_indexed_by_position() {
        let s = series(SeriesId::Uptime, &[99.0, 97.0]);
        assert_eq!(chart_data(&s), vec![(0.0, 99.0), (1.0, 97.0)]);
    }
}
