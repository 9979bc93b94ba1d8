//! Inline progress bar for table cells, where a full `Gauge` widget
//! cannot be placed.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use pulseboard_core::Severity;

use crate::theme;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Number of filled cells for `percent` in a bar `width` cells wide.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn filled_cells(percent: f64, width: usize) -> usize {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    ((ratio * width as f64).round() as usize).min(width)
}

/// `██████░░ 97.5%` colored by severity.
pub fn progress_line(percent: f64, label: &str, severity: Severity, width: usize) -> Line<'static> {
    let filled = filled_cells(percent, width);
    let color = theme::severity_color(severity);

    Line::from(vec![
        Span::styled(FILLED.to_string().repeat(filled), Style::default().fg(color)),
        Span::styled(
            EMPTY.to_string().repeat(width - filled),
            Style::default().fg(theme::BORDER_GRAY),
        ),
        Span::styled(format!(" {label}"), Style::default().fg(color)),
    ])
}
