//! Horizontal sub-tab bar used inside screens (e.g., the time-range
//! selector on the overview).

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// Renders a horizontal tab bar line with the active tab highlighted.
///
/// The active tab gets Electric Purple in brackets; inactive tabs get Dim White.
pub fn render_sub_tabs(labels: &[String], active_index: Option<usize>) -> Line<'static> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if Some(i) == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label.clone(), theme::tab_inactive()));
        }
    }

    Line::from(spans)
}
