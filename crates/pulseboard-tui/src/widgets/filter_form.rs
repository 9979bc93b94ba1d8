//! Filter form overlay: start date, end date, and keyword.
//!
//! Holds raw text while editing; nothing is parsed until Enter. A date that
//! fails to parse keeps the form open and surfaces an error toast.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use pulseboard_core::FilterCriteria;

use crate::action::{Action, Notification};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    StartDate,
    EndDate,
    Keyword,
}

impl FilterField {
    const ALL: [Self; 3] = [Self::StartDate, Self::EndDate, Self::Keyword];

    fn label(self) -> &'static str {
        match self {
            Self::StartDate => "Start date (YYYY-MM-DD)",
            Self::EndDate => "End date (YYYY-MM-DD)",
            Self::Keyword => "Keyword",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    start_date: String,
    end_date: String,
    keyword: String,
    active: FilterField,
}

impl FilterForm {
    /// Pre-fill from the filters currently applied.
    pub fn new(current: &FilterCriteria) -> Self {
        Self {
            start_date: current.start_date.map(|d| d.to_string()).unwrap_or_default(),
            end_date: current.end_date.map(|d| d.to_string()).unwrap_or_default(),
            keyword: current.keyword.clone().unwrap_or_default(),
            active: FilterField::StartDate,
        }
    }

    fn input_mut(&mut self) -> &mut String {
        match self.active {
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::Keyword => &mut self.keyword,
        }
    }

    fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::Keyword => &self.keyword,
        }
    }

    /// Parse the inputs into criteria.
    fn submit(&self) -> Action {
        match FilterCriteria::from_inputs(&self.start_date, &self.end_date, &self.keyword) {
            Ok(criteria) => Action::ApplyFilter(criteria),
            Err(e) => Action::Notify(Notification::error(e.to_string())),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CloseFilter),
            KeyCode::Enter => Some(self.submit()),
            KeyCode::Tab | KeyCode::Down => {
                self.active = self.active.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = self.active.prev();
                None
            }
            KeyCode::Backspace => {
                self.input_mut().pop();
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input_mut().clear();
                None
            }
            KeyCode::Char(c) => {
                self.input_mut().push(c);
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 15u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        frame.render_widget(Clear, panel);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(" Filters ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let rows = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(inner);

        for (field, row) in FilterField::ALL.iter().zip(rows.iter()) {
            self.render_input_field(frame, *row, *field);
        }

        let hints = Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("next  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("apply  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[3]);
    }

    fn render_input_field(&self, frame: &mut Frame, area: Rect, field: FilterField) {
        if area.height < 4 {
            return;
        }
        let active = field == self.active;

        let label_style = if active {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", field.label()), label_style)),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let border = if active {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let cursor = if active { "▏" } else { "" };
        let input = Paragraph::new(Line::from(vec![
            Span::styled(self.value(field).to_owned(), Style::default().fg(theme::DIM_WHITE)),
            Span::styled(cursor, Style::default().fg(theme::ELECTRIC_PURPLE)),
        ]))
        .block(block);
        frame.render_widget(input, Rect::new(area.x, area.y + 1, area.width, 3));
    }
}
