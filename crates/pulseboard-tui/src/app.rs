//! Application core: event loop, screen management, action dispatch.
//!
//! `App` is the single owner of [`DashboardState`]. Every user key,
//! scheduler tick, and completed fetch becomes an [`Action`]; state entry
//! points return refresh plans which the [`Controller`] executes, and each
//! applied outcome republishes an immutable [`DashboardView`] to the screens.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pulseboard_core::{
    Controller, ControllerEvent, DashboardState, DashboardView, RefreshPlan, ScheduleTick, Trigger,
    WidgetId,
};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::filter_form::FilterForm;

/// How long a toast stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Toasts stacked on screen at once; the oldest is dropped beyond this.
/// One refresh can fail every widget and still report success.
const MAX_NOTIFICATIONS: usize = WidgetId::ALL.len() + 1;

/// Below this width the tab bar uses short labels.
const NARROW_WIDTH: u16 = 60;

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Open filter form, if any. Takes all key input while open.
    filter_form: Option<FilterForm>,
    /// Visible toasts, oldest first, each with its display timestamp.
    notifications: VecDeque<(Notification, Instant)>,
    throbber_state: ThrobberState,
    terminal_size: (u16, u16),

    state: DashboardState,
    view: Arc<DashboardView>,
    controller: Controller,
    /// Taken by the data bridge when the loop starts.
    controller_events: Option<mpsc::UnboundedReceiver<ControllerEvent>>,

    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        controller: Controller,
        controller_events: mpsc::UnboundedReceiver<ControllerEvent>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let state = DashboardState::new(controller.config());
        let view = Arc::new(DashboardView::build(&state));

        Self {
            active_screen: ScreenId::Overview,
            screens: create_screens().into_iter().collect(),
            running: true,
            help_visible: false,
            filter_form: None,
            notifications: VecDeque::with_capacity(MAX_NOTIFICATIONS),
            throbber_state: ThrobberState::default(),
            terminal_size: (0, 0),
            state,
            view,
            controller,
            controller_events: Some(controller_events),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }

        let bridge_cancel = CancellationToken::new();
        if let Some(events) = self.controller_events.take() {
            tokio::spawn(spawn_data_bridge(
                events,
                self.action_tx.clone(),
                bridge_cancel.clone(),
            ));
        }
        self.controller.start_schedulers().await;

        // Initial load is silent, like a background refresh
        let plan = self.state.full_refresh(Trigger::Background);
        self.execute(plan)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        bridge_cancel.cancel();
        self.controller.shutdown().await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Hand a plan to the controller and show its widgets as loading.
    fn execute(&mut self, plan: RefreshPlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }
        debug!(widgets = ?plan.widgets(), "executing refresh plan");
        self.controller.execute(plan);
        self.publish_view()
    }

    /// Rebuild the view model and hand it to every screen.
    fn publish_view(&mut self) -> Result<()> {
        self.view = Arc::new(DashboardView::build(&self.state));
        self.action_tx
            .send(Action::ViewUpdated(Arc::clone(&self.view)))?;
        Ok(())
    }

    /// Map a key event to an action. Overlays take input first, then
    /// global keys; anything left goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(ref mut form) = self.filter_form {
            return Ok(form.handle_key_event(key));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let action = match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Action::Refresh),
            (KeyModifiers::NONE, KeyCode::Char('t')) => Some(Action::CycleTimeRange),
            (KeyModifiers::NONE, KeyCode::Char('f')) => Some(Action::OpenFilter),
            (KeyModifiers::NONE, KeyCode::Char('x')) => Some(Action::ResetFilters),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => c
                .to_digit(10)
                .and_then(|n| u8::try_from(n).ok())
                .and_then(ScreenId::from_number)
                .map(Action::SwitchScreen),
            (KeyModifiers::NONE, KeyCode::Tab) => {
                Some(Action::SwitchScreen(self.active_screen.next()))
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                Some(Action::SwitchScreen(self.active_screen.prev()))
            }
            _ => None,
        };
        if action.is_some() {
            return Ok(action);
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => self.terminal_size = (*w, *h),

            Action::Tick => {
                self.notifications.retain(|(_, shown)| shown.elapsed() < NOTIFICATION_TTL);
                if self.view.is_loading() {
                    self.throbber_state.calc_next();
                }
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        debug!(screen = screen.id(), "focused");
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Dashboard controls ──
            Action::Refresh => {
                let plan = self.state.full_refresh(Trigger::User);
                self.execute(plan)?;
            }
            Action::NextPage(table) => {
                let plan = self.state.next_page(*table);
                self.execute(plan)?;
            }
            Action::PrevPage(table) => {
                if let Some(plan) = self.state.prev_page(*table) {
                    self.execute(plan)?;
                }
            }
            Action::CycleTimeRange => {
                let plan = self.state.cycle_time_range();
                self.execute(plan)?;
            }
            Action::OpenFilter => {
                self.filter_form = Some(FilterForm::new(self.state.filters()));
            }
            Action::CloseFilter => self.filter_form = None,
            Action::ApplyFilter(criteria) => {
                self.filter_form = None;
                let plan = self.state.apply_filters(criteria.clone());
                self.execute(plan)?;
            }
            Action::ResetFilters => {
                let plan = self.state.clear_filters();
                self.execute(plan)?;
            }

            // ── Controller events ──
            Action::Fetched(outcome) => {
                let effect = self.state.apply(outcome.clone());
                for toast in effect.toasts {
                    self.action_tx.send(Action::Notify(toast.into()))?;
                }
                if effect.applied {
                    self.publish_view()?;
                }
            }
            Action::Scheduled(tick) => {
                let plan = match tick {
                    ScheduleTick::Refresh => self.state.full_refresh(Trigger::Background),
                    ScheduleTick::Health => self.state.poll_health(),
                };
                self.execute(plan)?;
            }

            Action::ViewUpdated(_) => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Notify(n) => {
                if self.notifications.len() == MAX_NOTIFICATIONS {
                    self.notifications.pop_front();
                }
                self.notifications.push_back((n.clone(), Instant::now()));
            }

            Action::Render => {}
        }

        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(ref form) = self.filter_form {
            form.render(frame, area);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
        // Newest toast sits in the bottom-right corner, older ones above it.
        for (slot, (n, _)) in self.notifications.iter().rev().enumerate() {
            let slot = u16::try_from(slot).unwrap_or(u16::MAX);
            if !render_notification(frame, area, n, slot) {
                break;
            }
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let narrow = self.terminal_size.0 < NARROW_WIDTH;
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow { id.label_short() } else { id.label() };
                Line::from(Span::styled(format!(" {} {label} ", id.number()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Loading throbber, time range, filters, and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Length(14), Constraint::Min(1)]).split(area);

        if self.view.is_loading() {
            let throbber = Throbber::default()
                .label("loading")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, cols[0], &mut self.throbber_state.clone());
        } else {
            let health = &self.view.health;
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" ● {}", health.text),
                    Style::default().fg(theme::severity_color(health.severity)),
                )),
                cols[0],
            );
        }

        let line = Line::from(vec![
            Span::styled(format!("│ last {}d ", self.view.days), theme::key_hint()),
            Span::styled(
                format!("│ filters: {} ", self.view.filters.describe()),
                theme::key_hint(),
            ),
            Span::styled("│ ", theme::key_hint()),
            Span::styled("r", theme::key_hint_key()),
            Span::styled(" refresh  ", theme::key_hint()),
            Span::styled("f", theme::key_hint_key()),
            Span::styled(" filter  ", theme::key_hint()),
            Span::styled("?", theme::key_hint_key()),
            Span::styled(" help  ", theme::key_hint()),
            Span::styled("q", theme::key_hint_key()),
            Span::styled(" quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), cols[1]);
    }
}

fn help_row(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
        Span::styled(label, theme::key_hint()),
    ])
}

fn help_section(title: &'static str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        )),
        Line::from(Span::styled(
            format!("  {}", "─".repeat(title.chars().count())),
            theme::key_hint(),
        )),
    ]
}

/// Keyboard shortcuts, centered on screen.
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 52u16.min(area.width.saturating_sub(4));
    let height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let mut text = vec![Line::from("")];
    text.extend(help_section("Navigation"));
    text.extend([
        help_row("1-3", "Jump to screen"),
        help_row("Tab", "Next screen"),
        help_row("← p / n →", "Previous / next page"),
        Line::from(""),
    ]);
    text.extend(help_section("Dashboard"));
    text.extend([
        help_row("r", "Refresh everything"),
        help_row("t", "Cycle time range (1/7/30/90 days)"),
        help_row("f", "Edit filters"),
        help_row("x", "Reset filters"),
        Line::from(""),
    ]);
    text.extend(help_section("Global"));
    text.extend([
        help_row("?", "This help"),
        help_row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "                 Esc or ? to close",
            theme::key_hint(),
        )),
    ]);

    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
/// Draw one toast in stack position `slot` (0 = bottom). Returns `false`
/// when the slot no longer fits on screen.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification, slot: u16) -> bool {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len
        .saturating_add(6)
        .clamp(20, 60)
        .min(area.width.saturating_sub(2));
    let height = 3u16;

    let Some(y) = area
        .height
        .checked_sub(height + 2)
        .and_then(|bottom| bottom.checked_sub(slot.saturating_mul(height)))
    else {
        return false;
    };
    let x = area.width.saturating_sub(width + 1);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
    };

    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        toast_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.clone(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulseboard_core::{DashboardConfig, TableId, Toast, ToastLevel, WidgetId, WidgetStatus};

    use super::*;

    fn app() -> App {
        let config = DashboardConfig::default();
        let (controller, events) = Controller::new(config).unwrap();
        App::new(controller, events)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn global_keys_map_to_dashboard_actions() {
        let mut app = app();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('r'))).unwrap(),
            Some(Action::Refresh)
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('3'))).unwrap(),
            Some(Action::SwitchScreen(ScreenId::Notifications))
        ));
        assert!(app.handle_key_event(key(KeyCode::Char('7'))).unwrap().is_none());
    }

    #[tokio::test]
    async fn open_filter_form_captures_keys() {
        let mut app = app();
        app.process_action(&Action::OpenFilter).unwrap();
        // 'q' is typed into the form instead of quitting
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseFilter)
        ));
    }

    #[tokio::test]
    async fn paging_marks_only_that_table_loading() {
        let mut app = app();
        app.process_action(&Action::NextPage(TableId::Metrics)).unwrap();

        assert_eq!(*app.view.status(WidgetId::MetricsTable), WidgetStatus::Loading);
        assert_eq!(
            *app.view.status(WidgetId::NotificationsTable),
            WidgetStatus::Idle
        );
        assert!(matches!(app.action_rx.try_recv(), Ok(Action::ViewUpdated(_))));
    }

    #[tokio::test]
    async fn prev_on_first_page_does_nothing() {
        let mut app = app();
        app.process_action(&Action::PrevPage(TableId::Metrics)).unwrap();
        assert!(app.action_rx.try_recv().is_err());
        assert!(!app.view.is_loading());
    }

    #[tokio::test]
    async fn tab_cycles_from_active_screen() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Notifications))
            .unwrap();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Tab)).unwrap(),
            Some(Action::SwitchScreen(ScreenId::Overview))
        ));
    }

    #[tokio::test]
    async fn refresh_toasts_stack_and_expire_individually() {
        let mut app = app();
        for toast in [
            Toast {
                level: ToastLevel::Error,
                message: "Error loading summary data".into(),
            },
            Toast {
                level: ToastLevel::Error,
                message: "Error loading chart data".into(),
            },
            Toast {
                level: ToastLevel::Success,
                message: "Dashboard refreshed".into(),
            },
        ] {
            app.process_action(&Action::Notify(toast.into())).unwrap();
        }

        let messages: Vec<_> = app
            .notifications
            .iter()
            .map(|(n, _)| n.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Error loading summary data",
                "Error loading chart data",
                "Dashboard refreshed"
            ]
        );

        // Age only the first toast past its TTL.
        let stale = Instant::now()
            .checked_sub(NOTIFICATION_TTL + Duration::from_millis(10))
            .unwrap();
        app.notifications[0].1 = stale;
        app.process_action(&Action::Tick).unwrap();

        assert_eq!(app.notifications.len(), 2);
        assert_eq!(app.notifications[0].0.level, NotificationLevel::Error);
        assert_eq!(app.notifications[1].0.level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn toast_stack_drops_oldest_when_full() {
        let mut app = app();
        for i in 0..=MAX_NOTIFICATIONS {
            app.process_action(&Action::Notify(Notification::error(format!("toast {i}"))))
                .unwrap();
        }
        assert_eq!(app.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(app.notifications[0].0.message, "toast 1");
    }
}
