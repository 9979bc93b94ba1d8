//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use pulseboard_core::{
    DashboardView, FetchOutcome, FilterCriteria, ScheduleTick, TableId, Toast, ToastLevel,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast shown in the bottom-right corner until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

impl From<Toast> for Notification {
    fn from(toast: Toast) -> Self {
        let level = match toast.level {
            ToastLevel::Success => NotificationLevel::Success,
            ToastLevel::Error => NotificationLevel::Error,
        };
        Self {
            message: toast.message,
            level,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Dashboard controls ──
    Refresh,
    NextPage(TableId),
    PrevPage(TableId),
    CycleTimeRange,
    OpenFilter,
    CloseFilter,
    ApplyFilter(FilterCriteria),
    ResetFilters,

    // ── Controller events ──
    Fetched(FetchOutcome),
    Scheduled(ScheduleTick),

    // ── Render data ──
    ViewUpdated(Arc<DashboardView>),

    // ── Notifications ──
    Notify(Notification),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_levels_map_onto_notifications() {
        let n = Notification::from(Toast {
            level: ToastLevel::Error,
            message: "Error loading chart data".into(),
        });
        assert_eq!(n, Notification::error("Error loading chart data"));
    }
}
