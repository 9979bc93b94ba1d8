//! Screen implementations. Each screen is a top-level Component.

pub mod overview;
pub mod table;

use pulseboard_core::TableId;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Overview, Box::new(overview::OverviewScreen::new())),
        (
            ScreenId::Metrics,
            Box::new(table::TableScreen::new(TableId::Metrics)),
        ),
        (
            ScreenId::Notifications,
            Box::new(table::TableScreen::new(TableId::Notifications)),
        ),
    ]
}
