//! Reusable widgets shared across screens.

pub mod filter_form;
pub mod progress;
pub mod sub_tabs;
