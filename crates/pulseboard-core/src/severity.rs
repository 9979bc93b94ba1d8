// ── Severity banding ──

use serde::Serialize;

/// Visual severity shared by progress bars and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

/// Band an uptime percentage. Lower bounds are inclusive.
///
/// `>= 99` success, `>= 95` info, `>= 90` warning, otherwise danger.
pub fn classify_uptime(value: f64) -> Severity {
    if value >= 99.0 {
        Severity::Success
    } else if value >= 95.0 {
        Severity::Info
    } else if value >= 90.0 {
        Severity::Warning
    } else {
        Severity::Danger
    }
}
