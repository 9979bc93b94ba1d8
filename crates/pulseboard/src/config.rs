//! CLI configuration: thin wrapper around `pulseboard_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --timeout, --insecure).

use std::time::Duration;

use clap::ValueEnum;

use pulseboard_core::DashboardConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use pulseboard_config::{Config, config_path, load_config, parse_api_url};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| pulseboard_config::DEFAULT_PROFILE.into())
}

/// Build a `DashboardConfig` from the profile plus global flag overrides.
///
/// Flags win over the profile, which wins over `[defaults]`.
pub fn resolve_dashboard_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<DashboardConfig, CliError> {
    let name = active_profile_name(global, config);
    let mut dashboard = config.dashboard_config(Some(&name))?;

    if let Some(ref raw) = global.url {
        dashboard.url = parse_api_url(raw)?;
    }
    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        dashboard.accept_invalid_certs = true;
    }

    Ok(dashboard)
}

/// `--output`, else `defaults.output`, else table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// `--color`, else `defaults.color`, else auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global.color.unwrap_or_else(|| {
        ColorMode::from_str(&config.defaults.color, true).unwrap_or(ColorMode::Auto)
    })
}
