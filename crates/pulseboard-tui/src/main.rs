//! `pulseboard-tui`: terminal dashboard for the pulseboard metrics backend.
//!
//! Built on [ratatui](https://ratatui.rs) over `pulseboard-core`'s
//! [`DashboardState`](pulseboard_core::DashboardState). Screens are
//! navigable via number keys (1-3): Overview, Metrics, and Notifications.
//!
//! Logs are written to a file (default `/tmp/pulseboard-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge forwards fetch
//! results and scheduler ticks from the controller into the action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pulseboard_core::{Controller, DashboardConfig};

use crate::app::App;

/// Terminal dashboard for uptime, connected users, and notifications.
#[derive(Parser, Debug)]
#[command(name = "pulseboard-tui", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:5000)
    #[arg(short = 'u', long, env = "PULSEBOARD_URL")]
    url: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "PULSEBOARD_PROFILE")]
    profile: Option<String>,

    /// Seconds between background refreshes (0 disables)
    #[arg(long, env = "PULSEBOARD_REFRESH_INTERVAL")]
    refresh_interval: Option<u64>,

    /// Log file path (defaults to /tmp/pulseboard-tui.log)
    #[arg(long, default_value = "/tmp/pulseboard-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr; that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pulseboard_tui={log_level},pulseboard_core={log_level},pulseboard_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("pulseboard-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the dashboard config. Priority: CLI flags > config file > defaults.
fn build_config(cli: &Cli) -> Result<DashboardConfig> {
    let cfg = pulseboard_config::load_config_or_default();
    let mut config = cfg.dashboard_config(cli.profile.as_deref())?;

    if let Some(ref url) = cli.url {
        config.url = pulseboard_config::parse_api_url(url)?;
    }
    if let Some(secs) = cli.refresh_interval {
        config.refresh_interval_secs = secs;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = build_config(&cli)?;
    info!(
        url = %config.url,
        refresh_secs = config.refresh_interval_secs,
        health_secs = config.health_interval_secs,
        "starting pulseboard-tui"
    );

    let (controller, events) = Controller::new(config)?;
    let mut app = App::new(controller, events);
    app.run().await?;

    Ok(())
}
