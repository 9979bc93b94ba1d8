//! Command dispatch: bridges CLI args -> backend queries -> output formatting.

pub mod config_cmd;
pub mod health;
pub mod records;
pub mod summary;

use pulseboard_core::{ApiClient, DashboardConfig};

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;

/// Everything a backend-bound handler needs, resolved once in `main`.
pub struct Context {
    pub client: ApiClient,
    pub config: DashboardConfig,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: &Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Summary(args) => summary::handle(ctx, args).await,
        Command::Metrics(args) => records::handle_metrics(ctx, args).await,
        Command::Notifications(args) => records::handle_notifications(ctx, args).await,
        Command::Health => health::handle(ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not talk to the backend".into(),
        )),
    }
}
