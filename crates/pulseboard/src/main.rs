mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pulseboard_core::{ApiClient, CoreError};

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "pulseboard", &mut std::io::stdout());
            Ok(())
        }

        // Config commands don't need a backend connection
        Command::Config(args) => {
            let cfg = config::load_config()?;
            commands::config_cmd::handle(&args, &cli.global, &cfg)
        }

        // All other commands talk to the backend
        cmd => {
            let cfg = config::load_config()?;
            let dashboard = config::resolve_dashboard_config(&cli.global, &cfg)?;
            let client = ApiClient::new(dashboard.url.clone(), &dashboard.transport())
                .map_err(CoreError::from)?;

            let ctx = Context {
                client,
                config: dashboard,
                format: config::output_format(&cli.global, &cfg),
                color: output::should_color(config::color_mode(&cli.global, &cfg)),
                quiet: cli.global.quiet,
            };

            tracing::debug!(command = ?cmd, url = %ctx.config.url, "dispatching command");
            commands::dispatch(&cmd, &ctx).await
        }
    }
}
