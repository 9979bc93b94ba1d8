//! Config subcommand handlers.

use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
}

fn profile_rows(cfg: &Config, active: &str) -> Vec<ProfileRow> {
    cfg.profiles
        .iter()
        .map(|(name, p)| ProfileRow {
            active: if name == active { "*" } else { "" },
            name: name.clone(),
            url: p.api_url.clone(),
        })
        .collect()
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);

    match args.command {
        ConfigCommand::Show => {
            let out = match format {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(cfg)?,
                other => output::render_single(other, cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let active = config::active_profile_name(global, cfg);
            let rows = profile_rows(cfg, &active);
            let out = match format {
                OutputFormat::Table if rows.is_empty() => {
                    format!("No profiles configured ({})", config::config_path().display())
                }
                OutputFormat::Table => output::render_table(&rows),
                OutputFormat::Plain => rows
                    .iter()
                    .map(|r| r.name.clone())
                    .collect::<Vec<_>>()
                    .join("\n"),
                other => output::render_single(
                    other,
                    &cfg.profiles,
                    |_| String::new(),
                    |_| String::new(),
                ),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
