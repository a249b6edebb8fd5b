//! Lathe command-line rewriter

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use lathe::errors::{print_error, print_warning};
use lathe::{Configuration, Registry};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::*;

const LOG_ENV: &str = "LATHE_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            print_error("Failed to load configuration", &e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Rewrite { input, in_place, output } => {
            let destination = match (in_place, output) {
                (true, _) => Destination::InPlace,
                (false, Some(dir)) => Destination::Directory(dir),
                (false, None) => Destination::Stdout,
            };
            rewrite_units(&config, &input.paths, input.message_format, destination)
        }
        Commands::Check { input } => check_units(&config, &input.paths, input.message_format),
        Commands::Handlers => list_handlers(Registry::builtin()),
        Commands::Keys => list_keys(&config),
    };

    if let Err(e) = result {
        print_error("Command failed", &e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut config = Configuration::load(cli.config.as_deref(), Some(Path::new(".")))?;
    for assignment in &cli.overrides {
        config.apply_override(assignment)?;
    }
    for problem in config.validate() {
        print_warning(&problem.to_string());
    }
    Ok(config)
}

/// `LATHE_LOG` takes precedence over `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
