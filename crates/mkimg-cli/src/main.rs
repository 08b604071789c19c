//! mkimg CLI
//!
//! Resolves the build configuration from the site config, command-line
//! overrides and an optional kickstart, then reports it.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!("Verbose mode enabled");

    match &cli.command {
        Some(Commands::Probe) => commands::run_probe(),
        Some(Commands::Show { json }) => {
            let config = context::load_config(&cli)?;
            commands::run_show(&config, *json)
        }
        Some(Commands::Bootstraps) => {
            let config = context::load_config(&cli)?;
            commands::run_bootstraps(&config)
        }
        None => {
            println!("{} image build configuration", "mkimg".green().bold());
            println!();
            println!("Run {} for available commands.", "mkimg --help".cyan());
            Ok(())
        }
    }
}
