//! Scaffold Pickers
//!
//! Headless list editors and cascading selectors for software-template
//! forms. This is the command-line entry point.

use clap::Parser;
use pickers_cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = pickers_cli::VERSION, "Starting scaffold-pickers");
    pickers_cli::run(cli)
}
