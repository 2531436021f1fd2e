//! a2a-schema CLI — lint A2A protocol documents from the terminal.
//!
//! `a2a-schema` decodes JSON-RPC requests, responses and agent cards with the
//! same rules a conforming agent applies, and reports what it would reject.

mod commands;
mod config;
mod telemetry;

use clap::Parser;
use commands::{execute, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::CliConfig::load(cli.config.as_deref())?;
    telemetry::init_logging(&config.log)?;
    tracing::debug!(path = ?cli.config, validation = ?config.validation, "configuration loaded");
    execute(cli, config)
}
