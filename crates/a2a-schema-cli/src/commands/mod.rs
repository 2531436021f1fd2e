//! CLI command definitions and dispatch.

pub mod card;
pub mod codes;
pub mod request;
pub mod response;
pub mod schema;

use std::io::Read;
use std::path::{Path, PathBuf};

use a2a_schema::{A2AError, Codec};
use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{json, Value};

use crate::config::CliConfig;

/// A2A schema CLI — validate agent-to-agent protocol documents.
#[derive(Parser)]
#[command(
    name = "a2a-schema",
    version,
    about = "🧾 a2a-schema — Validate A2A requests, responses and agent cards",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.a2a-schema/config.toml).
    #[arg(long, global = true, env = "A2A_SCHEMA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📨 Decode a JSON-RPC request and report the method or the error reply.
    Request(request::RequestArgs),

    /// 📬 Decode the response to a request for a given method.
    Response(response::ResponseArgs),

    /// 🪪 Decode and validate an agent card.
    Card(card::CardArgs),

    /// 📐 Print the JSON Schema of a protocol entity.
    Schema(schema::SchemaArgs),

    /// 🔢 List the protocol's error codes.
    Codes,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Execute the CLI command.
pub fn execute(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    let codec = Codec::new(config.validation);
    match cli.command {
        Commands::Request(args) => request::execute(args, &codec, cli.output),
        Commands::Response(args) => response::execute(args, &codec, cli.output),
        Commands::Card(args) => card::execute(args, &codec, cli.output),
        Commands::Schema(args) => schema::execute(args),
        Commands::Codes => codes::execute(cli.output),
    }
}

/// Read a file, or stdin when no path (or `-`) is given.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The `--output json` body for a rejected document.
pub fn rejection_json(err: &A2AError) -> Value {
    json!({"valid": false, "error": err})
}

/// Print the rejection and turn it into the command's error.
pub fn report_rejection(subject: &str, err: A2AError, output: OutputFormat) -> anyhow::Error {
    match output {
        OutputFormat::Json => {
            if let Ok(text) = serde_json::to_string_pretty(&rejection_json(&err)) {
                println!("{text}");
            }
        }
        OutputFormat::Text => {
            println!(
                "\n  {} {}: {}",
                "✗".red().bold(),
                err.code().name().bold(),
                err.message()
            );
            if let Some(data) = err.data() {
                println!("  {} {}\n", "→".dimmed(), data);
            }
        }
    }
    anyhow::anyhow!("{subject} rejected: {err}")
}
