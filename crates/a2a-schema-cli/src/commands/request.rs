//! `a2a-schema request` — decode a JSON-RPC request.

use std::path::PathBuf;

use a2a_schema::{A2ARequest, Codec};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use super::{print_json, read_input, OutputFormat};

#[derive(Args)]
pub struct RequestArgs {
    /// JSON file holding the request (stdin when omitted).
    pub file: Option<PathBuf>,
}

pub fn execute(args: RequestArgs, codec: &Codec, output: OutputFormat) -> anyhow::Result<()> {
    let text = read_input(args.file.as_deref())?;

    match codec.decode_request(&text) {
        Ok(request) => {
            match output {
                OutputFormat::Json => print_json(&json!({
                    "valid": true,
                    "method": request.method(),
                    "id": request.id(),
                }))?,
                OutputFormat::Text => print_accepted(&request),
            }
            Ok(())
        }
        Err(rejection) => {
            let code = rejection.error.code();
            match output {
                OutputFormat::Json => print_json(&rejection)?,
                OutputFormat::Text => {
                    println!(
                        "\n  {} Rejected with {} ({})\n",
                        "✗".red().bold(),
                        code.name().bold(),
                        code
                    );
                    println!("  {}", "Error response:".dimmed());
                    for line in serde_json::to_string_pretty(&rejection)?.lines() {
                        println!("    {line}");
                    }
                    println!();
                }
            }
            anyhow::bail!("request rejected: {}", rejection.error)
        }
    }
}

fn print_accepted(request: &A2ARequest) {
    let method = request.method();
    println!("\n  {} Valid request\n", "✓".green().bold());
    println!("  {:<10} {}", "Method:".bold(), method.as_str().cyan());
    println!("  {:<10} {}", "Id:".bold(), request.id());
    if method.is_streaming() {
        println!("  {:<10} {}", "Reply:".bold(), "stream of responses".dimmed());
    }
    println!();
}
