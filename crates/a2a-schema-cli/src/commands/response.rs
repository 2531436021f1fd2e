//! `a2a-schema response` — decode the response to a request.

use std::path::PathBuf;

use a2a_schema::transport::stream::StreamResponse;
use a2a_schema::{A2AResponse, Codec, Method};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use super::{print_json, read_input, report_rejection, OutputFormat};

#[derive(Args)]
pub struct ResponseArgs {
    /// Method of the request being answered, e.g. `tasks/get`.
    #[arg(long, short, value_parser = parse_method)]
    pub method: Method,

    /// JSON file holding the response (stdin when omitted). Streaming methods
    /// accept an SSE body or one response per line.
    pub file: Option<PathBuf>,
}

fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|e| e.to_string())
}

pub fn execute(args: ResponseArgs, codec: &Codec, output: OutputFormat) -> anyhow::Result<()> {
    let text = read_input(args.file.as_deref())?;

    if args.method.is_streaming() {
        let responses = codec
            .decode_stream(args.method, &text)
            .map_err(|e| report_rejection("response", e, output))?;
        match output {
            OutputFormat::Json => print_json(&json!({
                "valid": true,
                "method": args.method,
                "events": responses.len(),
            }))?,
            OutputFormat::Text => {
                println!(
                    "\n  {} Valid {} stream ({} events)\n",
                    "✓".green().bold(),
                    args.method.as_str().cyan(),
                    responses.len()
                );
                for (i, response) in responses.iter().enumerate() {
                    match (response.result(), response.error_value()) {
                        (Some(item), _) => println!("  {:>3}  {}", i, describe(item)),
                        (None, Some(err)) => {
                            println!("  {:>3}  {} {}", i, "error".red(), err.message())
                        }
                        (None, None) => {}
                    }
                }
                println!();
            }
        }
        return Ok(());
    }

    let response = codec
        .decode_response(args.method, &text)
        .map_err(|e| report_rejection("response", e, output))?;
    match output {
        OutputFormat::Json => print_json(&json!({
            "valid": true,
            "method": response.method(),
            "id": response.id(),
            "error": response.error(),
        }))?,
        OutputFormat::Text => print_single(&response),
    }
    Ok(())
}

fn print_single(response: &A2AResponse) {
    println!(
        "\n  {} Valid {} response\n",
        "✓".green().bold(),
        response.method().as_str().cyan()
    );
    if let Some(id) = response.id() {
        println!("  {:<8} {}", "Id:".bold(), id);
    }
    match response.error() {
        Some(err) => println!(
            "  {:<8} {} {} ({})",
            "Error:".bold(),
            err.code().name().red(),
            err.message(),
            err.code()
        ),
        None => println!("  {:<8} {}", "Result:".bold(), "ok".green()),
    }
    println!();
}

fn describe(item: &StreamResponse) -> String {
    match item {
        StreamResponse::StatusUpdate(event) => format!(
            "status-update  {}  {}{}",
            event.task_id,
            event.status.state,
            if event.is_final { " (final)" } else { "" }
        ),
        StreamResponse::ArtifactUpdate(event) => format!(
            "artifact-update  {}  {}",
            event.task_id, event.artifact.artifact_id
        ),
        StreamResponse::Task(task) => format!("task  {}  {}", task.id, task.state()),
        StreamResponse::Message(message) => format!("message  {}", message.message_id),
    }
}
