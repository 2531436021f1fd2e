//! `a2a-schema card` — decode and validate an agent card.

use std::path::PathBuf;

use a2a_schema::{AgentCard, Codec};
use anyhow::Context;
use clap::Args;
use colored::Colorize;

use super::{print_json, read_input, report_rejection, OutputFormat};

#[derive(Args)]
pub struct CardArgs {
    /// JSON file holding the card (stdin when omitted).
    pub file: Option<PathBuf>,
}

pub fn execute(args: CardArgs, codec: &Codec, output: OutputFormat) -> anyhow::Result<()> {
    let text = read_input(args.file.as_deref())?;
    let card = codec
        .decode_agent_card(&text)
        .map_err(|err| report_rejection("agent card", err, output))?;

    match output {
        OutputFormat::Json => print_json(&card)?,
        OutputFormat::Text => print_summary(&card)?,
    }
    Ok(())
}

fn print_summary(card: &AgentCard) -> anyhow::Result<()> {
    println!("\n  {} {} v{}", "✓".green().bold(), card.name.bold(), card.version);
    println!("  {}", card.description.dimmed());
    println!();
    println!("  {:<12} {}", "Protocol:".bold(), card.protocol_version);
    for (i, interface) in card.interfaces().iter().enumerate() {
        let label = if i == 0 { "Endpoint:" } else { "" };
        println!("  {:<12} {} ({})", label.bold(), interface.url.cyan(), interface.transport);
    }
    println!(
        "  {:<12} streaming={} push={}",
        "Features:".bold(),
        card.supports_streaming(),
        card.supports_push_notifications()
    );
    if !card.security_schemes.is_empty() {
        let schemes: Vec<String> = card
            .security_schemes
            .iter()
            .map(|(name, scheme)| format!("{name} ({})", scheme.scheme_type()))
            .collect();
        println!("  {:<12} {}", "Security:".bold(), schemes.join(", "));
    }

    if !card.skills.is_empty() {
        println!("\n  {:<20} {:<28} {}", "SKILL".bold(), "NAME".bold(), "TAGS".bold());
        println!("  {}", "─".repeat(64).dimmed());
        for skill in &card.skills {
            println!("  {:<20} {:<28} {}", skill.id, skill.name, skill.tags.join(", "));
        }
    }

    for signature in &card.signatures {
        let header = signature
            .protected_header()
            .context("signature has an unreadable protected header")?;
        let alg = header.get("alg").and_then(|v| v.as_str()).unwrap_or("?");
        println!("\n  {:<12} alg={alg}", "Signed:".bold());
    }
    println!();
    Ok(())
}
