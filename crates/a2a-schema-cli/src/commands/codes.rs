//! `a2a-schema codes` — the error code table.

use a2a_schema::ErrorCode;
use colored::Colorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{print_json, OutputFormat};

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "CODE")]
    code: i64,
    #[tabled(rename = "NAME")]
    name: &'static str,
    #[tabled(rename = "DEFAULT MESSAGE")]
    message: &'static str,
    #[tabled(rename = "LAYER")]
    layer: &'static str,
}

fn rows() -> Vec<CodeRow> {
    ErrorCode::ALL
        .into_iter()
        .map(|code| CodeRow {
            code: code.code(),
            name: code.name(),
            message: code.default_message(),
            layer: if code.is_protocol_specific() { "a2a" } else { "json-rpc" },
        })
        .collect()
}

pub fn execute(output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => {
            let codes: Vec<_> = rows()
                .into_iter()
                .map(|row| json!({"code": row.code, "name": row.name, "message": row.message}))
                .collect();
            print_json(&codes)
        }
        OutputFormat::Text => {
            println!("\n  🔢 {}\n", "A2A error codes".bold());
            let mut table = Table::new(rows());
            table.with(Style::rounded());
            for line in table.to_string().lines() {
                println!("  {line}");
            }
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_code() {
        let table = Table::new(rows()).to_string();
        for code in ErrorCode::ALL {
            assert!(table.contains(code.default_message()));
        }
        assert!(table.contains("-32001"));
    }
}
