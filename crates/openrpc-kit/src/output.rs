use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use openrpc_kit_protocol::MethodDescriptor;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One row of `methods` output.
#[derive(Debug, Serialize)]
pub struct MethodRow {
    pub exposed: String,
    pub name: String,
    pub kind: &'static str,
    pub roles: Vec<String>,
    pub summary: String,
}

impl MethodRow {
    pub fn new(exposed: &str, descriptor: &MethodDescriptor) -> Self {
        Self {
            exposed: exposed.to_string(),
            name: descriptor.name.clone(),
            kind: if descriptor.is_notification() {
                "notification"
            } else {
                "request"
            },
            roles: descriptor
                .permissions()
                .iter()
                .map(|role| role.as_str().to_string())
                .collect(),
            summary: descriptor.summary.clone(),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    println!("{}", rendered.unwrap_or_else(|_| "{}".to_string()));
}

pub fn print_methods(rows: &[MethodRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(rows, false),
        OutputFormat::Table => println!("{}", methods_table(rows)),
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "{} ({}) {} roles=[{}]",
                    row.exposed,
                    row.name,
                    row.kind,
                    row.roles.join(", ")
                );
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}", row.exposed);
            }
        }
    }
}

/// Print a call result. Raw prints strings without quotes.
pub fn print_value(value: &Value, format: OutputFormat) {
    match (format, value) {
        (OutputFormat::Raw, Value::String(text)) => println!("{text}"),
        (OutputFormat::Json | OutputFormat::Raw, _) => print_json(value, false),
        (OutputFormat::Table | OutputFormat::Pretty, _) => print_json(value, true),
    }
}

fn methods_table(rows: &[MethodRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["METHOD", "WIRE NAME", "KIND", "ROLES", "SUMMARY"]);
    for row in rows {
        table.add_row(vec![
            row.exposed.clone(),
            row.name.clone(),
            row.kind.to_string(),
            row.roles.join(", "),
            row.summary.clone(),
        ]);
    }
    table
}
