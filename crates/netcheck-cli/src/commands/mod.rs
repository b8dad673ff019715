//! Subcommand implementations and the helpers they share

pub mod compare;
pub mod parse;
pub mod run;
pub mod schemas;
pub mod segment;

use anyhow::Context;
use clap::ValueEnum;
use netcheck_core::schema::{parse_registry_file, SchemaRegistry};
use netcheck_core::tabulate::{FailureRow, TableRow};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

pub const EXIT_PASS: u8 = 0;
pub const EXIT_FAIL: u8 = 1;
pub const EXIT_ERROR: u8 = 2;
pub const EXIT_INCOMPLETE: u8 = 3;

/// What a subcommand concluded, mapped to the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    /// Cancelled before every device finished
    Incomplete,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(match self {
            Outcome::Pass => EXIT_PASS,
            Outcome::Fail => EXIT_FAIL,
            Outcome::Incomplete => EXIT_INCOMPLETE,
        })
    }
}

/// Report rendering for compare and run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Summary,
}

/// Custom schema file if given, otherwise the built-in schemas
pub fn load_registry(schema: Option<&Path>) -> anyhow::Result<SchemaRegistry> {
    match schema {
        Some(path) => parse_registry_file(path)
            .with_context(|| format!("loading schemas from {}", path.display())),
        None => SchemaRegistry::builtin().context("loading built-in schemas"),
    }
}

pub fn read_capture(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading capture {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Plain-text comparison table, one line per row
pub fn render_rows(rows: &[TableRow]) -> String {
    if rows.is_empty() {
        return "No differences.\n".to_string();
    }
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|r| {
            [
                r.device.clone(),
                r.command.clone(),
                r.key.clone(),
                r.status.as_str().to_string(),
                r.field.clone().unwrap_or_default(),
                r.pre.clone().unwrap_or_default(),
                r.post.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_grid(
        ["DEVICE", "COMMAND", "KEY", "STATUS", "FIELD", "PRE", "POST"],
        &cells,
    )
}

pub fn render_failures(rows: &[FailureRow]) -> String {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.device.clone(),
                r.phase.map(|p| p.to_string()).unwrap_or_default(),
                r.command.clone().unwrap_or_default(),
                r.code.clone(),
                r.message.clone(),
            ]
        })
        .collect();
    render_grid(["DEVICE", "PHASE", "COMMAND", "CODE", "MESSAGE"], &cells)
}

fn render_grid<const N: usize>(header: [&str; N], cells: &[[String; N]]) -> String {
    let mut widths = header.map(str::len);
    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |row: Vec<&str>| {
        let padded: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(header.to_vec());
    for row in cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
