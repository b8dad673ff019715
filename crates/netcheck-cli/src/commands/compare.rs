//! Compare command
//!
//! Usage: netcheck compare --pre <FILE> --post <FILE> --device <ID> [--format json|table|summary]

use super::{load_registry, print_json, render_failures, render_rows, OutputFormat, Outcome};
use clap::Args;
use netcheck_core::dialect::Vendor;
use netcheck_core::diff::render_human_summary;
use netcheck_core::tabulate::{failure_rows, tabulate, FailureRow, TableRow, TabulateOptions};
use netcheck_engine::{CaptureSource, DeviceJob, DeviceReport, DeviceStatus};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Capture taken before the upgrade
    #[arg(long)]
    pub pre: PathBuf,

    /// Capture taken after the upgrade
    #[arg(long)]
    pub post: PathBuf,

    #[arg(long)]
    pub device: String,

    #[arg(long, default_value = "junos")]
    pub vendor: Vendor,

    /// Schema file (default: built-in schemas)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Also list records that did not change
    #[arg(long)]
    pub include_unchanged: bool,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct CompareReport<'a> {
    device: &'a DeviceReport,
    rows: Vec<TableRow>,
    failures: Vec<FailureRow>,
}

/// Validate one device and print the report
pub fn execute(args: CompareArgs) -> anyhow::Result<Outcome> {
    let registry = load_registry(args.schema.as_deref())?;
    let job = DeviceJob::new(
        args.device,
        args.vendor,
        CaptureSource::File(args.pre),
        CaptureSource::File(args.post),
    );
    let report = job.execute(&registry);

    let results: Vec<_> = report.result.iter().cloned().collect();
    let rows = tabulate(
        &results,
        &TabulateOptions {
            include_unchanged: args.include_unchanged,
        },
    );
    let failures = failure_rows(report.all_failures());

    match args.format {
        OutputFormat::Json => print_json(&CompareReport {
            device: &report,
            rows,
            failures,
        })?,
        OutputFormat::Table => {
            print!("{}", render_rows(&rows));
            if !failures.is_empty() {
                println!();
                print!("{}", render_failures(&failures));
            }
        }
        OutputFormat::Summary => {
            print!("{}", render_human_summary(&results));
            if !failures.is_empty() && results.is_empty() {
                println!();
                print!("{}", render_failures(&failures));
            }
        }
    }

    Ok(match report.status {
        DeviceStatus::Pass => Outcome::Pass,
        DeviceStatus::Incomplete => Outcome::Incomplete,
        DeviceStatus::Fail | DeviceStatus::Aborted => Outcome::Fail,
    })
}
