//! Run command
//!
//! Usage: netcheck run <MANIFEST> [--format json|table|summary]
//!
//! The manifest is TOML:
//!
//! ```toml
//! [run]
//! max_concurrency = 4
//! include_unchanged = false
//! schema = "schemas.yaml"   # optional
//!
//! [[device]]
//! id = "mx80-lab"
//! vendor = "junos"
//! pre = "captures/mx80-lab.pre.txt"
//! post = "captures/mx80-lab.post.txt"
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use super::{load_registry, print_json, render_failures, render_rows, OutputFormat, Outcome};
use anyhow::Context;
use clap::Args;
use netcheck_core::dialect::Vendor;
use netcheck_core::diff::{render_human_summary, ComparisonResult, Verdict};
use netcheck_core::tabulate::TabulateOptions;
use netcheck_engine::{CaptureSource, DeviceJob, RunOptions, RunReport};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Run manifest (TOML)
    pub manifest: PathBuf,

    /// Schema file; overrides the manifest's `schema`
    #[arg(long)]
    pub schema: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "summary")]
    pub format: OutputFormat,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub run: RunSection,
    #[serde(default, rename = "device")]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub include_unchanged: bool,
    #[serde(default)]
    pub schema: Option<PathBuf>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            include_unchanged: false,
            schema: None,
        }
    }
}

fn default_max_concurrency() -> usize {
    netcheck_engine::commands::run::DEFAULT_MAX_CONCURRENCY
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceEntry {
    pub id: String,
    pub vendor: Vendor,
    pub pre: PathBuf,
    pub post: PathBuf,
}

impl Manifest {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let manifest: Manifest = toml::from_str(content).context("invalid run manifest")?;
        if manifest.devices.is_empty() {
            anyhow::bail!("run manifest lists no [[device]]");
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Device jobs with paths resolved against `base`
    pub fn jobs(&self, base: &Path) -> Vec<DeviceJob> {
        self.devices
            .iter()
            .map(|d| {
                DeviceJob::new(
                    d.id.clone(),
                    d.vendor,
                    CaptureSource::File(base.join(&d.pre)),
                    CaptureSource::File(base.join(&d.post)),
                )
            })
            .collect()
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            max_concurrency: self.run.max_concurrency,
            tabulate: TabulateOptions {
                include_unchanged: self.run.include_unchanged,
            },
        }
    }
}

/// Validate every manifest device; Ctrl-C cancels devices still pending
pub fn execute(args: RunArgs) -> anyhow::Result<Outcome> {
    let manifest = Manifest::load(&args.manifest)?;
    let base = args
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let schema = args
        .schema
        .or_else(|| manifest.run.schema.as_ref().map(|p| base.join(p)));
    let registry = Arc::new(load_registry(schema.as_deref())?);
    let jobs = manifest.jobs(&base);
    let options = manifest.options();

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let report = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling remaining devices");
                on_interrupt.cancel();
            }
        });
        netcheck_engine::run(registry, jobs, options, cancel).await
    });

    print_report(&report, args.format)?;

    Ok(if !report.summary.complete {
        Outcome::Incomplete
    } else if report.summary.verdict == Verdict::Fail {
        Outcome::Fail
    } else {
        Outcome::Pass
    })
}

fn print_report(report: &RunReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            print!("{}", render_rows(&report.rows));
            if !report.failures.is_empty() {
                println!();
                print!("{}", render_failures(&report.failures));
            }
        }
        OutputFormat::Summary => {
            let results: Vec<ComparisonResult> = report.results().cloned().collect();
            print!("{}", render_human_summary(&results));
            let s = &report.summary;
            println!();
            println!(
                "Run {}: {} devices, {} passed, {} failed, {} aborted, {} incomplete. Verdict: {}",
                report.run_id, s.total, s.passed, s.failed, s.aborted, s.incomplete, s.verdict
            );
        }
    }
    Ok(())
}
