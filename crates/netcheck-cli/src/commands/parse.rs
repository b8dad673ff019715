//! Parse command
//!
//! Usage: netcheck parse <CAPTURE> --device <ID> [--phase pre|post] [--vendor <VENDOR>]

use super::{load_registry, print_json, read_capture, Outcome};
use clap::{Args, ValueEnum};
use netcheck_core::dialect::Vendor;
use netcheck_core::model::{Phase, RawCapture};
use netcheck_engine::process_capture;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Pre,
    Post,
}

impl From<PhaseArg> for Phase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Pre => Phase::Pre,
            PhaseArg::Post => Phase::Post,
        }
    }
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Raw capture transcript
    pub capture: PathBuf,

    /// Device the capture was taken from
    #[arg(long)]
    pub device: String,

    #[arg(long, value_enum, default_value = "pre")]
    pub phase: PhaseArg,

    #[arg(long, default_value = "junos")]
    pub vendor: Vendor,

    /// Schema file (default: built-in schemas)
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Print the snapshot built from one capture as JSON
///
/// Recorded failures are part of the snapshot; the outcome is `Fail` when
/// there are any.
pub fn execute(args: ParseArgs) -> anyhow::Result<Outcome> {
    let registry = load_registry(args.schema.as_deref())?;
    let text = read_capture(&args.capture)?;
    let capture = RawCapture::transcript(args.device, args.phase.into(), args.vendor, text);
    let snapshot = process_capture(&registry, &capture)?;
    print_json(&snapshot)?;
    Ok(if snapshot.failures().is_empty() {
        Outcome::Pass
    } else {
        Outcome::Fail
    })
}
