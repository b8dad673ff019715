//! Segment command
//!
//! Usage: netcheck segment <CAPTURE> [--vendor <VENDOR>] [--schema <FILE>]

use super::{load_registry, print_json, read_capture, Outcome};
use clap::Args;
use netcheck_core::dialect::Vendor;
use netcheck_core::segment::segment;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SegmentArgs {
    /// Raw capture transcript
    pub capture: PathBuf,

    #[arg(long, default_value = "junos")]
    pub vendor: Vendor,

    /// Schema file (default: built-in schemas)
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Print the capture's command blocks as JSON
pub fn execute(args: SegmentArgs) -> anyhow::Result<Outcome> {
    let registry = load_registry(args.schema.as_deref())?;
    let text = read_capture(&args.capture)?;
    let segmentation = segment(&text, args.vendor.dialect(), &registry)?;
    print_json(&segmentation)?;
    Ok(Outcome::Pass)
}
