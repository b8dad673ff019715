//! netcheck engine - orchestration layer
//!
//! Drives the pure core over a fleet of devices: loads captures, builds
//! pre/post snapshots on a bounded worker pool, compares them and collects a
//! deterministic run report.

pub mod commands;

pub use commands::device::{
    process_capture, validate_device, CaptureSource, DeviceJob, DeviceReport, DeviceStatus,
};
pub use commands::run::{run, RunOptions, RunReport, RunSummary};
