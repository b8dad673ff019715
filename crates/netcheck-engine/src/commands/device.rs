//! Per-device pipeline.
//!
//! ## Stages (in order):
//! 1. Load the pre and post captures (inline text or files)
//! 2. Segment each capture into command blocks (fatal on zero blocks)
//! 3. Parse every schematized block; failures exclude the command
//! 4. Build the pre and post snapshots
//! 5. Compare (fatal on device mismatch)
//!
//! Non-fatal failures are recorded on the snapshot they belong to and surface
//! through the comparison result. A fatal failure aborts only this device.

use netcheck_core::dialect::Vendor;
use netcheck_core::diff::{compare, ComparisonResult, Verdict};
use netcheck_core::errors::{ExError, ExErrorKind, Result};
use netcheck_core::failure::Failure;
use netcheck_core::model::{CaptureBody, CommandId, Phase, RawCapture};
use netcheck_core::schema::SchemaRegistry;
use netcheck_core::segment::{segment, segment_blocks};
use netcheck_core::snapshot::{Snapshot, SnapshotBuilder};
use netcheck_core::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use std::path::PathBuf;

/// Where a capture comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureSource {
    Inline(CaptureBody),
    /// Transcript file read on the worker
    File(PathBuf),
}

impl CaptureSource {
    fn load(&self, device_id: &str, phase: Phase, vendor: Vendor) -> Result<RawCapture> {
        match self {
            CaptureSource::Inline(body) => Ok(RawCapture {
                device_id: device_id.to_string(),
                phase,
                vendor,
                body: body.clone(),
                captured_at: None,
            }),
            CaptureSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ExError::new(ExErrorKind::Io)
                        .with_op("load_capture")
                        .with_device(device_id)
                        .with_phase(phase)
                        .with_message(format!("Failed to read capture {}: {}", path.display(), e))
                })?;
                let capture = RawCapture::transcript(device_id, phase, vendor, text);
                // Stamped with the file's modification time when the platform reports one
                match std::fs::metadata(path).and_then(|m| m.modified()) {
                    Ok(modified) => Ok(capture.with_captured_at(modified.into())),
                    Err(_) => Ok(capture),
                }
            }
        }
    }
}

/// One device to validate
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceJob {
    pub device_id: String,
    pub vendor: Vendor,
    pub pre: CaptureSource,
    pub post: CaptureSource,
}

impl DeviceJob {
    pub fn new(
        device_id: impl Into<String>,
        vendor: Vendor,
        pre: CaptureSource,
        post: CaptureSource,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            vendor,
            pre,
            post,
        }
    }

    /// Load both captures and validate; never fails, fatal errors abort the device
    pub fn execute(&self, registry: &SchemaRegistry) -> DeviceReport {
        let captures = self
            .pre
            .load(&self.device_id, Phase::Pre, self.vendor)
            .and_then(|pre| {
                let post = self.post.load(&self.device_id, Phase::Post, self.vendor)?;
                Ok((pre, post))
            });
        match captures {
            Ok((pre, post)) => validate_device(registry, &pre, &post),
            Err(err) => DeviceReport::aborted(&self.device_id, Failure::from_error(&self.device_id, &err)),
        }
    }
}

/// Outcome class of one device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Pass,
    Fail,
    /// Run was cancelled before the device finished
    Incomplete,
    /// A fatal error stopped the device
    Aborted,
}

/// Result of validating one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub device_id: String,
    pub status: DeviceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ComparisonResult>,
    /// Failures that stopped the device; comparison failures live in `result`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

impl DeviceReport {
    pub fn completed(result: ComparisonResult) -> Self {
        let status = match result.verdict {
            Verdict::Pass => DeviceStatus::Pass,
            Verdict::Fail => DeviceStatus::Fail,
        };
        Self {
            device_id: result.device_id.clone(),
            status,
            result: Some(result),
            failures: Vec::new(),
        }
    }

    pub fn aborted(device_id: impl Into<String>, failure: Failure) -> Self {
        Self {
            device_id: device_id.into(),
            status: DeviceStatus::Aborted,
            result: None,
            failures: vec![failure],
        }
    }

    pub fn incomplete(device_id: impl Into<String>) -> Self {
        let device_id = device_id.into();
        let failure = Failure::new(
            ExErrorKind::Cancelled,
            device_id.clone(),
            "run cancelled before the device finished",
        );
        Self {
            device_id,
            status: DeviceStatus::Incomplete,
            result: None,
            failures: vec![failure],
        }
    }

    /// Every failure of the device, fatal ones first
    pub fn all_failures(&self) -> impl Iterator<Item = &Failure> {
        self.failures
            .iter()
            .chain(self.result.iter().flat_map(|r| r.failures.iter()))
    }
}

/// Segment, parse and assemble one capture into a snapshot
///
/// # Errors
///
/// `ERR_SEGMENTATION` when the capture has no command boundary; every other
/// problem is recorded on the snapshot.
pub fn process_capture(registry: &SchemaRegistry, capture: &RawCapture) -> Result<Snapshot> {
    let device_id = capture.device_id.as_str();
    let phase = capture.phase;
    log_op_start!("process_capture", device_id = device_id, phase = %phase);
    let start = std::time::Instant::now();

    let dialect = capture.vendor.dialect();
    let segmented = match &capture.body {
        CaptureBody::Transcript(text) => segment(text, dialect, registry),
        CaptureBody::Blocks(blocks) => segment_blocks(blocks, dialect, registry),
    };
    let segmentation = match segmented {
        Ok(segmentation) => segmentation,
        Err(err) => {
            let err = err.with_device(device_id).with_phase(phase);
            log_op_error!(
                "process_capture",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                device_id = device_id
            );
            return Err(err);
        }
    };

    let failure = |kind: ExErrorKind, command: &CommandId, message: String| {
        Failure::new(kind, device_id, message)
            .with_phase(phase)
            .with_command(command.clone())
    };

    let mut builder = SnapshotBuilder::new(device_id, phase).captured_at(capture.captured_at);
    for block in segmentation.unschematized() {
        builder.record(failure(
            ExErrorKind::UnschematizedCommand,
            &block.command,
            "command output captured but no schema is registered".to_string(),
        ));
    }
    for repeat in segmentation.repeated() {
        builder.record(failure(
            ExErrorKind::RepeatedCommand,
            &repeat.command,
            format!("echoed again at line {}; first block kept", repeat.line),
        ));
    }

    for block in segmentation.blocks().iter().filter(|b| b.schematized) {
        let Some(entry) = registry.get(&block.command) else {
            continue;
        };
        match dialect.parse(entry, &block.output) {
            Ok(parsed) => {
                for rejected in parsed.rejected {
                    builder.record(
                        failure(ExErrorKind::TypeCoercion, &block.command, rejected.reason)
                            .with_raw(rejected.raw),
                    );
                }
                if let Err(err) = builder.insert_command(block.command.clone(), parsed.records) {
                    tracing::warn!(
                        device_id = device_id,
                        command = %block.command,
                        error = %err,
                        "duplicate natural key, excluding command"
                    );
                    let err = ExError::from(err);
                    builder.exclude(
                        block.command.clone(),
                        Failure::from_error(device_id, &err).with_phase(phase),
                    );
                }
            }
            Err(parse_failure) => {
                tracing::warn!(
                    device_id = device_id,
                    phase = %phase,
                    command = %block.command,
                    reason = %parse_failure.reason,
                    "command output could not be parsed"
                );
                builder.exclude(
                    block.command.clone(),
                    failure(ExErrorKind::ParseFailure, &block.command, parse_failure.reason)
                        .with_raw(parse_failure.raw),
                );
            }
        }
    }

    let snapshot = builder
        .build()
        .map_err(|e| e.with_device(device_id).with_phase(phase))?;

    log_op_end!(
        "process_capture",
        duration_ms = start.elapsed().as_millis() as u64,
        device_id = device_id,
        record_count = snapshot.record_count(),
        failure_count = snapshot.failures().len()
    );
    Ok(snapshot)
}

/// Full pipeline for one device
///
/// Never fails: fatal errors produce an `Aborted` report carrying the failure.
pub fn validate_device(registry: &SchemaRegistry, pre: &RawCapture, post: &RawCapture) -> DeviceReport {
    let device_id = pre.device_id.as_str();
    log_op_start!("validate_device", device_id = device_id);
    let start = std::time::Instant::now();

    let outcome = process_capture(registry, pre).and_then(|pre_snapshot| {
        let post_snapshot = process_capture(registry, post)?;
        compare(registry, &pre_snapshot, &post_snapshot).map_err(|e| e.with_device(device_id))
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(result) => {
            log_op_end!(
                "validate_device",
                duration_ms = duration_ms,
                device_id = device_id,
                verdict = %result.verdict
            );
            DeviceReport::completed(result)
        }
        Err(err) => {
            log_op_error!(
                "validate_device",
                err.clone(),
                duration_ms = duration_ms,
                device_id = device_id
            );
            DeviceReport::aborted(device_id, Failure::from_error(device_id, &err))
        }
    }
}
