//! Bounded, cancellable validation of many devices.
//!
//! Devices share nothing but the read-only registry. Each device takes a
//! semaphore permit, then runs its CPU-bound pipeline on the blocking pool.
//! Reports are sorted by device id before roll-up, so the output does not
//! depend on completion order.

use super::device::{DeviceJob, DeviceReport, DeviceStatus};
use chrono::{DateTime, Utc};
use netcheck_core::diff::{ComparisonResult, Verdict};
use netcheck_core::errors::ExErrorKind;
use netcheck_core::failure::Failure;
use netcheck_core::schema::SchemaRegistry;
use netcheck_core::tabulate::{failure_rows, tabulate, FailureRow, TableRow, TabulateOptions};
use netcheck_core::{log_op_end, log_op_start};
use netcheck_core_types::correlation::{RunContext, RunId};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// In-process knobs for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Devices processed at once; 0 is treated as 1
    pub max_concurrency: usize,
    pub tabulate: TabulateOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            tabulate: TabulateOptions::default(),
        }
    }
}

/// Roll-up over all devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub incomplete: usize,
    pub aborted: usize,
    /// Pass iff every finished device passed; incomplete devices do not count
    pub verdict: Verdict,
    /// False when cancellation left devices incomplete
    pub complete: bool,
}

impl RunSummary {
    fn from_devices(devices: &[DeviceReport]) -> Self {
        let count = |status| devices.iter().filter(|d| d.status == status).count();
        let passed = count(DeviceStatus::Pass);
        let failed = count(DeviceStatus::Fail);
        let incomplete = count(DeviceStatus::Incomplete);
        let aborted = count(DeviceStatus::Aborted);
        Self {
            total: devices.len(),
            passed,
            failed,
            incomplete,
            aborted,
            verdict: if failed + aborted == 0 {
                Verdict::Pass
            } else {
                Verdict::Fail
            },
            complete: incomplete == 0,
        }
    }
}

/// Everything a report writer needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    /// Ordered by device id
    pub devices: Vec<DeviceReport>,
    pub rows: Vec<TableRow>,
    pub failures: Vec<FailureRow>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn results(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.devices.iter().filter_map(|d| d.result.as_ref())
    }

    pub fn device(&self, device_id: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }
}

/// Validate every job, at most `max_concurrency` at a time
///
/// Cancelling `cancel` marks every device that has not finished `Incomplete`;
/// devices already reported keep their outcome. A device id seen twice is
/// aborted as invalid input without running.
pub async fn run(
    registry: Arc<SchemaRegistry>,
    jobs: Vec<DeviceJob>,
    options: RunOptions,
    cancel: CancellationToken,
) -> RunReport {
    let ctx = RunContext::new();
    let started_at = Utc::now();
    log_op_start!("run", run_id = %ctx.run_id, device_count = jobs.len());
    let start = std::time::Instant::now();

    let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut devices = Vec::with_capacity(jobs.len());
    let mut duplicates = Vec::new();
    let mut scheduled = HashSet::new();

    for job in jobs {
        if !scheduled.insert(job.device_id.clone()) {
            duplicates.push(DeviceReport::aborted(
                &job.device_id,
                Failure::new(
                    ExErrorKind::InvalidInput,
                    &job.device_id,
                    "device listed more than once in this run",
                ),
            ));
            continue;
        }
        let registry = Arc::clone(&registry);
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();
        tasks.spawn(run_device(registry, semaphore, cancel, job));
    }

    let mut reported = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) => {
                reported.insert(report.device_id.clone());
                devices.push(report);
            }
            Err(err) => {
                tracing::error!(run_id = %ctx.run_id, error = %err, "device task failed to join");
            }
        }
    }
    for device_id in scheduled.difference(&reported) {
        devices.push(DeviceReport::aborted(
            device_id,
            Failure::new(
                ExErrorKind::Internal,
                device_id,
                "device task ended without a report",
            ),
        ));
    }
    // Appended last so the stable sort keeps each scheduled report ahead of
    // its duplicates, which is the one `RunReport::device` returns.
    devices.extend(duplicates);
    devices.sort_by(|a, b| a.device_id.cmp(&b.device_id));

    let results: Vec<ComparisonResult> = devices.iter().filter_map(|d| d.result.clone()).collect();
    let rows = tabulate(&results, &options.tabulate);
    let failures = failure_rows(devices.iter().flat_map(|d| d.all_failures()));
    let summary = RunSummary::from_devices(&devices);

    log_op_end!(
        "run",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %ctx.run_id,
        device_count = summary.total,
        verdict = %summary.verdict,
        complete = summary.complete
    );

    RunReport {
        run_id: ctx.run_id,
        started_at,
        devices,
        rows,
        failures,
        summary,
    }
}

async fn run_device(
    registry: Arc<SchemaRegistry>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    job: DeviceJob,
) -> DeviceReport {
    let device_id = job.device_id.clone();

    let permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = semaphore.acquire_owned() => permit.ok(),
    };
    let Some(_permit) = permit else {
        tracing::info!(device_id = %device_id, "run cancelled before device started");
        return DeviceReport::incomplete(device_id);
    };

    let work = tokio::task::spawn_blocking(move || job.execute(&registry));
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!(device_id = %device_id, "run cancelled while device in flight");
            DeviceReport::incomplete(device_id)
        }
        joined = work => joined.unwrap_or_else(|err| {
            DeviceReport::aborted(
                &device_id,
                Failure::new(
                    ExErrorKind::Internal,
                    &device_id,
                    format!("device worker failed: {}", err),
                ),
            )
        }),
    }
}
