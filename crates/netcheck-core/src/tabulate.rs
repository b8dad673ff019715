//! Tabulator: flatten comparison results into uniform report rows
//!
//! Rows are the hand-off to report writers; nothing here does file I/O.

use crate::diff::{ComparisonResult, DiffEntry, DiffStatus};
use crate::failure::Failure;
use crate::model::{render_fields, Phase};
use crate::{log_op_end, log_op_start};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabulateOptions {
    /// Emit rows for unchanged records too
    pub include_unchanged: bool,
}

/// One comparison-table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub device: String,
    pub command: String,
    /// Rendered natural key; empty for command-missing rows
    pub key: String,
    pub status: DiffStatus,
    pub field: Option<String>,
    pub pre: Option<String>,
    pub post: Option<String>,
}

/// One failure-table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow {
    pub device: String,
    pub phase: Option<Phase>,
    pub command: Option<String>,
    pub code: String,
    pub message: String,
}

const CAPTURED: &str = "captured";
const NOT_CAPTURED: &str = "not captured";

/// Flatten results, ordered by device id, then entry order
///
/// A changed entry yields one row per differing field; every other entry
/// yields one row.
pub fn tabulate(results: &[ComparisonResult], options: &TabulateOptions) -> Vec<TableRow> {
    log_op_start!("tabulate", device_count = results.len());
    let start = std::time::Instant::now();

    let mut rows = Vec::new();
    for result in by_device(results) {
        for entry in &result.entries {
            if entry.status == DiffStatus::Unchanged && !options.include_unchanged {
                continue;
            }
            rows.extend(entry_rows(&result.device_id, entry));
        }
    }

    log_op_end!(
        "tabulate",
        duration_ms = start.elapsed().as_millis() as u64,
        row_count = rows.len()
    );
    rows
}

/// Every failure attached to the results, ordered by device id
pub fn tabulate_failures(results: &[ComparisonResult]) -> Vec<FailureRow> {
    failure_rows(by_device(results).into_iter().flat_map(|r| r.failures.iter()))
}

/// Failure rows in the given order
pub fn failure_rows<'a>(failures: impl IntoIterator<Item = &'a Failure>) -> Vec<FailureRow> {
    failures
        .into_iter()
        .map(|f| FailureRow {
            device: f.device_id.clone(),
            phase: f.phase,
            command: f.command.as_ref().map(|c| c.to_string()),
            code: f.code().to_string(),
            message: f.message.clone(),
        })
        .collect()
}

fn by_device(results: &[ComparisonResult]) -> Vec<&ComparisonResult> {
    let mut sorted: Vec<&ComparisonResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    sorted
}

fn entry_rows(device: &str, entry: &DiffEntry) -> Vec<TableRow> {
    let row = |field: Option<String>, pre: Option<String>, post: Option<String>| TableRow {
        device: device.to_string(),
        command: entry.command.to_string(),
        key: entry.key.as_ref().map(|k| k.to_string()).unwrap_or_default(),
        status: entry.status,
        field,
        pre,
        post,
    };
    let rendered = || entry.record.as_ref().map(render_fields);

    match entry.status {
        DiffStatus::Changed => entry
            .changes
            .iter()
            .map(|c| {
                row(
                    Some(c.field.clone()),
                    c.pre.as_ref().map(|v| v.to_string()),
                    c.post.as_ref().map(|v| v.to_string()),
                )
            })
            .collect(),
        DiffStatus::Added => vec![row(None, None, rendered())],
        DiffStatus::Removed => vec![row(None, rendered(), None)],
        DiffStatus::Unchanged => vec![row(None, rendered(), rendered())],
        DiffStatus::CommandMissing => {
            let (pre, post) = match entry.missing_in {
                Some(Phase::Pre) => (NOT_CAPTURED, CAPTURED),
                _ => (CAPTURED, NOT_CAPTURED),
            };
            vec![row(None, Some(pre.to_string()), Some(post.to_string()))]
        }
    }
}
