//! Comparison output types
//!
//! Collections use `BTreeMap` and ordered `Vec` for deterministic serialization.

use crate::failure::Failure;
use crate::model::{CommandId, FieldValue, NaturalKey, Phase};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Classification of one record, or of a whole missing command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
    /// Schema exists but one phase captured no output for the command
    CommandMissing,
}

impl DiffStatus {
    /// Counts against the device verdict
    pub fn is_failing(self) -> bool {
        !matches!(self, DiffStatus::Unchanged)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Changed => "changed",
            DiffStatus::Unchanged => "unchanged",
            DiffStatus::CommandMissing => "command-missing",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One differing field of a changed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub pre: Option<FieldValue>,
    pub post: Option<FieldValue>,
}

/// One unit of comparison output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub command: CommandId,
    /// Absent for command-missing entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<NaturalKey>,
    pub status: DiffStatus,
    /// Differing fields in schema order; only for changed entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
    /// Whole record for added, removed and unchanged entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<BTreeMap<String, FieldValue>>,
    /// Phase that lacks output, for command-missing entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_in: Option<Phase>,
}

impl DiffEntry {
    pub(crate) fn record(
        command: &CommandId,
        key: &NaturalKey,
        status: DiffStatus,
        fields: &BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            command: command.clone(),
            key: Some(key.clone()),
            status,
            changes: Vec::new(),
            record: Some(fields.clone()),
            missing_in: None,
        }
    }

    pub(crate) fn changed(command: &CommandId, key: &NaturalKey, changes: Vec<FieldChange>) -> Self {
        Self {
            command: command.clone(),
            key: Some(key.clone()),
            status: DiffStatus::Changed,
            changes,
            record: None,
            missing_in: None,
        }
    }

    pub(crate) fn command_missing(command: &CommandId, missing_in: Phase) -> Self {
        Self {
            command: command.clone(),
            key: None,
            status: DiffStatus::CommandMissing,
            changes: Vec::new(),
            record: None,
            missing_in: Some(missing_in),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Fail => f.write_str("fail"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandVerdict {
    Pass,
    Fail,
    /// Output failed to parse, or had duplicate keys, in either phase
    Unvalidated,
}

/// Per-command roll-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    pub command: CommandId,
    pub verdict: CommandVerdict,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub missing: bool,
}

/// Comparison of one device's pre and post snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub device_id: String,
    pub verdict: Verdict,
    pub pre_digest: String,
    pub post_digest: String,
    /// Both snapshots hold exactly the same records
    pub identical: bool,
    pub entries: Vec<DiffEntry>,
    pub commands: Vec<CommandSummary>,
    /// Failures recorded while building either snapshot
    pub failures: Vec<Failure>,
}

impl ComparisonResult {
    pub fn count(&self, status: DiffStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn entries_with(&self, status: DiffStatus) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(move |e| e.status == status)
    }

    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}
