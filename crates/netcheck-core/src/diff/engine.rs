//! Comparator: match records by natural key and classify each one

use crate::diff::model::{
    CommandSummary, CommandVerdict, ComparisonResult, DiffEntry, DiffStatus, FieldChange, Verdict,
};
use crate::diff::tolerance::values_equal;
use crate::errors::{CheckError, Result};
use crate::model::{NaturalKey, ParsedRecord, Phase};
use crate::schema::{RegisteredCommand, SchemaRegistry, Tolerance};
use crate::snapshot::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::{BTreeMap, BTreeSet};

/// Compare a pre-upgrade snapshot against a post-upgrade snapshot
///
/// Commands are visited in registry declaration order. A command excluded
/// from either snapshot is reported `Unvalidated` and produces no entries.
/// Commands without a schema are not compared.
///
/// # Errors
///
/// `ERR_DEVICE_MISMATCH` when the snapshots belong to different devices.
pub fn compare(registry: &SchemaRegistry, pre: &Snapshot, post: &Snapshot) -> Result<ComparisonResult> {
    log_op_start!("compare", device_id = pre.device_id());
    let start = std::time::Instant::now();

    if pre.device_id() != post.device_id() {
        let err = CheckError::DeviceMismatch {
            pre_device: pre.device_id().to_string(),
            post_device: post.device_id().to_string(),
        };
        log_op_error!(
            "compare",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return Err(err.into());
    }

    let mut entries = Vec::new();
    let mut commands = Vec::new();
    for entry in registry.commands() {
        let id = entry.id();
        if pre.is_excluded(id) || post.is_excluded(id) {
            commands.push(CommandSummary {
                command: id.clone(),
                verdict: CommandVerdict::Unvalidated,
                added: 0,
                removed: 0,
                changed: 0,
                unchanged: 0,
                missing: false,
            });
            continue;
        }

        let command_entries = match (pre.records(id), post.records(id)) {
            (None, None) => continue,
            (Some(_), None) => vec![DiffEntry::command_missing(id, Phase::Post)],
            (None, Some(_)) => vec![DiffEntry::command_missing(id, Phase::Pre)],
            (Some(a), Some(b)) => compare_records(entry, a, b),
        };
        commands.push(summarize(entry, &command_entries));
        entries.extend(command_entries);
    }

    let verdict = if entries.iter().any(|e| e.status.is_failing()) {
        Verdict::Fail
    } else {
        Verdict::Pass
    };
    let failures = pre
        .failures()
        .iter()
        .chain(post.failures())
        .cloned()
        .collect();

    let result = ComparisonResult {
        device_id: pre.device_id().to_string(),
        verdict,
        pre_digest: pre.digest().to_string(),
        post_digest: post.digest().to_string(),
        identical: pre.digest() == post.digest() && pre.excluded() == post.excluded(),
        entries,
        commands,
        failures,
    };

    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        device_id = pre.device_id(),
        entry_count = result.entries.len(),
        verdict = %result.verdict
    );
    Ok(result)
}

fn compare_records(entry: &RegisteredCommand, pre: &[ParsedRecord], post: &[ParsedRecord]) -> Vec<DiffEntry> {
    let id = entry.id();
    let pre_by_key: BTreeMap<&NaturalKey, &ParsedRecord> = pre.iter().map(|r| (r.key(), r)).collect();
    let post_by_key: BTreeMap<&NaturalKey, &ParsedRecord> = post.iter().map(|r| (r.key(), r)).collect();
    let keys: BTreeSet<&NaturalKey> = pre_by_key.keys().chain(post_by_key.keys()).copied().collect();

    keys.into_iter()
        .filter_map(|key| match (pre_by_key.get(key), post_by_key.get(key)) {
            (Some(a), None) => Some(DiffEntry::record(id, key, DiffStatus::Removed, a.fields())),
            (None, Some(b)) => Some(DiffEntry::record(id, key, DiffStatus::Added, b.fields())),
            (Some(a), Some(b)) => {
                let changes = field_changes(entry, a, b);
                Some(if changes.is_empty() {
                    DiffEntry::record(id, key, DiffStatus::Unchanged, b.fields())
                } else {
                    DiffEntry::changed(id, key, changes)
                })
            }
            (None, None) => None,
        })
        .collect()
}

/// Differing fields in schema declaration order
fn field_changes(entry: &RegisteredCommand, pre: &ParsedRecord, post: &ParsedRecord) -> Vec<FieldChange> {
    entry
        .schema()
        .fields
        .iter()
        .filter(|def| def.tolerance() != Tolerance::Ignore)
        .filter(|def| !values_equal(def, pre.get(&def.name), post.get(&def.name)))
        .map(|def| FieldChange {
            field: def.name.clone(),
            pre: pre.get(&def.name).cloned(),
            post: post.get(&def.name).cloned(),
        })
        .collect()
}

fn summarize(entry: &RegisteredCommand, entries: &[DiffEntry]) -> CommandSummary {
    let count = |status| entries.iter().filter(|e| e.status == status).count();
    let failing = entries.iter().any(|e| e.status.is_failing());
    CommandSummary {
        command: entry.id().clone(),
        verdict: if failing {
            CommandVerdict::Fail
        } else {
            CommandVerdict::Pass
        },
        added: count(DiffStatus::Added),
        removed: count(DiffStatus::Removed),
        changed: count(DiffStatus::Changed),
        unchanged: count(DiffStatus::Unchanged),
        missing: count(DiffStatus::CommandMissing) > 0,
    }
}
