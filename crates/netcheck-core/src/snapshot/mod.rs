//! Immutable per-device, per-phase snapshots

mod builder;
mod digest;

pub use builder::{build, SnapshotBuilder};
pub use digest::compute_records_digest;

use crate::failure::Failure;
use crate::model::{CommandId, FieldValue, ParsedRecord, Phase};
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// All parsed records of one device at one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    device_id: String,
    phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    captured_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_nested")]
    commands: BTreeMap<CommandId, Vec<ParsedRecord>>,
    excluded: BTreeSet<CommandId>,
    failures: Vec<Failure>,
    digest: String,
}

impl Snapshot {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    /// Records per command, each list ordered by natural key
    pub fn commands(&self) -> &BTreeMap<CommandId, Vec<ParsedRecord>> {
        &self.commands
    }

    pub fn records(&self, command: &CommandId) -> Option<&[ParsedRecord]> {
        self.commands.get(command).map(Vec::as_slice)
    }

    /// Commands whose output failed to parse or had duplicate keys
    pub fn excluded(&self) -> &BTreeSet<CommandId> {
        &self.excluded
    }

    pub fn is_excluded(&self, command: &CommandId) -> bool {
        self.excluded.contains(command)
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// SHA-256 over the canonical JSON of the records
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn record_count(&self) -> usize {
        self.commands.values().map(Vec::len).sum()
    }
}

/// `command -> natural key -> field -> value`
pub(crate) fn serialize_nested<S: Serializer>(
    commands: &BTreeMap<CommandId, Vec<ParsedRecord>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(commands.len()))?;
    for (command, records) in commands {
        let by_key: BTreeMap<String, &BTreeMap<String, FieldValue>> = records
            .iter()
            .map(|r| (r.key().to_string(), r.fields()))
            .collect();
        map.serialize_entry(command, &by_key)?;
    }
    map.end()
}
