use super::{compute_records_digest, Snapshot};
use crate::errors::{CheckError, ExError, Result};
use crate::failure::{Failure, FailureLog};
use crate::model::{CommandId, ParsedRecord, Phase};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Assembles a [`Snapshot`] command by command
///
/// Commands that fail are excluded with their failure attached rather than
/// aborting the whole snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    device_id: String,
    phase: Phase,
    captured_at: Option<DateTime<Utc>>,
    commands: BTreeMap<CommandId, Vec<ParsedRecord>>,
    excluded: BTreeSet<CommandId>,
    failures: FailureLog,
}

impl SnapshotBuilder {
    pub fn new(device_id: impl Into<String>, phase: Phase) -> Self {
        Self {
            device_id: device_id.into(),
            phase,
            captured_at: None,
            commands: BTreeMap::new(),
            excluded: BTreeSet::new(),
            failures: FailureLog::new(),
        }
    }

    pub fn captured_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.captured_at = at;
        self
    }

    /// Add one command's records, ordered by natural key
    ///
    /// # Errors
    ///
    /// [`CheckError::DuplicateKey`] if two records share a natural key; the
    /// command is not added.
    pub fn insert_command(
        &mut self,
        command: CommandId,
        mut records: Vec<ParsedRecord>,
    ) -> std::result::Result<(), CheckError> {
        if let Some(stray) = records.iter().find(|r| r.command() != &command) {
            return Err(CheckError::Internal {
                message: format!(
                    "record of {} inserted under {}",
                    stray.command(),
                    command
                ),
            });
        }
        records.sort_by(|a, b| a.key().cmp(b.key()));
        if let Some(pair) = records.windows(2).find(|w| w[0].key() == w[1].key()) {
            return Err(CheckError::DuplicateKey {
                command,
                key: pair[0].key().to_string(),
            });
        }
        self.commands.insert(command, records);
        Ok(())
    }

    /// Remove a command from comparison and attach the reason
    pub fn exclude(&mut self, command: CommandId, failure: Failure) {
        self.commands.remove(&command);
        self.excluded.insert(command);
        self.failures.push(failure);
    }

    /// Attach a failure; one that excludes its command also drops the records
    pub fn record(&mut self, failure: Failure) {
        if failure.excludes_command() {
            if let Some(command) = &failure.command {
                self.commands.remove(command);
                self.excluded.insert(command.clone());
            }
        }
        self.failures.push(failure);
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Freeze into an immutable snapshot
    ///
    /// # Errors
    ///
    /// `ERR_SERIALIZATION` if the digest cannot be computed.
    pub fn build(self) -> Result<Snapshot> {
        let digest = compute_records_digest(&self.commands)?;
        Ok(Snapshot {
            device_id: self.device_id,
            phase: self.phase,
            captured_at: self.captured_at,
            commands: self.commands,
            excluded: self.excluded,
            failures: self.failures.into_vec(),
            digest,
        })
    }
}

/// Build a snapshot from complete per-command record lists
///
/// # Errors
///
/// `ERR_DUPLICATE_KEY` if any command has two records with one natural key.
pub fn build(
    device_id: &str,
    phase: Phase,
    commands: BTreeMap<CommandId, Vec<ParsedRecord>>,
) -> Result<Snapshot> {
    let mut builder = SnapshotBuilder::new(device_id, phase);
    for (command, records) in commands {
        builder.insert_command(command, records).map_err(|e| {
            ExError::from(e).with_device(device_id).with_phase(phase)
        })?;
    }
    builder.build()
}
