//! Content digest of a snapshot's records
//!
//! Covers records only; device, phase and capture time are excluded so a
//! pre and post snapshot with the same state share a digest.

use super::serialize_nested;
use crate::errors::{CheckError, Result};
use crate::model::{CommandId, ParsedRecord};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

struct Nested<'a>(&'a BTreeMap<CommandId, Vec<ParsedRecord>>);

impl serde::Serialize for Nested<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_nested(self.0, serializer)
    }
}

/// Hex-encoded SHA-256 of the canonical JSON of `commands`
///
/// # Errors
///
/// `ERR_SERIALIZATION` if the records cannot be encoded.
pub fn compute_records_digest(commands: &BTreeMap<CommandId, Vec<ParsedRecord>>) -> Result<String> {
    let canonical = serde_json::to_string(&Nested(commands)).map_err(CheckError::from)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
