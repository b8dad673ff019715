//! Parser engine
//!
//! Two tiers per command. The primary tier is a table-driven parser for the
//! schema's layout family (table, block or key/value). When it cannot read the
//! output with confidence (missing natural key or required field, surplus
//! columns, no recognizable rows) the schema's fallback line patterns are
//! tried, and every data line must match one of them. Every field is then
//! coerced to its declared type; a record with a field that fails coercion is
//! rejected whole.

mod block;
mod coerce;
mod fallback;
mod grammar;
mod key_value;
mod row;
mod table;

pub(crate) use grammar::{compile_layout, compile_patterns, Grammar};
pub(crate) use row::{RawRow, Unconfident};

use crate::errors::{CheckError, ExError};
use crate::model::{CommandId, NaturalKey, ParsedRecord};
use crate::schema::{CommandSchema, Layout, RegisteredCommand};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Primary parser for one layout family, resolved when the registry is built
pub(crate) type PrimaryParser = fn(&Grammar, &str) -> Result<Vec<RawRow>, Unconfident>;

pub(crate) fn primary_for(layout: &Layout) -> PrimaryParser {
    match layout {
        Layout::Table(_) => table::parse_table,
        Layout::Block(_) => block::parse_block,
        Layout::KeyValue(_) => key_value::parse_key_value,
    }
}

/// Which tier produced the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseTier {
    Primary,
    Fallback,
}

/// Records read from one command's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub records: Vec<ParsedRecord>,
    pub tier: ParseTier,
    /// Records dropped because a field failed type coercion
    pub rejected: Vec<ParseFailure>,
}

/// Output that could not be reduced to records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub command: CommandId,
    pub reason: String,
    /// Offending text, for operator triage
    pub raw: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse output of {}: {}", self.command, self.reason)
    }
}

impl std::error::Error for ParseFailure {}

impl From<ParseFailure> for CheckError {
    fn from(failure: ParseFailure) -> Self {
        CheckError::ParseFailure {
            command: failure.command,
            reason: failure.reason,
            raw: failure.raw,
        }
    }
}

impl From<ParseFailure> for ExError {
    fn from(failure: ParseFailure) -> Self {
        CheckError::from(failure).into()
    }
}

/// Parse one command's output against its registered schema
///
/// Blank output parses to zero records. Pure: the same input always yields
/// the same records in the same order.
///
/// # Errors
///
/// Returns a [`ParseFailure`] when neither tier reads the output.
pub fn parse_command(entry: &RegisteredCommand, output: &str) -> Result<Parsed, ParseFailure> {
    log_op_start!("parse_command", command = %entry.id());
    let start = std::time::Instant::now();

    let result = run_tiers(entry, output);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(parsed) => {
            log_op_end!(
                "parse_command",
                duration_ms = duration_ms,
                command = %entry.id(),
                record_count = parsed.records.len(),
                tier = ?parsed.tier
            );
        }
        Err(failure) => {
            log_op_error!(
                "parse_command",
                failure.clone(),
                duration_ms = duration_ms,
                command = %entry.id()
            );
        }
    }
    result
}

fn run_tiers(entry: &RegisteredCommand, output: &str) -> Result<Parsed, ParseFailure> {
    if output.trim().is_empty() {
        return Ok(Parsed {
            records: Vec::new(),
            tier: ParseTier::Primary,
            rejected: Vec::new(),
        });
    }

    let schema = entry.schema();
    let primary = (entry.primary())(entry.grammar(), output)
        .and_then(|rows| check_confident(schema, rows));

    let (rows, tier) = match primary {
        Ok(rows) => (rows, ParseTier::Primary),
        Err(Unconfident(reason)) => {
            tracing::debug!(
                command = %entry.id(),
                reason = %reason,
                "primary parser unconfident, trying fallback patterns"
            );
            let failure = |detail: &str| ParseFailure {
                command: entry.id().clone(),
                reason: format!("primary parser: {}; {}", reason, detail),
                raw: output.to_string(),
            };
            if entry.fallback().is_empty() {
                return Err(failure("no fallback patterns"));
            }
            let extracted = fallback::extract(entry.grammar(), entry.fallback(), output);
            if extracted.rows.is_empty() {
                return Err(failure("fallback patterns matched no line"));
            }
            // Dropping an unread line would hide a record from the comparison.
            if !extracted.unmatched.is_empty() {
                return Err(ParseFailure {
                    raw: extracted.unmatched.join("\n"),
                    ..failure(&format!(
                        "fallback: {} data line(s) matched no pattern",
                        extracted.unmatched.len()
                    ))
                });
            }
            match check_confident(schema, extracted.rows) {
                Ok(rows) => (rows, ParseTier::Fallback),
                Err(Unconfident(detail)) => return Err(failure(&format!("fallback: {}", detail))),
            }
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for row in rows {
        match build_record(entry.id(), schema, &row) {
            Ok(record) => records.push(record),
            Err(reason) => rejected.push(ParseFailure {
                command: entry.id().clone(),
                reason,
                raw: row.source(),
            }),
        }
    }

    Ok(Parsed {
        records,
        tier,
        rejected,
    })
}

/// Every row must carry its natural key and required fields
fn check_confident(schema: &CommandSchema, rows: Vec<RawRow>) -> Result<Vec<RawRow>, Unconfident> {
    for (idx, row) in rows.iter().enumerate() {
        if let Some(field) = schema.key.iter().find(|k| !row.has(k)) {
            return Err(Unconfident::new(format!(
                "record {}: missing natural key field `{}`",
                idx + 1,
                field
            )));
        }
        if let Some(def) = schema.fields.iter().find(|f| f.required && !row.has(&f.name)) {
            return Err(Unconfident::new(format!(
                "record {}: missing required field `{}`",
                idx + 1,
                def.name
            )));
        }
    }
    Ok(rows)
}

fn build_record(command: &CommandId, schema: &CommandSchema, row: &RawRow) -> Result<ParsedRecord, String> {
    let mut fields = BTreeMap::new();
    for def in &schema.fields {
        let Some(cells) = row.cells(&def.name) else {
            continue;
        };
        match coerce::coerce(def, cells) {
            Ok(Some(value)) => {
                fields.insert(def.name.clone(), value);
            }
            Ok(None) => {}
            Err(reason) => return Err(format!("field `{}`: {}", def.name, reason)),
        }
    }

    let key = schema
        .key
        .iter()
        .map(|k| {
            fields
                .get(k)
                .map(|v| v.to_string())
                .ok_or_else(|| format!("natural key field `{}` is empty", k))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedRecord::new(command.clone(), NaturalKey::new(key), fields))
}
