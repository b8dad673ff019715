//! Untyped rows produced by both parser tiers

use super::coerce::is_placeholder;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Raw cells for one prospective record
///
/// A field may collect several fragments: repeated block captures and table
/// continuation lines append, scalar coercion uses the first usable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawRow {
    cells: BTreeMap<String, Vec<String>>,
    lines: Vec<String>,
}

impl RawRow {
    pub fn push(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.cells
            .entry(field.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Every named group that participated in the match
    pub fn capture(&mut self, pattern: &Regex, caps: &Captures<'_>) {
        for name in pattern.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                self.push(name, m.as_str());
            }
        }
    }

    pub fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub fn cells(&self, field: &str) -> Option<&[String]> {
        self.cells.get(field).map(Vec::as_slice)
    }

    /// Field has at least one fragment that is not a placeholder
    pub fn has(&self, field: &str) -> bool {
        self.cells
            .get(field)
            .is_some_and(|values| values.iter().any(|v| !is_placeholder(v)))
    }

    /// Source lines, for failure triage
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }
}

/// Primary tier could not read the output with confidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unconfident(pub String);

impl Unconfident {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
