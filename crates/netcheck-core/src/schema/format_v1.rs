//! Schema file format v1
//!
//! Defines the YAML structure of a command schema registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level registry file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFileV1 {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    /// Command schemas in declaration order
    pub commands: Vec<CommandSchema>,
}

/// Expected record shape for one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Command as typed on the device; normalized when the registry is built
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Natural key field names; empty only for the key_value family
    #[serde(default)]
    pub key: Vec<String>,

    /// Field definitions in report order
    pub fields: Vec<FieldDef>,

    /// Primary parser layout
    pub layout: Layout,

    /// Line patterns with named groups, tried when the primary layout fails
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<String>,
}

impl CommandSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Semantic type of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Enum,
    List,
}

/// Tolerance policy as written in the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceKind {
    #[default]
    Exact,
    Ignore,
    NumericDelta,
}

/// Resolved tolerance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    Exact,
    Ignore,
    NumericDelta { threshold: u64 },
}

/// One field of a command schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Record is unusable without this field
    #[serde(default)]
    pub required: bool,

    /// Exact comparison folds case
    #[serde(default)]
    pub case_insensitive: bool,

    #[serde(default)]
    pub tolerance: ToleranceKind,

    /// Allowed absolute difference for `numeric_delta`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,

    /// Allowed spellings for `enum` fields; empty accepts any token
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl FieldDef {
    /// Tolerance with its threshold attached
    ///
    /// A `numeric_delta` without a threshold is rejected at load time, so the
    /// zero here is unreachable for validated schemas.
    pub fn tolerance(&self) -> Tolerance {
        match self.tolerance {
            ToleranceKind::Exact => Tolerance::Exact,
            ToleranceKind::Ignore => Tolerance::Ignore,
            ToleranceKind::NumericDelta => Tolerance::NumericDelta {
                threshold: self.threshold.unwrap_or(0),
            },
        }
    }
}

/// Output shape handled by the primary parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Layout {
    Table(TableLayout),
    Block(BlockLayout),
    KeyValue(KeyValueLayout),
}

impl Layout {
    pub fn family(&self) -> &'static str {
        match self {
            Layout::Table(_) => "table",
            Layout::Block(_) => "block",
            Layout::KeyValue(_) => "key_value",
        }
    }
}

/// Column-aligned or delimited rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Field names by column position
    pub columns: Vec<String>,

    /// Rows are read only after a line matching this pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Reading stops at a line matching this pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Lines matching any of these are ignored
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,

    /// Literal cell separator; whitespace when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,

    /// Last column absorbs any surplus cells
    #[serde(default)]
    pub rest: bool,

    /// List field receiving indented continuation lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

/// Multi-line records opened by a start line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    /// Pattern with named groups opening a record
    pub start: String,

    /// Patterns with named groups applied to every body line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,

    /// `Label: value` pairs in body lines, label to field
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Lines matching any of these are ignored
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,
}

/// A single record of labelled lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueLayout {
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Label to field
    pub labels: BTreeMap<String, String>,
}

fn default_separator() -> String {
    ":".to_string()
}
