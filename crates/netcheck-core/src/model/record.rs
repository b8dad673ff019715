use super::{CommandId, FieldValue, NaturalKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// One typed record extracted from a command's output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    command: CommandId,
    key: NaturalKey,
    fields: BTreeMap<String, FieldValue>,
}

impl ParsedRecord {
    pub fn new(command: CommandId, key: NaturalKey, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            command,
            key,
            fields,
        }
    }

    pub fn command(&self) -> &CommandId {
        &self.command
    }

    pub fn key(&self) -> &NaturalKey {
        &self.key
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// `name=value` pairs in field-name order
    pub fn render(&self) -> String {
        render_fields(&self.fields)
    }
}

pub(crate) fn render_fields(fields: &BTreeMap<String, FieldValue>) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}
