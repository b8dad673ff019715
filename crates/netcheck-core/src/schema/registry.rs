//! Registry loading, validation and compilation

use super::format_v1::{CommandSchema, FieldType, Layout, RegistryFileV1, ToleranceKind};
use crate::errors::{CheckError, ExError, ExErrorKind, Result};
use crate::model::CommandId;
use crate::parse::{compile_layout, compile_patterns, primary_for, Grammar, PrimaryParser};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

const SUPPORTED_SCHEMA_VERSION: u32 = 1;

const BUILTIN_SCHEMAS: &str = include_str!("builtin_schemas.yaml");

/// One command schema resolved for parsing
#[derive(Clone)]
pub struct RegisteredCommand {
    id: CommandId,
    schema: CommandSchema,
    grammar: Grammar,
    primary: PrimaryParser,
    fallback: Vec<Regex>,
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("id", &self.id)
            .field("family", &self.schema.layout.family())
            .field("fallback_patterns", &self.fallback.len())
            .finish()
    }
}

impl RegisteredCommand {
    pub fn id(&self) -> &CommandId {
        &self.id
    }

    pub fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    pub(crate) fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub(crate) fn primary(&self) -> PrimaryParser {
        self.primary
    }

    pub(crate) fn fallback(&self) -> &[Regex] {
        &self.fallback
    }
}

/// Read-only mapping from command id to schema, in declaration order
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    commands: Vec<RegisteredCommand>,
    index: BTreeMap<CommandId, usize>,
}

impl SchemaRegistry {
    /// Schemas shipped with the crate (common Junos and IOS commands)
    ///
    /// # Errors
    ///
    /// Only fails if the embedded definitions are themselves invalid.
    pub fn builtin() -> Result<Self> {
        parse_registry_str(BUILTIN_SCHEMAS)
    }

    /// Validate and compile schemas declared in code
    ///
    /// # Errors
    ///
    /// Returns `ERR_SCHEMA_INVALID` for the first schema that fails validation.
    pub fn from_schemas(schemas: Vec<CommandSchema>) -> Result<Self> {
        compile(RegistryFileV1 {
            schema_version: SUPPORTED_SCHEMA_VERSION,
            commands: schemas,
        })
    }

    pub fn get(&self, id: &CommandId) -> Option<&RegisteredCommand> {
        self.index.get(id).map(|&idx| &self.commands[idx])
    }

    pub fn contains(&self, id: &CommandId) -> bool {
        self.index.contains_key(id)
    }

    /// Declaration position of a command
    pub fn position(&self, id: &CommandId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Commands in declaration order
    pub fn commands(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Parse a registry file from a path
///
/// # Errors
///
/// `ERR_IO` when the file cannot be read, otherwise as [`parse_registry_str`].
pub fn parse_registry_file(path: &Path) -> Result<SchemaRegistry> {
    let content = fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("load_registry")
            .with_message(format!("Failed to read schema file {}: {}", path.display(), e))
    })?;
    parse_registry_str(&content)
}

/// Parse a registry from YAML text
///
/// # Errors
///
/// `ERR_SCHEMA_INVALID` for YAML errors and for any validation failure.
pub fn parse_registry_str(content: &str) -> Result<SchemaRegistry> {
    let file: RegistryFileV1 = serde_yaml::from_str(content)
        .map_err(|e| invalid("<file>", format!("YAML parse error: {}", e)))?;
    compile(file)
}

fn invalid(command: &str, reason: impl Into<String>) -> ExError {
    CheckError::SchemaInvalid {
        command: command.to_string(),
        reason: reason.into(),
    }
    .into()
}

fn compile(file: RegistryFileV1) -> Result<SchemaRegistry> {
    if file.schema_version != SUPPORTED_SCHEMA_VERSION {
        return Err(CheckError::UnsupportedSchemaVersion {
            found: file.schema_version,
            expected: SUPPORTED_SCHEMA_VERSION,
        }
        .into());
    }
    if file.commands.is_empty() {
        return Err(invalid("<file>", "registry declares no commands"));
    }

    let mut commands = Vec::with_capacity(file.commands.len());
    let mut index = BTreeMap::new();
    for schema in file.commands {
        let id = CommandId::new(&schema.command);
        if id.is_empty() {
            return Err(invalid(&schema.command, "command must not be empty"));
        }
        if index.contains_key(&id) {
            return Err(invalid(&schema.command, format!("duplicate command `{}`", id)));
        }
        validate_schema(&schema)?;

        let grammar = compile_layout(&schema.command, &schema.layout)?;
        let fallback = compile_patterns(&schema.command, &schema.fallback)?;
        check_group_names(&schema, &grammar, &fallback)?;

        index.insert(id.clone(), commands.len());
        commands.push(RegisteredCommand {
            id,
            primary: primary_for(&schema.layout),
            schema,
            grammar,
            fallback,
        });
    }

    Ok(SchemaRegistry { commands, index })
}

fn validate_schema(schema: &CommandSchema) -> Result<()> {
    let cmd = schema.command.as_str();

    let mut names = HashSet::new();
    for field in &schema.fields {
        if field.name.trim().is_empty() {
            return Err(invalid(cmd, "field with empty name"));
        }
        if !names.insert(field.name.as_str()) {
            return Err(invalid(cmd, format!("duplicate field `{}`", field.name)));
        }
        match (field.tolerance, field.threshold) {
            (ToleranceKind::NumericDelta, None) => {
                return Err(invalid(
                    cmd,
                    format!("field `{}`: numeric_delta requires a threshold", field.name),
                ))
            }
            (ToleranceKind::NumericDelta, Some(_)) if field.field_type != FieldType::Integer => {
                return Err(invalid(
                    cmd,
                    format!("field `{}`: numeric_delta applies only to integer fields", field.name),
                ))
            }
            (ToleranceKind::Exact | ToleranceKind::Ignore, Some(_)) => {
                return Err(invalid(
                    cmd,
                    format!("field `{}`: threshold without numeric_delta", field.name),
                ))
            }
            _ => {}
        }
        if !field.values.is_empty() && field.field_type != FieldType::Enum {
            return Err(invalid(
                cmd,
                format!("field `{}`: values are only allowed on enum fields", field.name),
            ));
        }
    }

    let declared = |name: &str| names.contains(name);
    for key in &schema.key {
        if !declared(key.as_str()) {
            return Err(invalid(cmd, format!("natural key field `{}` is not declared", key)));
        }
    }
    if schema.key.is_empty() && !matches!(schema.layout, Layout::KeyValue(_)) {
        return Err(invalid(
            cmd,
            format!("{} layout requires a natural key", schema.layout.family()),
        ));
    }

    match &schema.layout {
        Layout::Table(table) => {
            if table.columns.is_empty() {
                return Err(invalid(cmd, "table layout declares no columns"));
            }
            if let Some(column) = table.columns.iter().find(|c| !declared(c.as_str())) {
                return Err(invalid(cmd, format!("column `{}` is not a declared field", column)));
            }
            if let Some(key) = schema.key.iter().find(|k| !table.columns.contains(*k)) {
                return Err(invalid(cmd, format!("natural key field `{}` is not a column", key)));
            }
            if let Some(field) = &table.continuation {
                let is_list = schema
                    .field(field)
                    .is_some_and(|f| f.field_type == FieldType::List);
                if !is_list {
                    return Err(invalid(
                        cmd,
                        format!("continuation field `{}` must be a declared list field", field),
                    ));
                }
            }
            if table.delimiter.as_deref() == Some("") {
                return Err(invalid(cmd, "table delimiter must not be empty"));
            }
        }
        Layout::Block(block) => {
            if let Some(field) = block.labels.values().find(|f| !declared(f.as_str())) {
                return Err(invalid(cmd, format!("label maps to undeclared field `{}`", field)));
            }
        }
        Layout::KeyValue(kv) => {
            if kv.labels.is_empty() {
                return Err(invalid(cmd, "key_value layout declares no labels"));
            }
            if kv.separator.is_empty() {
                return Err(invalid(cmd, "key_value separator must not be empty"));
            }
            if let Some(field) = kv.labels.values().find(|f| !declared(f.as_str())) {
                return Err(invalid(cmd, format!("label maps to undeclared field `{}`", field)));
            }
            if let Some(key) = schema.key.iter().find(|k| !kv.labels.values().any(|f| f == *k)) {
                return Err(invalid(cmd, format!("natural key field `{}` has no label", key)));
            }
        }
    }
    Ok(())
}

/// Named capture groups must be declared fields; every natural key field of
/// a block layout must be read by a pattern group or a label
fn check_group_names(schema: &CommandSchema, grammar: &Grammar, fallback: &[Regex]) -> Result<()> {
    let cmd = schema.command.as_str();
    let mut patterns: Vec<&Regex> = fallback.iter().collect();
    if let Grammar::Block(block) = grammar {
        patterns.push(&block.start);
        patterns.extend(block.lines.iter());

        let read: HashSet<&str> = std::iter::once(&block.start)
            .chain(block.lines.iter())
            .flat_map(|p| p.capture_names().flatten())
            .chain(block.labels.values().map(String::as_str))
            .collect();
        if let Some(key) = schema.key.iter().find(|k| !read.contains(k.as_str())) {
            return Err(invalid(
                cmd,
                format!("block layout never reads natural key field `{}`", key),
            ));
        }
    }

    for pattern in patterns {
        if let Some(group) = pattern
            .capture_names()
            .flatten()
            .find(|g| schema.field(g).is_none())
        {
            return Err(invalid(
                cmd,
                format!("pattern group `{}` is not a declared field", group),
            ));
        }
    }
    Ok(())
}
