//! Schema registry
//!
//! Declarative command schemas (YAML, `schema_version: 1`) validated and
//! compiled once into a read-only [`SchemaRegistry`]. Each registered command
//! carries its compiled grammar and a pointer to its primary parser.

mod format_v1;
mod registry;

pub use format_v1::{
    BlockLayout, CommandSchema, FieldDef, FieldType, KeyValueLayout, Layout, RegistryFileV1,
    TableLayout, Tolerance, ToleranceKind,
};
pub use registry::{parse_registry_file, parse_registry_str, RegisteredCommand, SchemaRegistry};
