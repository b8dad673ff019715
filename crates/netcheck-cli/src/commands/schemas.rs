//! Schemas command
//!
//! Usage: netcheck schemas [--schema <FILE>] [--json]
//!
//! Loading validates the file, so this doubles as a schema linter.

use super::{load_registry, print_json, Outcome};
use clap::Args;
use netcheck_core::schema::{CommandSchema, SchemaRegistry, Tolerance};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SchemasArgs {
    /// Schema file (default: built-in schemas)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Print the full schema definitions as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SchemasArgs) -> anyhow::Result<Outcome> {
    let registry = load_registry(args.schema.as_deref())?;
    if args.json {
        let schemas: Vec<&CommandSchema> = registry.commands().map(|c| c.schema()).collect();
        print_json(&schemas)?;
    } else {
        print!("{}", render_listing(&registry));
    }
    Ok(Outcome::Pass)
}

fn render_listing(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for entry in registry.commands() {
        let schema = entry.schema();
        let key = if schema.key.is_empty() {
            "*".to_string()
        } else {
            schema.key.join(", ")
        };
        out.push_str(&format!("{} [{}] key: {}\n", entry.id(), schema.layout.family(), key));
        for field in &schema.fields {
            let tolerance = match field.tolerance() {
                Tolerance::Exact => String::new(),
                Tolerance::Ignore => " (ignored)".to_string(),
                Tolerance::NumericDelta { threshold } => format!(" (within {})", threshold),
            };
            out.push_str(&format!("    {}{}\n", field.name, tolerance));
        }
    }
    out.push_str(&format!("{} commands\n", registry.len()));
    out
}
