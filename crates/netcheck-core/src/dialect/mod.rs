//! Vendor CLI dialects
//!
//! Each dialect knows how its devices print prompts, paginate and decorate
//! output. The segmenter and parser engine only talk to [`CliDialect`]; the
//! concrete dialect is chosen from the device's [`Vendor`] metadata.

mod ios;
mod junos;

pub use ios::IosDialect;
pub use junos::JunosDialect;

use crate::parse::{parse_command, ParseFailure, Parsed};
use crate::schema::RegisteredCommand;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Device operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Junos,
    Ios,
}

impl Vendor {
    pub fn dialect(self) -> &'static dyn CliDialect {
        match self {
            Vendor::Junos => &JunosDialect,
            Vendor::Ios => &IosDialect,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vendor::Junos => f.write_str("junos"),
            Vendor::Ios => f.write_str("ios"),
        }
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junos" | "juniper" | "juniper_junos" => Ok(Vendor::Junos),
            "ios" | "cisco" | "cisco_ios" => Ok(Vendor::Ios),
            other => Err(format!("unknown vendor `{}` (expected junos or ios)", other)),
        }
    }
}

/// Vendor-specific reading of raw CLI text
pub trait CliDialect: Send + Sync + fmt::Debug {
    fn vendor(&self) -> Vendor;

    /// If `line` starts with a device prompt, the text typed after it
    ///
    /// Returns `Some("")` for a bare prompt.
    fn prompt_command<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// Remove pagination artifacts from a line
    ///
    /// Returns `None` when the line held nothing but pagination.
    fn strip_pagination(&self, line: &str) -> Option<String>;

    /// Decoration lines the device prints between data lines
    fn is_noise(&self, line: &str) -> bool;

    /// Reduce one command's output to records
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] when neither parser tier could read the output.
    fn parse(&self, entry: &RegisteredCommand, output: &str) -> Result<Parsed, ParseFailure> {
        parse_command(entry, output)
    }
}

/// Built-in dialect pattern, compiled on first use
///
/// `None` only if the literal is malformed, which the dialect tests rule out;
/// callers then treat the line as ordinary text.
pub(crate) fn dialect_pattern(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::error!(pattern = pattern, error = %err, "dialect pattern does not compile");
            None
        }
    })
    .as_ref()
}
