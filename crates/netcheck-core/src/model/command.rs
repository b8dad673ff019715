use serde::{Deserialize, Serialize};
use std::fmt;

/// Display modifiers that change paging only, never content
const PAGING_MODIFIERS: &[&str] = &["no-more"];

/// Normalized command identifier
///
/// Lowercased, whitespace-collapsed, with paging-only pipe modifiers removed.
/// Content filters such as `| match DN` stay part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    pub fn new(raw: &str) -> Self {
        let segments: Vec<String> = raw
            .split('|')
            .map(|segment| {
                segment
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .collect();

        let mut kept: Vec<String> = Vec::with_capacity(segments.len());
        for (idx, segment) in segments.into_iter().enumerate() {
            // Only pipe segments can be modifiers; the first is the command.
            if idx > 0 && (segment.is_empty() || PAGING_MODIFIERS.contains(&segment.as_str())) {
                continue;
            }
            kept.push(segment);
        }
        Self(kept.join(" | "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Capture phase relative to the upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    Post,
}

impl Phase {
    pub fn other(self) -> Phase {
        match self {
            Phase::Pre => Phase::Post,
            Phase::Post => Phase::Pre,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Pre => f.write_str("pre"),
            Phase::Post => f.write_str("post"),
        }
    }
}
