//! Correlation types for run tracking
//!
//! A validation run spans many devices processed on a worker pool; these ids
//! let log lines from different workers be stitched back to one run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one validation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new RunId using UUIDv7 (time-ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace identifier supplied by an outer orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through a run for correlation
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    pub trace_id: Option<TraceId>,
}

impl RunContext {
    /// Create a new context with a fresh RunId
    pub fn new() -> Self {
        Self {
            run_id: RunId::new(),
            trace_id: None,
        }
    }

    /// Attach a TraceId handed down by the caller
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
