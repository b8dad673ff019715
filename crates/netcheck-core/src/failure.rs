//! Non-fatal failures as values
//!
//! Every stage returns the failures it met instead of raising them; the
//! pipeline threads one [`FailureLog`] per device through its stages.

use crate::errors::{ExError, ExErrorKind};
use crate::model::{CommandId, Phase};
use serde::Serialize;

/// One recorded failure or warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandId>,
    #[serde(rename = "code")]
    pub kind: ExErrorKind,
    pub message: String,
    /// Offending raw text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Failure {
    pub fn new(kind: ExErrorKind, device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            phase: None,
            command: None,
            kind,
            message: message.into(),
            raw: None,
        }
    }

    /// Capture the kind and context of a structured error
    pub fn from_error(device_id: impl Into<String>, err: &ExError) -> Self {
        let message = if err.message().is_empty() {
            err.to_string()
        } else {
            err.message().to_string()
        };
        Self {
            device_id: device_id.into(),
            phase: err.phase(),
            command: err.command().cloned(),
            kind: err.kind(),
            message,
            raw: None,
        }
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_command(mut self, command: CommandId) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Whether this failure removes its command from comparison
    pub fn excludes_command(&self) -> bool {
        self.command.is_some() && self.kind.excludes_command()
    }
}

/// Ordered accumulator of failures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureLog {
    entries: Vec<Failure>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: Failure) {
        self.entries.push(failure);
    }

    pub fn into_vec(self) -> Vec<Failure> {
        self.entries
    }
}
