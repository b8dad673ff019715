use crate::model::{CommandId, Phase};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExErrorKind {
    // Capture/segmentation
    /// Capture has no recognizable command boundaries
    Segmentation,
    /// Output captured for a command that has no schema
    UnschematizedCommand,
    /// Same command echoed more than once in one capture
    RepeatedCommand,

    // Parsing
    /// Neither parser tier could reduce the output to records
    ParseFailure,
    /// A single record was rejected because a field failed type coercion
    TypeCoercion,
    /// Two records share a natural key within one snapshot slice
    DuplicateKey,

    // Comparison
    /// Pre/post snapshots belong to different devices
    DeviceMismatch,
    /// Schema exists but no output was captured for one phase
    CommandMissing,

    // Configuration
    /// Schema configuration failed validation
    SchemaInvalid,
    InvalidInput,

    // Run control
    Cancelled,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Segmentation => "ERR_SEGMENTATION",
            ExErrorKind::UnschematizedCommand => "ERR_UNSCHEMATIZED_COMMAND",
            ExErrorKind::RepeatedCommand => "ERR_REPEATED_COMMAND",
            ExErrorKind::ParseFailure => "ERR_PARSE_FAILURE",
            ExErrorKind::TypeCoercion => "ERR_TYPE_COERCION",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::DeviceMismatch => "ERR_DEVICE_MISMATCH",
            ExErrorKind::CommandMissing => "ERR_COMMAND_MISSING",
            ExErrorKind::SchemaInvalid => "ERR_SCHEMA_INVALID",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a failure of this kind removes its command from comparison
    pub fn excludes_command(&self) -> bool {
        matches!(self, ExErrorKind::ParseFailure | ExErrorKind::DuplicateKey)
    }
}

impl Serialize for ExErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Canonical structured error type
///
/// Carries classification for programmatic handling and the device/command
/// context needed to triage a failed validation run.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    device_id: Option<String>,
    command: Option<CommandId>,
    phase: Option<Phase>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            device_id: None,
            command: None,
            phase: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add device context
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Add command context
    pub fn with_command(mut self, command: CommandId) -> Self {
        self.command = Some(command);
        self
    }

    /// Add capture phase context
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn command(&self) -> Option<&CommandId> {
        self.command.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(device_id) = &self.device_id {
            write!(f, " (device: {})", device_id)?;
        }
        if let Some(phase) = self.phase {
            write!(f, " (phase: {})", phase)?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for capture parsing and comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    // ===== Capture Errors =====
    /// No command boundary was recognized anywhere in the capture
    #[error("No recognizable command boundaries in capture ({line_count} lines scanned)")]
    Segmentation { line_count: usize },

    /// Command was captured but the registry has no schema for it
    #[error("Command has no schema: {command}")]
    UnschematizedCommand { command: CommandId },

    // ===== Parse Errors =====
    /// Both parser tiers failed for a command
    #[error("Could not parse output of {command}: {reason}")]
    ParseFailure {
        command: CommandId,
        reason: String,
        raw: String,
    },

    /// A field value could not be coerced to its declared type
    #[error("Field `{field}` of {command}: {reason}")]
    TypeCoercion {
        command: CommandId,
        field: String,
        reason: String,
    },

    /// Two records share a natural key
    #[error("Duplicate natural key `{key}` in output of {command}")]
    DuplicateKey { command: CommandId, key: String },

    // ===== Comparison Errors =====
    /// Snapshots belong to different devices
    #[error("Cannot compare snapshots of different devices: pre={pre_device}, post={post_device}")]
    DeviceMismatch {
        pre_device: String,
        post_device: String,
    },

    /// No output was captured for a schematized command in one phase
    #[error("Command {command} was not captured in the {missing_in} phase")]
    CommandMissing { command: CommandId, missing_in: Phase },

    // ===== Configuration Errors =====
    /// Schema definition failed validation
    #[error("Invalid schema for {command}: {reason}")]
    SchemaInvalid { command: String, reason: String },

    /// Registry file declares a version this build does not read
    #[error("Unsupported schema_version: {found}. Expected {expected}")]
    UnsupportedSchemaVersion { found: u32, expected: u32 },

    // ===== Generic Errors =====
    /// Serialization error (JSON/YAML encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from CheckError to ExError
impl From<CheckError> for ExError {
    fn from(err: CheckError) -> Self {
        let message = err.to_string();
        match err {
            CheckError::Segmentation { .. } => ExError::new(ExErrorKind::Segmentation)
                .with_op("segment")
                .with_message(message),

            CheckError::UnschematizedCommand { command } => {
                ExError::new(ExErrorKind::UnschematizedCommand)
                    .with_op("segment")
                    .with_command(command)
                    .with_message("command output captured but no schema is registered")
            }

            CheckError::ParseFailure { command, reason, .. } => {
                ExError::new(ExErrorKind::ParseFailure)
                    .with_op("parse")
                    .with_command(command)
                    .with_message(reason)
            }

            CheckError::TypeCoercion { command, .. } => ExError::new(ExErrorKind::TypeCoercion)
                .with_op("parse")
                .with_command(command)
                .with_message(message),

            CheckError::DuplicateKey { command, .. } => ExError::new(ExErrorKind::DuplicateKey)
                .with_op("build_snapshot")
                .with_command(command)
                .with_message(message),

            CheckError::DeviceMismatch { .. } => ExError::new(ExErrorKind::DeviceMismatch)
                .with_op("compare")
                .with_message(message),

            CheckError::CommandMissing {
                command,
                missing_in,
            } => ExError::new(ExErrorKind::CommandMissing)
                .with_op("compare")
                .with_command(command)
                .with_phase(missing_in)
                .with_message("schema exists but no output was captured"),

            CheckError::SchemaInvalid { .. } | CheckError::UnsupportedSchemaVersion { .. } => {
                ExError::new(ExErrorKind::SchemaInvalid)
                    .with_op("load_registry")
                    .with_message(message)
            }

            CheckError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            CheckError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CheckError {
    fn from(err: serde_yaml::Error) -> Self {
        CheckError::Serialization {
            message: err.to_string(),
        }
    }
}
