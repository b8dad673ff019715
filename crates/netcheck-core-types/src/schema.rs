//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_DEVICE_ID: &str = "device_id";
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_PHASE: &str = "phase";

// Collection sizes
pub const FIELD_BLOCK_COUNT: &str = "block_count";
pub const FIELD_RECORD_COUNT: &str = "record_count";
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_COMMAND: &str = "err_command";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
