//! Operation lifecycle macros
//!
//! Every pipeline stage (`segment`, `parse_command`, `compare`,
//! `process_capture`, `run`) brackets its work with a start event and either
//! an end or an end_error event. All three share the `component`, `op` and
//! `event` fields; the rest are the caller's `device_id`, `command`, counts.
//!
//! Event names come from [`netcheck_core_types::schema`] through this module,
//! so callers only need `tracing` in scope.

#[doc(hidden)]
pub use netcheck_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

/// One lifecycle event at `$level`
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::macros::$event,
            $($($field)*)?
        )
    };
}

/// Log that an operation started
///
/// ```
/// # use netcheck_core::log_op_start;
/// log_op_start!("process_capture", device_id = "mx80-re0", phase = "pre");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log that an operation finished; `duration_ms` is mandatory and first
///
/// ```
/// # use netcheck_core::log_op_end;
/// log_op_end!("segment", duration_ms = 3, block_count = 9);
/// log_op_end!("parse_command", duration_ms = 1, command = "show bgp summary");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)*)?)
    };
}

/// Log that an operation failed
///
/// `$err` is converted into [`ExError`](crate::errors::ExError); its code,
/// kind and the command it names (as `err_command`) are recorded.
///
/// ```
/// # use netcheck_core::{log_op_error, errors::CheckError};
/// let err = CheckError::Segmentation { line_count: 0 };
/// log_op_error!("segment", err, duration_ms = 1, device_id = "mx80-re0");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_command = ex_err.command().map($crate::model::CommandId::as_str)
            $(, $($field)*)?
        )
    }};
}
