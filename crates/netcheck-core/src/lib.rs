//! netcheck core - parsing and differential comparison of device state
//!
//! Turns raw CLI captures taken before and after a software upgrade into
//! typed records and classifies every difference between them:
//! - Schema registry (declarative per-command record shapes and tolerances)
//! - Vendor dialects (prompts, pagination, decoration lines)
//! - Segmenter (raw capture to per-command blocks)
//! - Parser engine (table/block/key-value grammars with regex fallback)
//! - Snapshot builder, comparator and tabulator
//!
//! Everything here is pure and synchronous; orchestration lives in
//! `netcheck-engine`.

pub mod dialect;
pub mod diff;
pub mod errors;
pub mod failure;
pub mod logging_facility;
pub mod model;
pub mod parse;
pub mod schema;
pub mod segment;
pub mod snapshot;
pub mod tabulate;

// Re-export commonly used types
pub use dialect::{CliDialect, Vendor};
pub use diff::{compare, ComparisonResult, DiffEntry, DiffStatus, Verdict};
pub use errors::{CheckError, ExError, ExErrorKind, Result};
pub use failure::{Failure, FailureLog};
pub use model::{CaptureBody, CommandId, FieldValue, NaturalKey, ParsedRecord, Phase, RawCapture};
pub use parse::{parse_command, ParseFailure, ParseTier, Parsed};
pub use schema::{parse_registry_file, parse_registry_str, SchemaRegistry};
pub use segment::{segment, segment_blocks, Segmentation, SegmentedBlock};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use tabulate::{tabulate, tabulate_failures, FailureRow, TableRow, TabulateOptions};
