//! Pre/post snapshot comparison
//!
//! ## Entry point
//!
//! ```ignore
//! use netcheck_core::diff::compare;
//!
//! let result = compare(&registry, &pre, &post)?;
//! let summary = netcheck_core::diff::render_human_summary(&[result]);
//! ```
//!
//! ## Guarantees
//!
//! - **Purity**: the result depends only on the registry and the two snapshots.
//! - **Determinism**: entries are grouped by command in registry declaration
//!   order, then by natural key; equal inputs serialize byte-identically.
//! - **No implicit whitelist**: expected differences are expressed only
//!   through per-field tolerance in the schema.

pub mod engine;
pub mod human_summary;
pub mod model;
pub mod tolerance;

pub use engine::compare;
pub use human_summary::render_human_summary;
pub use model::{
    CommandSummary, CommandVerdict, ComparisonResult, DiffEntry, DiffStatus, FieldChange, Verdict,
};
