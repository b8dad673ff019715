//! Data model shared by every pipeline stage
//!
//! Records and snapshots are immutable once built; every map is a `BTreeMap`
//! so iteration and serialization order are deterministic.

mod capture;
mod command;
mod record;
mod value;

pub use capture::{CaptureBody, RawCapture};
pub use command::{CommandId, Phase};
pub use record::ParsedRecord;
pub(crate) use record::render_fields;
pub use value::{FieldValue, NaturalKey};
