//! Field equality under tolerance policy
//!
//! Precedence: `ignore`, then `numeric_delta` (only when both values are
//! integers), then exact equality after trimming and, for fields marked
//! `case_insensitive`, case folding. Lists compare as multisets.

use crate::model::FieldValue;
use crate::schema::{FieldDef, Tolerance};

/// Whether two values of one field count as equal
pub fn values_equal(def: &FieldDef, pre: Option<&FieldValue>, post: Option<&FieldValue>) -> bool {
    let tolerance = def.tolerance();
    if tolerance == Tolerance::Ignore {
        return true;
    }
    let (pre, post) = match (pre, post) {
        (None, None) => return true,
        (Some(pre), Some(post)) => (pre, post),
        _ => return false,
    };
    if let (Tolerance::NumericDelta { threshold }, Some(a), Some(b)) =
        (tolerance, pre.as_int(), post.as_int())
    {
        return (i128::from(a) - i128::from(b)).unsigned_abs() <= u128::from(threshold);
    }
    normalized(def, pre) == normalized(def, post)
}

fn normalized(def: &FieldDef, value: &FieldValue) -> Vec<String> {
    let fold = |s: &str| {
        let s = s.trim();
        if def.case_insensitive {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    };
    match value {
        FieldValue::List(items) => {
            let mut items: Vec<String> = items.iter().map(|i| fold(i)).collect();
            items.sort();
            items
        }
        FieldValue::Int(n) => vec![n.to_string()],
        FieldValue::Str(s) | FieldValue::Enum(s) => vec![fold(s)],
    }
}
