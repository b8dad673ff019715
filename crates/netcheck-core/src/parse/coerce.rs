//! Field type coercion

use crate::model::FieldValue;
use crate::schema::{FieldDef, FieldType};

/// Cells that mean "no value"
const PLACEHOLDERS: &[&str] = &["-", "--", "n/a"];

pub(crate) fn is_placeholder(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || PLACEHOLDERS.iter().any(|p| cell.eq_ignore_ascii_case(p))
}

/// Coerce raw fragments to the field's declared type
///
/// `Ok(None)` means the field is absent.
pub(crate) fn coerce(def: &FieldDef, cells: &[String]) -> Result<Option<FieldValue>, String> {
    if def.field_type == FieldType::List {
        let items: Vec<String> = cells
            .iter()
            .flat_map(|cell| cell.split(','))
            .map(str::trim)
            .filter(|item| !is_placeholder(item))
            .map(str::to_string)
            .collect();
        return Ok((!items.is_empty()).then_some(FieldValue::List(items)));
    }

    let Some(first) = cells.iter().map(|c| c.trim()).find(|c| !is_placeholder(c)) else {
        return Ok(None);
    };

    match def.field_type {
        FieldType::String => Ok(Some(FieldValue::Str(first.to_string()))),
        FieldType::Integer => parse_integer(first)
            .map(|n| Some(FieldValue::Int(n)))
            .ok_or_else(|| format!("cannot coerce `{}` to integer", first)),
        FieldType::Enum => {
            if def.values.is_empty() {
                return Ok(Some(FieldValue::Enum(first.to_string())));
            }
            def.values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(first))
                .map(|v| Some(FieldValue::Enum(v.clone())))
                .ok_or_else(|| {
                    format!("`{}` is not one of [{}]", first, def.values.join(", "))
                })
        }
        FieldType::List => Ok(None),
    }
}

/// Signed integer with optional `,`/`_` digit grouping
fn parse_integer(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned.parse::<i64>().ok()
}
