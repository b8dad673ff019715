use serde::{Serialize, Serializer};
use std::fmt::{self, Write};

/// Typed field value after schema coercion
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    /// One of the schema's declared variants, in its declared spelling
    Enum(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) | FieldValue::Enum(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Identity of a record within one command's output
///
/// Ordered component-wise; an empty key identifies the single record of a
/// key/value command.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NaturalKey(Vec<String>);

impl NaturalKey {
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    pub fn singleton() -> Self {
        Self(Vec::new())
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn is_singleton(&self) -> bool {
        self.0.is_empty()
    }
}

/// Components joined by `|`; a `|` or `\` inside a component is escaped
/// with `\`, so distinct keys never render alike
impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("*");
        }
        for (idx, component) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_char('|')?;
            }
            for ch in component.chars() {
                if matches!(ch, '|' | '\\') {
                    f.write_char('\\')?;
                }
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

impl Serialize for NaturalKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for NaturalKey {
    fn from(single: &str) -> Self {
        Self(vec![single.to_string()])
    }
}
