//! Key/value family: labelled lines folded into a single record

use super::grammar::Grammar;
use super::row::{RawRow, Unconfident};

pub(crate) fn parse_key_value(grammar: &Grammar, text: &str) -> Result<Vec<RawRow>, Unconfident> {
    let Grammar::KeyValue(g) = grammar else {
        return Err(Unconfident::new("key/value parser given a non key/value layout"));
    };

    let mut row = RawRow::default();
    let mut matched = false;
    for line in text.lines() {
        let Some((label, value)) = line.split_once(g.separator.as_str()) else {
            continue;
        };
        if let Some(field) = g.labels.get(label.trim()) {
            row.push(field, value);
            row.add_line(line);
            matched = true;
        }
    }

    if !matched {
        return Err(Unconfident::new("no labelled line found"));
    }
    Ok(vec![row])
}
