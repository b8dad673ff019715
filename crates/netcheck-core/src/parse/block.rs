//! Block family: a start line opens a record, body lines add fields

use super::grammar::Grammar;
use super::row::{RawRow, Unconfident};

pub(crate) fn parse_block(grammar: &Grammar, text: &str) -> Result<Vec<RawRow>, Unconfident> {
    let Grammar::Block(g) = grammar else {
        return Err(Unconfident::new("block parser given a non-block layout"));
    };

    let mut rows = Vec::new();
    let mut current: Option<RawRow> = None;
    let mut content_lines = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() || g.skip.iter().any(|s| s.is_match(line)) {
            continue;
        }
        content_lines += 1;

        if let Some(caps) = g.start.captures(line) {
            rows.extend(current.take());
            let mut row = RawRow::default();
            row.add_line(line);
            row.capture(&g.start, &caps);
            current = Some(row);
            continue;
        }

        let Some(row) = current.as_mut() else {
            continue;
        };
        row.add_line(line);
        for pattern in &g.lines {
            for caps in pattern.captures_iter(line) {
                row.capture(pattern, &caps);
            }
        }
        for (label, value) in labelled_pairs(line) {
            if let Some(field) = g.labels.get(label) {
                row.push(field, value);
            }
        }
    }
    rows.extend(current);

    if rows.is_empty() && content_lines > 0 {
        return Err(Unconfident::new("no line opened a record"));
    }
    Ok(rows)
}

/// `Label: value` pairs separated by commas or runs of spaces
fn labelled_pairs(line: &str) -> impl Iterator<Item = (&str, &str)> {
    line.split(',')
        .flat_map(|piece| piece.split("  "))
        .filter_map(|piece| piece.split_once(':'))
        .map(|(label, value)| (label.trim(), value.trim()))
        .filter(|(label, _)| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::grammar::BlockGrammar;
    use regex::Regex;
    use std::collections::BTreeMap;

    fn grammar() -> Grammar {
        let mut labels = BTreeMap::new();
        labels.insert("State".to_string(), "state".to_string());
        Grammar::Block(BlockGrammar {
            start: Regex::new(r"^Peer: (?P<peer>\S+)").unwrap(),
            lines: vec![Regex::new(r"via (?P<via>\S+)").unwrap()],
            labels,
            skip: vec![Regex::new(r"^#").unwrap()],
        })
    }

    #[test]
    fn test_records_and_repeated_captures() {
        let text = "# preamble\nPeer: 10.0.0.1\n  State: Established    Flags: <Sync>\n  via ge-0/0/0.0, via ge-0/0/1.0\nPeer: 10.0.0.2\n  State: Active\n";
        let rows = parse_block(&grammar(), text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].cells("via"),
            Some(&["ge-0/0/0.0".to_string(), "ge-0/0/1.0".to_string()][..])
        );
        assert_eq!(rows[0].cells("state"), Some(&["Established".to_string()][..]));
        assert_eq!(rows[1].cells("state"), Some(&["Active".to_string()][..]));
    }

    #[test]
    fn test_no_start_line_is_unconfident() {
        assert!(parse_block(&grammar(), "unexpected output\n").is_err());
    }

    #[test]
    fn test_only_skipped_lines_is_empty() {
        assert_eq!(parse_block(&grammar(), "# nothing here\n").unwrap(), vec![]);
    }
}
