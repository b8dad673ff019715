//! Second tier: per-line patterns with named groups

use super::grammar::Grammar;
use super::row::RawRow;
use regex::Regex;

/// Rows read by the fallback patterns, plus the data lines none of them read
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub rows: Vec<RawRow>,
    pub unmatched: Vec<String>,
}

/// One row per data line matched by any pattern; the first matching pattern wins
///
/// Lines the layout itself accounts for (headers, skipped lines, trailers)
/// are not data. Every other line must match, or it is reported unmatched.
pub(crate) fn extract(grammar: &Grammar, patterns: &[Regex], text: &str) -> Extracted {
    let mut extracted = Extracted::default();
    for line in grammar.content_lines(text) {
        let hit = patterns
            .iter()
            .find_map(|pattern| pattern.captures(line).map(|caps| (pattern, caps)));
        match hit {
            Some((pattern, caps)) => {
                let mut row = RawRow::default();
                row.add_line(line);
                row.capture(pattern, &caps);
                extracted.rows.push(row);
            }
            None => extracted.unmatched.push(line.to_string()),
        }
    }
    extracted
}
