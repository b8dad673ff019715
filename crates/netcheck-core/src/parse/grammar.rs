//! Compiled form of a schema layout

use crate::errors::CheckError;
use crate::schema::{BlockLayout, KeyValueLayout, Layout, TableLayout};
use regex::Regex;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub(crate) enum Grammar {
    Table(TableGrammar),
    Block(BlockGrammar),
    KeyValue(KeyValueGrammar),
}

#[derive(Debug, Clone)]
pub(crate) struct TableGrammar {
    pub columns: Vec<String>,
    pub header: Option<Regex>,
    pub end: Option<Regex>,
    pub skip: Vec<Regex>,
    pub delimiter: Option<String>,
    pub rest: bool,
    pub continuation: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct BlockGrammar {
    pub start: Regex,
    pub lines: Vec<Regex>,
    pub labels: BTreeMap<String, String>,
    pub skip: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub(crate) struct KeyValueGrammar {
    pub separator: String,
    pub labels: BTreeMap<String, String>,
}

impl Grammar {
    /// Non-blank lines the layout treats as data
    ///
    /// Tables drop everything up to the first header, repeated headers,
    /// skipped lines and everything from the end marker on. Blocks drop
    /// skipped lines. Key/value output keeps only lines with a declared label.
    pub(crate) fn content_lines<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let lines = text.lines().filter(|l| !l.trim().is_empty());
        match self {
            Grammar::Table(g) => {
                let is_header = |line: &str| g.header.as_ref().is_some_and(|h| h.is_match(line));
                let all: Vec<&str> = lines.collect();
                let body = match all.iter().position(|l| is_header(l)) {
                    Some(idx) => &all[idx + 1..],
                    None => &all[..],
                };
                body.iter()
                    .copied()
                    .take_while(|l| !g.end.as_ref().is_some_and(|e| e.is_match(l)))
                    .filter(|l| !is_header(l) && !g.skip.iter().any(|s| s.is_match(l)))
                    .collect()
            }
            Grammar::Block(g) => lines
                .filter(|l| !g.skip.iter().any(|s| s.is_match(l)))
                .collect(),
            Grammar::KeyValue(g) => lines
                .filter(|l| {
                    l.split_once(g.separator.as_str())
                        .is_some_and(|(label, _)| g.labels.contains_key(label.trim()))
                })
                .collect(),
        }
    }
}

/// Compile one pattern, attributing failures to `command`
pub(crate) fn compile_pattern(command: &str, pattern: &str) -> Result<Regex, CheckError> {
    Regex::new(pattern).map_err(|e| CheckError::SchemaInvalid {
        command: command.to_string(),
        reason: format!("invalid pattern `{}`: {}", pattern, e),
    })
}

pub(crate) fn compile_patterns(command: &str, patterns: &[String]) -> Result<Vec<Regex>, CheckError> {
    patterns.iter().map(|p| compile_pattern(command, p)).collect()
}

fn compile_optional(command: &str, pattern: Option<&String>) -> Result<Option<Regex>, CheckError> {
    pattern.map(|p| compile_pattern(command, p)).transpose()
}

pub(crate) fn compile_layout(command: &str, layout: &Layout) -> Result<Grammar, CheckError> {
    Ok(match layout {
        Layout::Table(TableLayout {
            columns,
            header,
            end,
            skip,
            delimiter,
            rest,
            continuation,
        }) => Grammar::Table(TableGrammar {
            columns: columns.clone(),
            header: compile_optional(command, header.as_ref())?,
            end: compile_optional(command, end.as_ref())?,
            skip: compile_patterns(command, skip)?,
            delimiter: delimiter.clone(),
            rest: *rest,
            continuation: continuation.clone(),
        }),
        Layout::Block(BlockLayout {
            start,
            lines,
            labels,
            skip,
        }) => Grammar::Block(BlockGrammar {
            start: compile_pattern(command, start)?,
            lines: compile_patterns(command, lines)?,
            labels: labels.clone(),
            skip: compile_patterns(command, skip)?,
        }),
        Layout::KeyValue(KeyValueLayout { separator, labels }) => {
            Grammar::KeyValue(KeyValueGrammar {
                separator: separator.clone(),
                labels: labels.clone(),
            })
        }
    })
}
