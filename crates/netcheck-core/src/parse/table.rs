//! Table family: one record per row, cells by column position

use super::grammar::{Grammar, TableGrammar};
use super::row::{RawRow, Unconfident};

pub(crate) fn parse_table(grammar: &Grammar, text: &str) -> Result<Vec<RawRow>, Unconfident> {
    let Grammar::Table(g) = grammar else {
        return Err(Unconfident::new("table parser given a non-table layout"));
    };

    let mut in_table = g.header.is_none();
    let mut rows: Vec<RawRow> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        // Repeated headers (page breaks) are harmless.
        if g.header.as_ref().is_some_and(|h| h.is_match(line)) {
            in_table = true;
            continue;
        }
        if !in_table {
            continue;
        }
        if g.end.as_ref().is_some_and(|e| e.is_match(line)) {
            break;
        }
        if g.skip.iter().any(|s| s.is_match(line)) {
            continue;
        }

        if let Some(field) = &g.continuation {
            if line.starts_with(char::is_whitespace) {
                let Some(row) = rows.last_mut() else {
                    return Err(Unconfident::new(format!(
                        "line {}: continuation line before any row",
                        line_no
                    )));
                };
                row.push(field, line);
                row.add_line(line);
                continue;
            }
        }

        let cells = fit_columns(g, split_cells(line, g.delimiter.as_deref()), line_no)?;
        let mut row = RawRow::default();
        row.add_line(line);
        for (column, cell) in g.columns.iter().zip(&cells) {
            row.push(column, cell);
        }
        rows.push(row);
    }

    if !in_table {
        return Err(Unconfident::new("table header not found"));
    }
    Ok(rows)
}

fn split_cells(line: &str, delimiter: Option<&str>) -> Vec<String> {
    match delimiter {
        Some(d) => line
            .trim()
            .trim_end_matches(d)
            .split(d)
            .map(|c| c.trim().to_string())
            .collect(),
        None => line.split_whitespace().map(str::to_string).collect(),
    }
}

/// Apply `rest` absorption and reject surplus cells
fn fit_columns(g: &TableGrammar, mut cells: Vec<String>, line_no: usize) -> Result<Vec<String>, Unconfident> {
    let width = g.columns.len();
    if cells.len() <= width {
        return Ok(cells);
    }
    if !g.rest {
        return Err(Unconfident::new(format!(
            "line {}: expected at most {} columns, found {}",
            line_no,
            width,
            cells.len()
        )));
    }
    let joiner = g.delimiter.as_deref().unwrap_or(" ");
    let tail = cells.split_off(width - 1).join(joiner);
    cells.push(tail);
    Ok(cells)
}
