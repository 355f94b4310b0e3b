//! Two-column table codec.
//!
//! Renders emittable fields as a markdown table and parses table blocks
//! back into fields. Row parsing splits on unescaped pipes only, so a
//! `\|` written by the cell codec stays inside its cell. Malformed rows
//! are dropped; they never abort the table.

use crate::codec::cell;
use crate::model::Field;

pub const HEADER_ROW: &str = "| Field | Detail |";
pub const SEPARATOR_ROW: &str = "|-------|--------|";

/// Render fields as a table block (header, separator, one row per
/// emittable field). No trailing newline.
pub fn encode(fields: &[Field]) -> String {
    let mut lines = vec![HEADER_ROW.to_string(), SEPARATOR_ROW.to_string()];
    for field in fields {
        if !field.is_emittable() {
            continue;
        }
        lines.push(format!(
            "| {} | {} |",
            field.name.trim(),
            cell::encode(&field.detail)
        ));
    }
    lines.join("\n")
}

/// Decode the rows of one table block into fields.
///
/// The first two lines (header and separator) are skipped. A row keeps a
/// field only when, after splitting and discarding the empty edge cells,
/// a name cell and a detail cell both remain.
pub fn decode(block: &[&str]) -> Vec<Field> {
    let mut fields = Vec::new();
    for line in block.iter().skip(2) {
        let trimmed = line.trim();
        if !trimmed.starts_with('|') {
            continue;
        }
        let cells: Vec<String> = split_row(trimmed)
            .into_iter()
            .filter(|cell_text| !cell_text.is_empty())
            .collect();
        if cells.len() < 2 {
            continue;
        }
        fields.push(Field {
            name: cells[0].clone(),
            detail: cell::decode(&cells[1]),
        });
    }
    fields
}

/// True for the divider line between header and rows (dashes, colons,
/// pipes, and spaces only).
pub fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|' | ' '))
}

/// Locate the table block inside a run of section lines: a line containing
/// a pipe, a separator line, then one or more further pipe lines. Returns
/// the half-open line range of the block.
pub fn find_table_block(lines: &[&str]) -> Option<(usize, usize)> {
    for start in 0..lines.len().saturating_sub(2) {
        if !lines[start].contains('|') || !is_separator_line(lines[start + 1]) {
            continue;
        }
        let mut end = start + 2;
        while end < lines.len() && lines[end].contains('|') {
            end += 1;
        }
        if end > start + 2 {
            return Some((start, end));
        }
    }
    None
}

/// Split a row on unescaped pipes; `\|` never opens a column. Cells come
/// back trimmed.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'|') {
            chars.next();
            current.push_str("\\|");
        } else if c == '|' {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    cells.push(current.trim().to_string());
    cells
}
