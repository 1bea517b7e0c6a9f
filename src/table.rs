//! Rendering of an aligned content table.
//!
//! Three renderings exist: a fixed-width text block, CSV cells (and the CSV
//! document joined from them) and a bare HTML table.

use crate::patterns::LINE_BREAK;

/// Escape one CSV cell.
///
/// A single leading `-` and then a single leading `=` are stripped so the
/// cell can't start a spreadsheet formula. Quotes are doubled, and the cell is
/// quoted when it holds a comma or a quote. Line breaks become spaces.
#[must_use]
pub fn csv_cell(value: &str) -> String {
    let value = value.strip_prefix('-').unwrap_or(value);
    let value = value.strip_prefix('=').unwrap_or(value);
    let mut cell = value.replace('"', "\"\"");
    if cell.contains(',') || cell.contains('"') {
        cell = format!("\"{cell}\"");
    }
    LINE_BREAK.replace_all(&cell, " ").into_owned()
}

/// CSV cells of a content table. The record number column is left out.
///
/// Rows carry no trailing empty column, so lines do not end in `,`.
#[must_use]
pub fn csv_table(content: &[Vec<String>]) -> Vec<Vec<String>> {
    content
        .iter()
        .map(|row| row.iter().skip(1).map(|cell| csv_cell(cell)).collect())
        .collect()
}

/// Join CSV cells into a document: cells separated by `,`, every row
/// terminated by `\n`, no header.
#[must_use]
pub fn render_csv(cells: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in cells {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Fixed-width text rendering.
///
/// Every column is as wide as its longest cell (in characters). Each cell is
/// padded to that width and followed by `|`. Every row, the last included, is
/// followed by a line of `-` as long as the widths plus one per column.
#[must_use]
pub fn render_text(content: &[Vec<String>]) -> String {
    let Some(first) = content.first() else {
        return String::new();
    };
    let columns = first.len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            content
                .iter()
                .map(|row| row.get(c).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let rule = "-".repeat(widths.iter().sum::<usize>() + columns);

    let mut out = String::new();
    for row in content {
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str(cell);
            for _ in cell.chars().count()..*width {
                out.push(' ');
            }
            out.push('|');
        }
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

/// Bare `<table>` of the content table with HTML-escaped cells.
#[must_use]
pub fn render_html(content: &[Vec<String>]) -> String {
    let mut out = String::from("<table style=\"width:100%;\">");
    for row in content {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&escape_html(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
    out
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
