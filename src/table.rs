//! Fixed-width table rendering for `inspect` output.

use std::borrow::Cow;
use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let Some(width) = widths.get(idx).copied() else {
            break;
        };
        let sanitized = sanitize_cell(value);
        let padding = width.saturating_sub(sanitized.chars().count());
        let mut cell = sanitized.into_owned();
        cell.push_str(&" ".repeat(padding));
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            value
                .chars()
                .map(|ch| match ch {
                    '\n' | '\r' | '\t' => ' ',
                    other => other,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}
