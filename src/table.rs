//! Plain-text table rendering for CLI output.

use std::fmt::Write as _;

const COLUMN_GAP: &str = "  ";

/// Renders `rows` under `headers` with left-aligned, space-padded columns.
/// Cells beyond the header count are dropped; control characters become
/// spaces so one record always occupies one line.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| cell_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_width(cell));
        }
    }

    let mut output = String::new();
    push_line(&mut output, headers.iter().map(String::as_str), &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    push_line(&mut output, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_line(&mut output, row.iter().map(String::as_str), &widths);
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn push_line<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (idx, (cell, &width)) in cells.zip(widths).enumerate() {
        if idx > 0 {
            line.push_str(COLUMN_GAP);
        }
        let clean = sanitize(cell);
        let _ = write!(line, "{clean:<width$}");
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

fn cell_width(value: &str) -> usize {
    value.chars().count()
}
