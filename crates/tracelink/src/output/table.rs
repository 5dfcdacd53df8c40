//! Column-aligned text tables.

use std::io::{self, Write};

use super::OutputConfig;
use super::color::bold;

/// Write an indented table with a bold header row.
///
/// Cells are padded to the widest entry in their column before `style` is
/// applied, so escape codes do not disturb alignment. The last column is
/// not padded. `style` receives `(row, column, padded_text)`.
pub(crate) fn write_table<W, F>(
    w: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
    style: F,
    config: &OutputConfig,
) -> io::Result<()>
where
    W: Write,
    F: Fn(usize, usize, &str) -> String,
{
    let widths = column_widths(headers, rows);
    let last = headers.len().saturating_sub(1);

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(col, header)| pad(header, col, last, &widths))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(w, "  {}", bold(&header_line, config))?;

    for (row_idx, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(col, cell)| style(row_idx, col, &pad(cell, col, last, &widths)))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn pad(text: &str, col: usize, last: usize, widths: &[usize]) -> String {
    if col == last {
        return text.to_string();
    }
    let width = widths.get(col).copied().unwrap_or(0);
    format!("{text:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let config = OutputConfig::new(80, true, false);
        let rows = vec![
            vec!["REQ-1".to_string(), "a".to_string()],
            vec!["REQ-LONG-1".to_string(), "b".to_string()],
        ];
        let mut buffer = Vec::new();

        write_table(&mut buffer, &["ID", "X"], &rows, |_, _, s| s.to_string(), &config).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "  ID          X");
        assert_eq!(lines[1], "  REQ-1       a");
        assert_eq!(lines[2], "  REQ-LONG-1  b");
    }

    #[test]
    fn multibyte_labels_pad_by_chars() {
        let widths = column_widths(&["Pair"], &[vec!["3→4".to_string()]]);
        assert_eq!(widths, vec![4]);
        assert_eq!(pad("3→4", 0, 1, &widths), "3→4 ");
    }
}
