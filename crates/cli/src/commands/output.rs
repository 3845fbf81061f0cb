//! Plain-text and JSON rendering for command output.

use anomaly_watch_core::Table;
use anyhow::Result;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Two decimals, or `-` for an undefined value.
#[must_use]
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Left-aligned text grid with columns sized to their widest cell.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(table.columns());
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_watch_core::Cell;

    #[test]
    fn test_render_table_pads_columns() {
        let mut table = Table::new(vec!["Mã".into(), "Giá".into()]);
        table.push_row(vec![Cell::from("ABC"), Cell::Number(10.5)]);
        table.push_row(vec![Cell::from("X"), Cell::Empty]);

        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Mã   Giá");
        assert_eq!(lines[1], "---------");
        assert_eq!(lines[2], "ABC  10.5");
        assert_eq!(lines[3], "X");
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456)), "1.23");
        assert_eq!(fmt_opt(None), "-");
    }
}
