//! Excel workbook rendering.

use anomaly_watch_core::{Cell, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use crate::error::Result;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Renders `table` into a single-sheet workbook held in memory.
///
/// Headers are written verbatim in column order. Offset-carrying timestamps
/// are converted to naive wall-clock time first, as Excel has no time zones.
///
/// # Errors
/// Returns an error if the sheet name is invalid or the workbook cannot be
/// assembled.
pub fn render_workbook(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let table = table.to_naive();
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format(DATE_FORMAT);
    let datetime = Format::new().set_num_format(DATETIME_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col), name, &header)?;
    }

    for (i, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(i + 1).unwrap_or(u32::MAX);
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, col_num(col), cell, &date, &datetime)?;
        }
    }

    worksheet.autofit();
    let bytes = workbook.save_to_buffer()?;
    debug!(rows = table.len(), bytes = bytes.len(), "rendered workbook");
    Ok(bytes)
}

fn col_num(col: usize) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date: &Format,
    datetime: &Format,
) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
        #[allow(clippy::cast_precision_loss)]
        Cell::Integer(n) => {
            worksheet.write_number(row, col, *n as f64)?;
        }
        Cell::Number(x) if x.is_finite() => {
            worksheet.write_number(row, col, *x)?;
        }
        Cell::Number(_) => {}
        Cell::Date(d) => {
            worksheet.write_datetime_with_format(row, col, d, date)?;
        }
        Cell::DateTime(dt) => {
            worksheet.write_datetime_with_format(row, col, dt, datetime)?;
        }
        Cell::DateTimeTz(ts) => {
            worksheet.write_datetime_with_format(row, col, &ts.naive_local(), datetime)?;
        }
    }
    Ok(())
}
