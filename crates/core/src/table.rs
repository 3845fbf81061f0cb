//! Generic rows-by-named-columns result sets handed to the exporters.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Offset-carrying timestamp; exporters normalize it to wall-clock time.
    DateTimeTz(DateTime<FixedOffset>),
}

impl Cell {
    /// Drops any UTC offset while keeping the local wall-clock reading.
    #[must_use]
    pub fn to_naive(&self) -> Self {
        match self {
            Self::DateTimeTz(ts) => Self::DateTime(ts.naive_local()),
            other => other.clone(),
        }
    }

    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::DateTime(_) | Self::DateTimeTz(_))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(x) => write!(f, "{x}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::DateTimeTz(ts) => write!(f, "{}", ts.naive_local().format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Rows of cells under an ordered list of column headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding with [`Cell::Empty`] or truncating to the
    /// column count so every row stays rectangular.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of this table with every offset-carrying timestamp converted to
    /// naive wall-clock time.
    #[must_use]
    pub fn to_naive(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(Cell::to_naive).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_push_row_keeps_table_rectangular() {
        let mut table = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        table.push_row(vec![Cell::from("x")]);
        table.push_row(vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()]);

        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|r| r.len() == 3));
        assert_eq!(table.rows()[0][2], Cell::Empty);
    }

    #[test]
    fn test_to_naive_keeps_wall_clock() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        let mut table = Table::new(vec!["ts".into()]);
        table.push_row(vec![Cell::DateTimeTz(ts)]);

        let naive = table.to_naive();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(naive.rows()[0][0], Cell::DateTime(expected));
    }

    #[test]
    fn test_display_of_optional_values() {
        assert_eq!(Cell::from(None::<f64>).to_string(), "");
        assert_eq!(Cell::from(Some(1.5)).to_string(), "1.5");
        assert_eq!(
            Cell::from(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()).to_string(),
            "2024-01-05"
        );
    }
}
