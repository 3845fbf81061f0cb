//! Read-only table of loaded records with the per-ticker lookups the pipeline needs.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::record::{DateRange, PriceRecord};

/// Fully materialized record table.
///
/// Every accessor returns fresh values; nothing here mutates the loaded rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<PriceRecord>,
}

impl RecordTable {
    #[must_use]
    pub const fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct tickers, sorted.
    #[must_use]
    pub fn tickers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.ticker.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn contains_ticker(&self, ticker: &str) -> bool {
        self.records.iter().any(|r| r.ticker == ticker)
    }

    /// Earliest and latest record date, the default display range.
    #[must_use]
    pub fn date_bounds(&self) -> Option<DateRange> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        DateRange::new(min, max).ok()
    }

    /// One ticker's rows, ordered by date. Equal dates keep input order.
    #[must_use]
    pub fn series_for(&self, ticker: &str) -> Vec<PriceRecord> {
        let mut series: Vec<PriceRecord> = self
            .records
            .iter()
            .filter(|r| r.ticker == ticker)
            .cloned()
            .collect();
        series.sort_by_key(|r| r.date);
        series
    }

    /// Rows whose date falls inside `range`, input order preserved.
    #[must_use]
    pub fn in_range(&self, range: &DateRange) -> Vec<PriceRecord> {
        self.records
            .iter()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect()
    }

    /// Latest record date, if any.
    #[must_use]
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }
}

impl From<Vec<PriceRecord>> for RecordTable {
    fn from(records: Vec<PriceRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn table() -> RecordTable {
        RecordTable::new(vec![
            PriceRecord::new(d(3), "XYZ", 20.0, 10),
            PriceRecord::new(d(2), "ABC", 11.0, 10),
            PriceRecord::new(d(1), "ABC", 10.0, 10),
            PriceRecord::new(d(4), "ABC", 12.0, 10),
        ])
    }

    #[test]
    fn test_series_for_sorts_by_date() {
        let series = table().series_for("ABC");
        let dates: Vec<_> = series.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(1), d(2), d(4)]);
    }

    #[test]
    fn test_tickers_sorted_unique() {
        assert_eq!(table().tickers(), vec!["ABC".to_string(), "XYZ".to_string()]);
    }

    #[test]
    fn test_date_bounds() {
        let bounds = table().date_bounds().unwrap();
        assert_eq!(bounds.start(), d(1));
        assert_eq!(bounds.end(), d(4));
        assert!(RecordTable::default().date_bounds().is_none());
    }

    #[test]
    fn test_in_range_keeps_input_order() {
        let range = DateRange::new(d(2), d(3)).unwrap();
        let rows = table().in_range(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker, "XYZ");
        assert_eq!(rows[1].ticker, "ABC");
    }
}
