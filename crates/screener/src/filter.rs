//! Selection of rows carrying the anomaly label.

use anomaly_watch_core::{DateRange, PriceRecord};
use std::collections::HashSet;
use tracing::debug;

/// Decides whether an anomaly label marks a row as flagged.
///
/// Labels are compared after trimming and Unicode lowercasing, so
/// `" Bất Thường "` matches the sentinel `"bất thường"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyPredicate {
    sentinels: Vec<String>,
}

impl AnomalyPredicate {
    #[must_use]
    pub fn new<I, S>(sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sentinels: sentinels
                .into_iter()
                .map(|s| normalize(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_flagged(&self, label: &str) -> bool {
        let label = normalize(label);
        !label.is_empty() && self.sentinels.iter().any(|s| *s == label)
    }

    #[must_use]
    pub fn matches(&self, record: &PriceRecord) -> bool {
        self.is_flagged(&record.anomaly_label)
    }
}

impl Default for AnomalyPredicate {
    fn default() -> Self {
        Self::new(["bất thường", "abnormal"])
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Flagged rows inside `range` (or anywhere when `range` is `None`), in input order.
///
/// An empty result means "no anomalies" and is not an error.
#[must_use]
pub fn filter_anomalies(
    records: &[PriceRecord],
    range: Option<&DateRange>,
    predicate: &AnomalyPredicate,
) -> Vec<PriceRecord> {
    let selected: Vec<PriceRecord> = records
        .iter()
        .filter(|r| range.map_or(true, |range| range.contains(r.date)))
        .filter(|r| predicate.matches(r))
        .cloned()
        .collect();

    debug!(
        input = records.len(),
        flagged = selected.len(),
        "filtered anomalies"
    );
    selected
}

/// Distinct tickers among `anomalies`, in order of first appearance.
#[must_use]
pub fn flagged_tickers(anomalies: &[PriceRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    anomalies
        .iter()
        .filter(|r| seen.insert(r.ticker.as_str()))
        .map(|r| r.ticker.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn row(day: u32, ticker: &str, label: &str) -> PriceRecord {
        PriceRecord::new(d(day), ticker, 10.0, 100).with_label(label)
    }

    fn range(start: u32, end: u32) -> DateRange {
        DateRange::new(d(start), d(end)).unwrap()
    }

    #[test]
    fn test_label_match_ignores_case_and_whitespace() {
        let predicate = AnomalyPredicate::default();
        assert!(predicate.is_flagged(" Bất Thường "));
        assert!(predicate.is_flagged("ABNORMAL"));
        assert!(!predicate.is_flagged("Bình thường"));
        assert!(!predicate.is_flagged(""));
    }

    #[test]
    fn test_filter_respects_inclusive_range() {
        let records = vec![
            row(1, "ABC", "bất thường"),
            row(5, "ABC", " Bất Thường "),
            row(10, "XYZ", "abnormal"),
            row(11, "XYZ", "abnormal"),
            row(6, "XYZ", "normal"),
        ];

        let out = filter_anomalies(&records, Some(&range(1, 10)), &AnomalyPredicate::default());
        let days: Vec<_> = out.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![d(1), d(5), d(10)]);
    }

    #[test]
    fn test_scenario_vietnamese_label_in_range() {
        let records = vec![row(5, "ABC", " Bất Thường ")];
        let out = filter_anomalies(&records, Some(&range(1, 10)), &AnomalyPredicate::default());
        assert_eq!(out, records);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = vec![
            row(2, "ABC", "abnormal"),
            row(3, "ABC", "normal"),
            row(4, "XYZ", "Bất thường"),
        ];
        let predicate = AnomalyPredicate::default();
        let r = range(1, 31);

        let once = filter_anomalies(&records, Some(&r), &predicate);
        let twice = filter_anomalies(&once, Some(&r), &predicate);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_inputs_give_empty_output() {
        let predicate = AnomalyPredicate::default();
        assert!(filter_anomalies(&[], Some(&range(1, 2)), &predicate).is_empty());
        let records = vec![row(20, "ABC", "abnormal")];
        assert!(filter_anomalies(&records, Some(&range(1, 2)), &predicate).is_empty());
    }

    #[test]
    fn test_unrestricted_filter() {
        let records = vec![row(1, "ABC", "abnormal"), row(28, "ABC", "abnormal")];
        assert_eq!(
            filter_anomalies(&records, None, &AnomalyPredicate::default()).len(),
            2
        );
    }

    #[test]
    fn test_flagged_tickers_first_appearance_order() {
        let records = vec![
            row(1, "XYZ", "abnormal"),
            row(2, "ABC", "abnormal"),
            row(3, "XYZ", "abnormal"),
        ];
        assert_eq!(flagged_tickers(&records), vec!["XYZ", "ABC"]);
    }

    #[test]
    fn test_custom_sentinels() {
        let predicate = AnomalyPredicate::new(["Flagged", "  "]);
        assert!(predicate.is_flagged("flagged"));
        assert!(!predicate.is_flagged("abnormal"));
        assert!(!predicate.is_flagged("   "));
    }
}
