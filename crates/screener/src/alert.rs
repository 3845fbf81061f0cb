//! Latest-alert lookup for a single ticker.

use anomaly_watch_core::{AlertCategory, CoreError, PriceRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::AnomalyPredicate;

/// Shown in place of an alert column the source left blank.
pub const NOT_AVAILABLE: &str = "Không có";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLine {
    pub category: AlertCategory,
    pub value: String,
}

/// The most recent flagged record of a ticker, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub ticker: String,
    pub date: NaiveDate,
    /// One line per category, in display order
    pub alerts: Vec<AlertLine>,
    pub anomaly_score: f64,
}

impl AlertSummary {
    #[must_use]
    pub fn from_record(record: &PriceRecord) -> Self {
        let alerts = AlertCategory::SUMMARY_ORDER
            .iter()
            .map(|&category| AlertLine {
                category,
                value: record
                    .alert(category)
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string(),
            })
            .collect();

        Self {
            ticker: record.ticker.clone(),
            date: record.date,
            alerts,
            anomaly_score: record.score_or_zero(),
        }
    }

    /// Anomaly score with three decimals.
    #[must_use]
    pub fn score_display(&self) -> String {
        format!("{:.3}", self.anomaly_score)
    }

    #[must_use]
    pub fn alert(&self, category: AlertCategory) -> Option<&str> {
        self.alerts
            .iter()
            .find(|line| line.category == category)
            .map(|line| line.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertOutcome {
    Found(AlertSummary),
    /// The ticker exists but has no flagged record on or before the cutoff.
    NoRecentAlert,
}

impl AlertOutcome {
    #[must_use]
    pub const fn summary(&self) -> Option<&AlertSummary> {
        match self {
            Self::Found(summary) => Some(summary),
            Self::NoRecentAlert => None,
        }
    }
}

/// Finds the latest flagged record of `ticker` dated on or before `cutoff`.
///
/// `records` is the unfiltered table. When several flagged records share the
/// latest date, the last one in input order wins.
///
/// # Errors
/// Returns [`CoreError::TickerNotFound`] if `records` has no row for `ticker`.
pub fn resolve_latest_alert(
    records: &[PriceRecord],
    ticker: &str,
    cutoff: NaiveDate,
    predicate: &AnomalyPredicate,
) -> Result<AlertOutcome, CoreError> {
    let mut found_ticker = false;
    let mut latest: Option<&PriceRecord> = None;

    for record in records.iter().filter(|r| r.ticker == ticker) {
        found_ticker = true;
        if record.date > cutoff || !predicate.matches(record) {
            continue;
        }
        if latest.map_or(true, |best| record.date >= best.date) {
            latest = Some(record);
        }
    }

    if !found_ticker {
        return Err(CoreError::TickerNotFound(ticker.to_string()));
    }

    debug!(ticker, %cutoff, found = latest.is_some(), "resolved latest alert");
    Ok(latest.map_or(AlertOutcome::NoRecentAlert, |record| {
        AlertOutcome::Found(AlertSummary::from_record(record))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn records() -> Vec<PriceRecord> {
        vec![
            PriceRecord::new(d(1), "ABC", 10.0, 100).with_label("Bất thường"),
            PriceRecord::new(d(8), "ABC", 10.5, 100)
                .with_label("bất thường")
                .with_alert(AlertCategory::Rsi, "RSI > 70")
                .with_score(0.87654),
            PriceRecord::new(d(9), "ABC", 10.7, 100).with_label("Bình thường"),
            PriceRecord::new(d(12), "ABC", 11.0, 100).with_label("Bất thường"),
            PriceRecord::new(d(10), "XYZ", 50.0, 100).with_label("Bất thường"),
        ]
    }

    #[test]
    fn test_latest_flagged_on_or_before_cutoff() {
        let outcome =
            resolve_latest_alert(&records(), "ABC", d(10), &AnomalyPredicate::default()).unwrap();
        let summary = outcome.summary().unwrap();

        assert_eq!(summary.date, d(8));
        assert_eq!(summary.alert(AlertCategory::Rsi), Some("RSI > 70"));
        assert_eq!(summary.alert(AlertCategory::Atr), Some(NOT_AVAILABLE));
        assert_eq!(summary.score_display(), "0.877");
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let outcome =
            resolve_latest_alert(&records(), "ABC", d(12), &AnomalyPredicate::default()).unwrap();
        assert_eq!(outcome.summary().unwrap().date, d(12));
    }

    #[test]
    fn test_cutoff_before_any_flag_is_not_an_error() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let outcome =
            resolve_latest_alert(&records(), "ABC", date, &AnomalyPredicate::default()).unwrap();
        assert_eq!(outcome, AlertOutcome::NoRecentAlert);
    }

    #[test]
    fn test_unknown_ticker_is_an_error() {
        let err = resolve_latest_alert(&records(), "QQQ", d(28), &AnomalyPredicate::default())
            .unwrap_err();
        assert_eq!(err, CoreError::TickerNotFound("QQQ".to_string()));
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let outcome =
            resolve_latest_alert(&records(), "XYZ", d(28), &AnomalyPredicate::default()).unwrap();
        assert_eq!(outcome.summary().unwrap().score_display(), "0.000");
    }

    #[test]
    fn test_same_day_tie_takes_last_in_input_order() {
        let rows = vec![
            PriceRecord::new(d(3), "ABC", 10.0, 1)
                .with_label("abnormal")
                .with_alert(AlertCategory::Macd, "first"),
            PriceRecord::new(d(3), "ABC", 10.0, 1)
                .with_label("abnormal")
                .with_alert(AlertCategory::Macd, "second"),
        ];
        let outcome =
            resolve_latest_alert(&rows, "ABC", d(3), &AnomalyPredicate::default()).unwrap();
        assert_eq!(
            outcome.summary().unwrap().alert(AlertCategory::Macd),
            Some("second")
        );
    }

    #[test]
    fn test_summary_lines_follow_display_order() {
        let summary = AlertSummary::from_record(&records()[1]);
        let order: Vec<_> = summary.alerts.iter().map(|l| l.category).collect();
        assert_eq!(order, AlertCategory::SUMMARY_ORDER.to_vec());
    }
}
