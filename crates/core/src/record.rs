//! Per-ticker daily price records and the alert columns attached to them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Indicator category an upstream alert column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// Abnormal price swing
    PriceVolatility,
    /// Unusual foreign investor net flow
    ForeignFlow,
    /// Liquidity (volume) spike or drought
    Liquidity,
    /// Close outside the Bollinger envelope
    Bollinger,
    /// RSI overbought / oversold
    Rsi,
    /// MACD crossover
    Macd,
    /// Average true range expansion
    Atr,
}

impl AlertCategory {
    /// All categories in storage (column) order.
    pub const ALL: [Self; 7] = [
        Self::PriceVolatility,
        Self::ForeignFlow,
        Self::Liquidity,
        Self::Bollinger,
        Self::Rsi,
        Self::Macd,
        Self::Atr,
    ];

    /// Order used when presenting the latest alert.
    pub const SUMMARY_ORDER: [Self; 7] = [
        Self::PriceVolatility,
        Self::Liquidity,
        Self::ForeignFlow,
        Self::Bollinger,
        Self::Rsi,
        Self::Macd,
        Self::Atr,
    ];

    /// Position of this category inside [`PriceRecord::alerts`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::PriceVolatility => 0,
            Self::ForeignFlow => 1,
            Self::Liquidity => 2,
            Self::Bollinger => 3,
            Self::Rsi => 4,
            Self::Macd => 5,
            Self::Atr => 6,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceVolatility => "Price volatility",
            Self::ForeignFlow => "Foreign flow",
            Self::Liquidity => "Liquidity",
            Self::Bollinger => "Bollinger",
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::Atr => "ATR",
        }
    }
}

/// One row per (ticker, date) as delivered by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub ticker: String,
    pub close: f64,
    pub volume: u64,
    /// Alert text per category, indexed by [`AlertCategory::index`]
    pub alerts: [Option<String>; 7],
    pub anomaly_label: String,
    pub anomaly_score: Option<f64>,
    /// Upstream RSI, when the source already carries one
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
}

impl PriceRecord {
    /// Creates a record with no alert or indicator columns populated.
    #[must_use]
    pub fn new(date: NaiveDate, ticker: impl Into<String>, close: f64, volume: u64) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            close,
            volume,
            alerts: Default::default(),
            anomaly_label: String::new(),
            anomaly_score: None,
            rsi: None,
            macd: None,
            signal_line: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.anomaly_label = label.into();
        self
    }

    #[must_use]
    pub fn with_alert(mut self, category: AlertCategory, text: impl Into<String>) -> Self {
        self.alerts[category.index()] = Some(text.into());
        self
    }

    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.anomaly_score = Some(score);
        self
    }

    #[must_use]
    pub fn alert(&self, category: AlertCategory) -> Option<&str> {
        self.alerts[category.index()].as_deref()
    }

    /// Anomaly score, 0 when the source left it blank.
    #[must_use]
    pub fn score_or_zero(&self) -> f64 {
        self.anomaly_score.unwrap_or(0.0)
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_category_indices_match_storage_order() {
        for (i, category) in AlertCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_summary_order_covers_every_category() {
        let mut sorted = AlertCategory::SUMMARY_ORDER;
        sorted.sort();
        let mut all = AlertCategory::ALL;
        all.sort();
        assert_eq!(sorted, all);
    }

    #[test]
    fn test_record_builder_sets_alerts() {
        let record = PriceRecord::new(d(2024, 1, 5), "ABC", 10.0, 100)
            .with_alert(AlertCategory::Rsi, "RSI > 70")
            .with_label("Bất thường");

        assert_eq!(record.alert(AlertCategory::Rsi), Some("RSI > 70"));
        assert_eq!(record.alert(AlertCategory::Macd), None);
        assert!((record.score_or_zero() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 10)).unwrap();
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 1, 10)));
        assert!(!range.contains(d(2024, 1, 11)));
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let err = DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRange { .. }));
    }
}
