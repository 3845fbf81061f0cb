//! Per-ticker indicator series assembled from price records.
//!
//! Series are derived values: recomputed from the records on every call and
//! never written back into them.

use anomaly_watch_core::{CoreError, IndicatorConfig, PriceRecord, RecordTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bollinger::{bollinger_bands, BandSide, BollingerConfig, BollingerPoint};
use crate::rsi::{wilder_rsi, RsiZone};

/// Where the RSI values of a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSource {
    /// Passed through from the record store
    Supplied,
    /// Computed here with Wilder smoothing
    Computed,
}

/// Indicator values for one record. `None` means undefined, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
    pub middle_band: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
}

impl IndicatorPoint {
    #[must_use]
    pub fn macd_histogram(&self) -> Option<f64> {
        Some(self.macd? - self.signal_line?)
    }
}

/// A close that escaped the Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandBreach {
    pub date: NaiveDate,
    pub close: f64,
    pub side: BandSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub points: Vec<IndicatorPoint>,
    pub rsi_source: RsiSource,
    pub config: IndicatorConfig,
}

impl IndicatorSeries {
    #[must_use]
    pub fn latest(&self) -> Option<&IndicatorPoint> {
        self.points.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when no record carried a MACD value; charts should then treat
    /// both MACD and signal line as entirely undefined.
    #[must_use]
    pub fn macd_missing(&self) -> bool {
        self.points.iter().all(|p| p.macd.is_none())
    }

    #[must_use]
    pub fn band_breaches(&self) -> Vec<BandBreach> {
        self.points
            .iter()
            .filter_map(|p| {
                let bands = BollingerPoint {
                    middle: p.middle_band,
                    upper: p.upper_band,
                    lower: p.lower_band,
                };
                bands.breach(p.close).map(|side| BandBreach {
                    date: p.date,
                    close: p.close,
                    side,
                })
            })
            .collect()
    }

    /// RSI zone for every point with a defined RSI.
    #[must_use]
    pub fn rsi_zones(&self) -> Vec<(NaiveDate, RsiZone)> {
        self.points
            .iter()
            .filter_map(|p| {
                p.rsi.map(|rsi| {
                    (
                        p.date,
                        RsiZone::classify(rsi, self.config.overbought, self.config.oversold),
                    )
                })
            })
            .collect()
    }
}

/// Computes indicators for one ticker's records.
///
/// Records are ordered by date (stable) before any rolling computation. RSI is
/// taken from the records when any of them carries a value, otherwise computed
/// with `config.rsi_period`. MACD and signal line are passed through.
///
/// # Errors
/// Returns an error if `config` fails validation.
pub fn compute_indicators(
    records: &[PriceRecord],
    config: &IndicatorConfig,
) -> Result<IndicatorSeries, CoreError> {
    config.validate()?;

    let mut ordered: Vec<&PriceRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date);

    let closes: Vec<f64> = ordered.iter().map(|r| r.close).collect();
    let bands = bollinger_bands(&closes, &BollingerConfig::from(config));

    let (rsi, rsi_source): (Vec<Option<f64>>, RsiSource) =
        if ordered.iter().any(|r| r.rsi.is_some()) {
            (ordered.iter().map(|r| r.rsi).collect(), RsiSource::Supplied)
        } else {
            (wilder_rsi(&closes, config.rsi_period), RsiSource::Computed)
        };

    let points = ordered
        .iter()
        .zip(bands)
        .zip(rsi)
        .map(|((record, band), rsi)| IndicatorPoint {
            date: record.date,
            close: record.close,
            volume: record.volume,
            middle_band: band.middle,
            upper_band: band.upper,
            lower_band: band.lower,
            rsi,
            macd: record.macd,
            signal_line: record.signal_line,
        })
        .collect::<Vec<_>>();

    debug!(
        points = points.len(),
        window = config.window,
        rsi_source = ?rsi_source,
        "computed indicator series"
    );

    Ok(IndicatorSeries {
        points,
        rsi_source,
        config: config.clone(),
    })
}

/// Computes indicators for `ticker` from the full table.
///
/// # Errors
/// Returns [`CoreError::TickerNotFound`] if the table has no rows for
/// `ticker`, or a validation error for `config`.
pub fn compute_for_ticker(
    table: &RecordTable,
    ticker: &str,
    config: &IndicatorConfig,
) -> Result<IndicatorSeries, CoreError> {
    let series = table.series_for(ticker);
    if series.is_empty() {
        return Err(CoreError::TickerNotFound(ticker.to_string()));
    }
    compute_indicators(&series, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn config(window: usize) -> IndicatorConfig {
        IndicatorConfig {
            window,
            ..IndicatorConfig::default()
        }
    }

    fn records(closes: &[f64]) -> Vec<PriceRecord> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceRecord::new(d(u32::try_from(i).unwrap() + 1), "ABC", c, 100))
            .collect()
    }

    #[test]
    fn test_flat_window_of_five() {
        let series = compute_indicators(&records(&[10.0; 5]), &config(5)).unwrap();
        let last = series.latest().unwrap();

        assert_eq!(last.middle_band, Some(10.0));
        assert_eq!(last.upper_band, Some(10.0));
        assert_eq!(last.lower_band, Some(10.0));
        assert!(series.points[..4].iter().all(|p| p.middle_band.is_none()));
    }

    #[test]
    fn test_unordered_input_is_sorted_without_mutation() {
        let mut input = records(&[1.0, 2.0, 3.0]);
        input.reverse();
        let before = input.clone();

        let series = compute_indicators(&input, &config(3)).unwrap();

        assert_eq!(input, before);
        assert_eq!(series.points[0].date, d(1));
        assert_eq!(series.points[2].middle_band, Some(2.0));
    }

    #[test]
    fn test_rsi_computed_when_absent() {
        let closes: Vec<f64> = (0..20).map(|i| 10.0 + f64::from(i % 3)).collect();
        let series = compute_indicators(&records(&closes), &config(5)).unwrap();

        assert_eq!(series.rsi_source, RsiSource::Computed);
        assert!(series.points[..14].iter().all(|p| p.rsi.is_none()));
        assert!(series.points[14..].iter().all(|p| p.rsi.is_some()));
    }

    #[test]
    fn test_supplied_rsi_passes_through() {
        let mut input = records(&[10.0, 11.0, 12.0]);
        input[1].rsi = Some(55.0);

        let series = compute_indicators(&input, &config(2)).unwrap();

        assert_eq!(series.rsi_source, RsiSource::Supplied);
        let rsi: Vec<_> = series.points.iter().map(|p| p.rsi).collect();
        assert_eq!(rsi, vec![None, Some(55.0), None]);
    }

    #[test]
    fn test_macd_passthrough_and_missing() {
        let mut input = records(&[10.0, 11.0]);
        let series = compute_indicators(&input, &config(2)).unwrap();
        assert!(series.macd_missing());

        input[1].macd = Some(0.4);
        input[1].signal_line = Some(0.1);
        let series = compute_indicators(&input, &config(2)).unwrap();
        assert!(!series.macd_missing());
        assert!((series.points[1].macd_histogram().unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(series.points[0].macd_histogram(), None);
    }

    #[test]
    fn test_band_breaches_and_zones() {
        let mut closes = vec![10.0, 10.1, 9.9, 10.0, 10.1, 9.9, 10.0, 10.1, 9.9, 10.0];
        closes.push(20.0);
        let series = compute_indicators(&records(&closes), &config(10)).unwrap();

        let breaches = series.band_breaches();
        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].date, d(11));
        assert_eq!(breaches[0].side, BandSide::Above);
        assert!(series.rsi_zones().is_empty());
    }

    #[test]
    fn test_compute_for_unknown_ticker() {
        let table = RecordTable::new(records(&[1.0, 2.0]));
        let err = compute_for_ticker(&table, "XYZ", &config(2)).unwrap_err();
        assert_eq!(err, CoreError::TickerNotFound("XYZ".to_string()));
        assert!(compute_for_ticker(&table, "ABC", &config(2)).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert_eq!(
            compute_indicators(&records(&[1.0]), &config(0)).unwrap_err(),
            CoreError::InvalidWindow(0)
        );
    }
}
