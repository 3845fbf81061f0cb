//! Wilder's Relative Strength Index.

use serde::{Deserialize, Serialize};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Computes Wilder-smoothed RSI for a date-ordered close series.
///
/// The first value appears at index `period`, once `period` price changes are
/// available; it is seeded with the simple mean of those gains and losses.
/// Later values use `avg = (prev * (period - 1) + current) / period`.
///
/// A window with no losses reads 100, and a flat window with neither gains nor
/// losses reads 50.
#[must_use]
pub fn wilder_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let (mut avg_gain, mut avg_loss) = deltas[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), &d| (g + d.max(0.0), l + (-d).max(0.0)));
    avg_gain /= p;
    avg_loss /= p;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for (i, &delta) in deltas.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (p - 1.0) + delta.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-delta).max(0.0)) / p;
        // deltas[i] is the change into closes[i + 1]
        out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return if avg_gain <= 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Position of an RSI reading against the overbought/oversold guide lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    #[must_use]
    pub fn classify(rsi: f64, overbought: f64, oversold: f64) -> Self {
        if rsi > overbought {
            Self::Overbought
        } else if rsi < oversold {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_until_period_deltas() {
        let closes: Vec<f64> = (0..15).map(f64::from).collect();
        let rsi = wilder_rsi(&closes, 14);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert_eq!(rsi[14], Some(100.0));
        assert!(wilder_rsi(&closes[..14], 14).iter().all(Option::is_none));
    }

    #[test]
    fn test_all_losses_reads_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - f64::from(i)).collect();
        let rsi = wilder_rsi(&closes, 14);
        assert_eq!(rsi[19], Some(0.0));
    }

    #[test]
    fn test_flat_series_reads_fifty() {
        let rsi = wilder_rsi(&[10.0; 16], 14);
        assert_eq!(rsi[14], Some(50.0));
        assert_eq!(rsi[15], Some(50.0));
    }

    #[test]
    fn test_wilder_smoothing_step() {
        // period 2: deltas +2, -1 seed gains 1.0 / losses 0.5, then +1
        let rsi = wilder_rsi(&[10.0, 12.0, 11.0, 12.0], 2);
        let seed = 100.0 - 100.0 / (1.0 + 1.0 / 0.5);
        assert!((rsi[2].unwrap() - seed).abs() < 1e-12);

        let gain = (1.0 * 1.0 + 1.0) / 2.0;
        let loss = (0.5 * 1.0 + 0.0) / 2.0;
        let next = 100.0 - 100.0 / (1.0 + gain / loss);
        assert!((rsi[3].unwrap() - next).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_stays_in_bounds() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.21, 46.25, 45.71, 46.45,
        ];
        for value in wilder_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_zone_classification() {
        assert_eq!(RsiZone::classify(75.0, 70.0, 30.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(25.0, 70.0, 30.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(70.0, 70.0, 30.0), RsiZone::Neutral);
    }
}
