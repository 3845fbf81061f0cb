//! Bollinger Bands: trailing mean plus and minus k sample standard deviations.

use anomaly_watch_core::{CoreError, IndicatorConfig};
use serde::{Deserialize, Serialize};

use crate::rolling::{rolling_mean, rolling_sample_std};

/// Configuration for Bollinger Band calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerConfig {
    /// Number of trailing closes in each window (deployments use 5, 10 or 20)
    pub window: usize,
    /// Band half-width in standard deviations
    pub std_dev_multiplier: f64,
}

impl BollingerConfig {
    /// # Errors
    /// Returns an error for a zero window or a non-positive multiplier.
    pub fn new(window: usize, std_dev_multiplier: f64) -> Result<Self, CoreError> {
        if window == 0 {
            return Err(CoreError::InvalidWindow(window));
        }
        if !(std_dev_multiplier.is_finite() && std_dev_multiplier > 0.0) {
            return Err(CoreError::InvalidParameter {
                name: "std_dev_multiplier",
                reason: format!("must be a positive number, got {std_dev_multiplier}"),
            });
        }
        Ok(Self {
            window,
            std_dev_multiplier,
        })
    }
}

impl From<&IndicatorConfig> for BollingerConfig {
    fn from(config: &IndicatorConfig) -> Self {
        Self {
            window: config.window,
            std_dev_multiplier: config.std_dev_multiplier,
        }
    }
}

/// Band values at one position. All `None` until the window is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub middle: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// Which side of the envelope a close escaped through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandSide {
    Above,
    Below,
}

impl BollingerPoint {
    /// Returns the side the price breaches, `None` when inside the bands or
    /// when the bands are undefined.
    #[must_use]
    pub fn breach(&self, price: f64) -> Option<BandSide> {
        match (self.upper, self.lower) {
            (Some(upper), _) if price > upper => Some(BandSide::Above),
            (_, Some(lower)) if price < lower => Some(BandSide::Below),
            _ => None,
        }
    }

    /// Upper minus lower, relative to the middle band.
    #[must_use]
    pub fn bandwidth(&self) -> Option<f64> {
        let (middle, upper, lower) = (self.middle?, self.upper?, self.lower?);
        if middle.abs() < f64::EPSILON {
            return None;
        }
        Some((upper - lower) / middle)
    }
}

/// Computes Bollinger Bands for a date-ordered close series.
#[must_use]
pub fn bollinger_bands(closes: &[f64], config: &BollingerConfig) -> Vec<BollingerPoint> {
    let means = rolling_mean(closes, config.window);
    let stds = rolling_sample_std(closes, config.window);

    means
        .into_iter()
        .zip(stds)
        .map(|(middle, std)| match middle {
            None => BollingerPoint::default(),
            Some(m) => {
                let offset = std.map(|s| config.std_dev_multiplier * s);
                BollingerPoint {
                    middle: Some(m),
                    upper: offset.map(|o| m + o),
                    lower: offset.map(|o| m - o),
                }
            }
        })
        .collect()
}
