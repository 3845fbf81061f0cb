//! Technical indicators over per-ticker price series.
//!
//! Bollinger Bands with a configurable window and multiplier, Wilder RSI
//! (computed only when the source does not supply one), and MACD passthrough.

pub mod bollinger;
pub mod rolling;
pub mod rsi;
pub mod series;

pub use bollinger::{bollinger_bands, BandSide, BollingerConfig, BollingerPoint};
pub use rolling::{rolling_mean, rolling_sample_std};
pub use rsi::{wilder_rsi, RsiZone, DEFAULT_RSI_PERIOD};
pub use series::{
    compute_for_ticker, compute_indicators, BandBreach, IndicatorPoint, IndicatorSeries,
    RsiSource,
};
