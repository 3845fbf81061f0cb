use chrono::NaiveDate;
use thiserror::Error;

/// Caller-input errors raised by the pure pipeline functions.
///
/// Empty selections are never reported through this type; they are ordinary
/// results (an empty `Vec`, a "no recent alert" outcome, and so on).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The requested ticker has no rows in the table.
    #[error("ticker not found: {0}")]
    TickerNotFound(String),

    /// Range start falls after its end.
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Rolling window must cover at least one record.
    #[error("invalid window: {0} (must be >= 1)")]
    InvalidWindow(usize),

    /// Indicator or threshold parameter outside its accepted domain.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
