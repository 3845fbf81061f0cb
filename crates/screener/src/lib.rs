//! Anomaly screening over the loaded record table.
//!
//! Selects flagged rows, resolves the most recent alert of a ticker, and
//! buckets flagged rows by week before they are exported.

pub mod aggregate;
pub mod alert;
pub mod filter;
pub mod projection;

pub use aggregate::{aggregate, resample_weekly, week_ending_monday, Granularity};
pub use alert::{resolve_latest_alert, AlertLine, AlertOutcome, AlertSummary, NOT_AVAILABLE};
pub use filter::{filter_anomalies, flagged_tickers, AnomalyPredicate};
pub use projection::{listing_table, records_to_table};
