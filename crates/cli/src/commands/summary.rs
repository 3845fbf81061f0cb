use anomaly_watch_screener::{filter_anomalies, flagged_tickers};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use super::output::print_json;
use super::{GlobalArgs, Session};

#[derive(Debug, Serialize)]
struct DataSummary {
    path: String,
    encoding: String,
    records: usize,
    tickers: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    skipped_rows: usize,
    flagged_records: usize,
    flagged_tickers: Vec<String>,
}

/// Runs the summary command.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn run_summary(session: &Session, global: &GlobalArgs) -> Result<()> {
    let table = session.table();
    let anomalies = filter_anomalies(table.records(), None, &session.predicate);
    let bounds = table.date_bounds();

    let summary = DataSummary {
        path: session.config.data.path.display().to_string(),
        encoding: format!("{:?}", session.report.encoding),
        records: table.len(),
        tickers: table.tickers().len(),
        first_date: bounds.map(|b| b.start()),
        last_date: bounds.map(|b| b.end()),
        skipped_rows: session.report.skipped.len(),
        flagged_records: anomalies.len(),
        flagged_tickers: flagged_tickers(&anomalies),
    };

    if global.json {
        return print_json(&summary);
    }

    println!("Data file:        {} ({})", summary.path, summary.encoding);
    println!("Records:          {}", summary.records);
    println!("Tickers:          {}", summary.tickers);
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("Dates:            {first} .. {last}");
    }
    println!("Skipped rows:     {}", summary.skipped_rows);
    println!("Flagged records:  {}", summary.flagged_records);
    if !summary.flagged_tickers.is_empty() {
        println!("Flagged tickers:  {}", summary.flagged_tickers.join(", "));
    }
    Ok(())
}
