use anomaly_watch_screener::{filter_anomalies, flagged_tickers, listing_table};
use anyhow::Result;
use clap::Args;

use super::output::{print_json, render_table};
use super::{GlobalArgs, RangeArgs, Session};

/// Arguments for the anomalies command.
#[derive(Args, Debug, Clone)]
pub struct AnomaliesArgs {
    #[command(flatten)]
    pub range: RangeArgs,
}

/// Runs the anomalies command.
///
/// An empty selection is reported as information, not as a failure.
///
/// # Errors
/// Returns an error if the range is inverted.
pub fn run_anomalies(session: &Session, global: &GlobalArgs, args: &AnomaliesArgs) -> Result<()> {
    let range = args.range.resolve(session.table())?;
    let anomalies = filter_anomalies(session.table().records(), Some(&range), &session.predicate);

    if global.json {
        return print_json(&anomalies);
    }

    if anomalies.is_empty() {
        println!(
            "No abnormal stocks between {} and {}.",
            range.start(),
            range.end()
        );
        return Ok(());
    }

    let tickers = flagged_tickers(&anomalies);
    println!(
        "{} abnormal record(s) across {} ticker(s) between {} and {}: {}",
        anomalies.len(),
        tickers.len(),
        range.start(),
        range.end(),
        tickers.join(", ")
    );
    println!();
    println!(
        "{}",
        render_table(&listing_table(&anomalies, &session.config.data.columns))
    );
    Ok(())
}
