use anomaly_watch_screener::{resolve_latest_alert, AlertOutcome};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;

use super::output::print_json;
use super::{parse_date_arg, GlobalArgs, Session};

/// Arguments for the alert command.
#[derive(Args, Debug, Clone)]
pub struct AlertArgs {
    /// Ticker to look up
    #[arg(short, long)]
    pub ticker: String,

    /// Latest date to consider (defaults to the last date in the data)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

/// Runs the alert command.
///
/// # Errors
/// Returns an error if the ticker does not exist in the data.
pub fn run_alert(session: &Session, global: &GlobalArgs, args: &AlertArgs) -> Result<()> {
    let cutoff = match args.date {
        Some(date) => date,
        None => session
            .table()
            .latest_date()
            .ok_or_else(|| anyhow!("record table is empty"))?,
    };

    let outcome = resolve_latest_alert(
        session.table().records(),
        &args.ticker,
        cutoff,
        &session.predicate,
    )?;

    if global.json {
        return print_json(&outcome);
    }

    match outcome {
        AlertOutcome::Found(summary) => {
            println!(
                "Latest abnormal alert for {} on {}",
                summary.ticker, summary.date
            );
            for line in &summary.alerts {
                println!("  {:<18}{}", format!("{}:", line.category.label()), line.value);
            }
            println!("  {:<18}{}", "Anomaly score:", summary.score_display());
        }
        AlertOutcome::NoRecentAlert => {
            println!(
                "No abnormal alert for {} on or before {cutoff}.",
                args.ticker
            );
        }
    }
    Ok(())
}
