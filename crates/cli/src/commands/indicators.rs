use anomaly_watch_core::{Cell, Table};
use anomaly_watch_signals::{compute_for_ticker, BandSide, IndicatorPoint, RsiSource, RsiZone};
use anyhow::Result;
use clap::Args;

use super::output::{fmt_opt, print_json, render_table};
use super::{GlobalArgs, RangeArgs, Session};

/// Arguments for the indicators command.
#[derive(Args, Debug, Clone)]
pub struct IndicatorsArgs {
    /// Ticker to chart (e.g., "VNM")
    #[arg(short, long)]
    pub ticker: String,

    /// Bollinger window in trading days (overrides indicators.window)
    #[arg(long)]
    pub window: Option<usize>,

    /// Band width in standard deviations (overrides indicators.std_dev_multiplier)
    #[arg(long)]
    pub std_dev: Option<f64>,

    /// Only show the last N points of the window
    #[arg(long)]
    pub tail: Option<usize>,

    #[command(flatten)]
    pub range: RangeArgs,
}

fn point_row(p: &IndicatorPoint) -> Vec<Cell> {
    vec![
        Cell::Date(p.date),
        Cell::Text(format!("{:.2}", p.close)),
        Cell::Text(fmt_opt(p.middle_band)),
        Cell::Text(fmt_opt(p.upper_band)),
        Cell::Text(fmt_opt(p.lower_band)),
        Cell::Text(fmt_opt(p.rsi)),
        Cell::Text(fmt_opt(p.macd)),
        Cell::Text(fmt_opt(p.signal_line)),
    ]
}

/// Runs the indicators command.
///
/// Indicators are computed over the whole history of the ticker so rolling
/// windows are warm at the start of the displayed range.
///
/// # Errors
/// Returns an error if the ticker is unknown or the parameters are invalid.
pub fn run_indicators(session: &Session, global: &GlobalArgs, args: &IndicatorsArgs) -> Result<()> {
    let mut config = session.config.indicators.clone();
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(std_dev) = args.std_dev {
        config.std_dev_multiplier = std_dev;
    }

    let mut series = compute_for_ticker(session.table(), &args.ticker, &config)?;
    let range = args.range.resolve(session.table())?;
    series.points.retain(|p| range.contains(p.date));
    if let Some(tail) = args.tail {
        let skip = series.points.len().saturating_sub(tail);
        series.points.drain(..skip);
    }

    if global.json {
        return print_json(&series);
    }

    if series.is_empty() {
        println!(
            "No {} records between {} and {}.",
            args.ticker,
            range.start(),
            range.end()
        );
        return Ok(());
    }

    let rsi_source = match series.rsi_source {
        RsiSource::Supplied => "from data",
        RsiSource::Computed => "computed",
    };
    println!(
        "{}: Bollinger({}, {}), RSI {} (overbought {}, oversold {})",
        args.ticker,
        config.window,
        config.std_dev_multiplier,
        rsi_source,
        config.overbought,
        config.oversold
    );
    println!();

    let mut table = Table::new(
        ["Date", "Close", "Middle", "Upper", "Lower", "RSI", "MACD", "Signal"]
            .iter()
            .map(ToString::to_string)
            .collect(),
    );
    for point in &series.points {
        table.push_row(point_row(point));
    }
    println!("{}", render_table(&table));

    let breaches = series.band_breaches();
    if !breaches.is_empty() {
        println!();
        for breach in &breaches {
            let side = match breach.side {
                BandSide::Above => "above upper band",
                BandSide::Below => "below lower band",
            };
            println!("{}: close {:.2} {}", breach.date, breach.close, side);
        }
    }

    if let Some((date, zone)) = series.rsi_zones().last() {
        let zone = match zone {
            RsiZone::Overbought => "overbought",
            RsiZone::Oversold => "oversold",
            RsiZone::Neutral => "neutral",
        };
        println!();
        println!("Latest RSI zone ({date}): {zone}");
    }
    if series.macd_missing() {
        println!("MACD not available for {}.", args.ticker);
    }
    Ok(())
}
