use clap::{Parser, Subcommand};

mod commands;

use commands::{AlertArgs, AnomaliesArgs, ExportArgs, GlobalArgs, IndicatorsArgs};

#[derive(Parser)]
#[command(name = "anomaly-watch")]
#[command(about = "Abnormal trading surveillance over daily stock data", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what was loaded: tickers, date bounds, skipped rows, flagged count
    Summary,
    /// List flagged records within a date range
    Anomalies(AnomaliesArgs),
    /// Compute Bollinger Bands and RSI for one ticker
    Indicators(IndicatorsArgs),
    /// Show the latest abnormal alert of a ticker on or before a date
    Alert(AlertArgs),
    /// Export flagged records to xlsx or PDF
    Export(ExportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        // stdout carries command output, so logs go to stderr
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let session = commands::Session::open(&cli.global).await?;

    match cli.command {
        Commands::Summary => commands::run_summary(&session, &cli.global)?,
        Commands::Anomalies(args) => commands::run_anomalies(&session, &cli.global, &args)?,
        Commands::Indicators(args) => commands::run_indicators(&session, &cli.global, &args)?,
        Commands::Alert(args) => commands::run_alert(&session, &cli.global, &args)?,
        Commands::Export(args) => commands::run_export(&session, &args)?,
    }

    Ok(())
}
