//! CLI commands over a loaded record table.

pub mod alert;
pub mod anomalies;
pub mod export;
pub mod indicators;
pub mod output;
pub mod summary;

pub use alert::{run_alert, AlertArgs};
pub use anomalies::{run_anomalies, AnomaliesArgs};
pub use export::{run_export, ExportArgs};
pub use indicators::{run_indicators, IndicatorsArgs};
pub use summary::run_summary;

use anomaly_watch_core::config_loader::DEFAULT_CONFIG_PATH;
use anomaly_watch_core::{AppConfig, ConfigLoader, DateRange, RecordTable};
use anomaly_watch_data::parse::parse_date;
use anomaly_watch_data::{CsvRecordStore, LoadReport};
use anomaly_watch_screener::AnomalyPredicate;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Stock CSV file (overrides data.path from the config)
    #[arg(short, long, global = true, env = "ANOMALY_WATCH_DATA")]
    pub data: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

/// Inclusive date window; missing ends default to the bounds of the data.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day of the window (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
}

impl RangeArgs {
    /// Resolves the window against `table`.
    ///
    /// # Errors
    /// Returns an error if start is after end.
    pub fn resolve(&self, table: &RecordTable) -> Result<DateRange> {
        let bounds = table
            .date_bounds()
            .ok_or_else(|| anyhow!("record table is empty"))?;
        let start = self.start.unwrap_or_else(|| bounds.start());
        let end = self.end.unwrap_or_else(|| bounds.end());
        Ok(DateRange::new(start, end)?)
    }
}

pub fn parse_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw)
        .ok_or_else(|| format!("invalid date '{raw}' (expected YYYY-MM-DD or MM/DD/YYYY)"))
}

/// Configuration plus the loaded table, shared by all commands.
pub struct Session {
    pub config: AppConfig,
    pub report: LoadReport,
    pub predicate: AnomalyPredicate,
}

impl Session {
    /// Loads configuration, then the record table it points at.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the data cannot be
    /// loaded.
    pub async fn open(global: &GlobalArgs) -> Result<Self> {
        let mut config = ConfigLoader::load_from(&global.config)?;
        if let Some(path) = &global.data {
            config.data.path.clone_from(path);
        }

        let store = CsvRecordStore::new(config.data.path.clone(), config.data.columns.clone());
        let report = store
            .load_with_report()
            .await
            .with_context(|| format!("Failed to load {}", config.data.path.display()))?;

        for skipped in &report.skipped {
            warn!(row = skipped.row, reason = %skipped.reason, "skipped row");
        }

        let predicate = AnomalyPredicate::new(&config.data.sentinels);
        Ok(Self {
            config,
            report,
            predicate,
        })
    }

    #[must_use]
    pub const fn table(&self) -> &RecordTable {
        &self.report.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_arg_is_month_first() {
        assert_eq!(
            parse_date_arg("01/02/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
        assert_eq!(
            parse_date_arg("2024-01-02"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
        let err = parse_date_arg("31/31/2024").unwrap_err();
        assert!(err.contains("MM/DD/YYYY"));
    }
}
