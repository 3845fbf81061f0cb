//! CSV-backed record store.
//!
//! Reads the surveillance export written by the upstream detection job: one
//! row per (ticker, date) with price, volume, per-indicator alert text, and the
//! anomaly label. Header names come from [`ColumnNames`].

use anomaly_watch_core::{AlertCategory, ColumnNames, PriceRecord, RecordTable};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::decode::{decode_text, SourceEncoding};
use crate::error::{Result, StoreError};
use crate::parse::{parse_date, parse_optional_f64, parse_optional_text, parse_price, parse_volume};
use crate::store::RecordStore;

/// A data row left out of the table, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub reason: String,
}

/// Outcome of a CSV load: the table plus what happened along the way.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: RecordTable,
    pub encoding: SourceEncoding,
    pub skipped: Vec<SkippedRow>,
}

pub struct CsvRecordStore {
    path: PathBuf,
    columns: ColumnNames,
}

impl CsvRecordStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, columns: ColumnNames) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file and reports skipped rows and the encoding used.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a required column is
    /// missing, a date cannot be parsed, or no rows survive.
    pub async fn load_with_report(&self) -> Result<LoadReport> {
        let bytes = tokio::fs::read(&self.path).await?;
        let report = parse_csv_bytes(&bytes, &self.columns)?;
        info!(
            path = %self.path.display(),
            records = report.table.len(),
            skipped = report.skipped.len(),
            encoding = ?report.encoding,
            "loaded record table"
        );
        Ok(report)
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn load(&self) -> Result<RecordTable> {
        Ok(self.load_with_report().await?.table)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Header positions of every known column.
struct ColumnIndex {
    date: usize,
    ticker: usize,
    close: usize,
    volume: usize,
    label: usize,
    alerts: [Option<usize>; 7],
    score: Option<usize>,
    rsi: Option<usize>,
    macd: Option<usize>,
    signal_line: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, names: &ColumnNames) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| StoreError::MissingColumn(name.to_string()));

        let mut alerts = [None; 7];
        for category in AlertCategory::ALL {
            alerts[category.index()] = find(names.alert(category));
        }

        Ok(Self {
            date: require(&names.date)?,
            ticker: require(&names.ticker)?,
            close: require(&names.close)?,
            volume: require(&names.volume)?,
            label: require(&names.anomaly_label)?,
            alerts,
            score: find(&names.anomaly_score),
            rsi: find(&names.rsi),
            macd: find(&names.macd),
            signal_line: find(&names.signal_line),
        })
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn optional_number(
    record: &StringRecord,
    index: Option<usize>,
    column: &str,
    row: usize,
) -> Option<f64> {
    let raw = cell(record, index?);
    match parse_optional_f64(raw) {
        Ok(value) => value,
        Err(_) => {
            warn!(row, column, value = raw, "non-numeric value treated as absent");
            None
        }
    }
}

/// Decodes and parses a CSV export into a record table.
///
/// Rows with a blank ticker, a non-positive or non-numeric close, an invalid
/// volume, or a repeated (ticker, date) key are skipped and reported. An
/// unparseable date aborts the load.
///
/// # Errors
/// Returns [`StoreError::MissingColumn`], [`StoreError::InvalidDate`],
/// [`StoreError::Csv`], or [`StoreError::Empty`].
pub fn parse_csv_bytes(bytes: &[u8], names: &ColumnNames) -> Result<LoadReport> {
    let (text, encoding) = decode_text(bytes);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, names)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let raw = result?;

        let date_text = cell(&raw, index.date);
        let date = parse_date(date_text).ok_or_else(|| StoreError::InvalidDate {
            row,
            value: date_text.to_string(),
        })?;

        let ticker = cell(&raw, index.ticker).trim().to_string();
        if ticker.is_empty() {
            skipped.push(SkippedRow {
                row,
                reason: "blank ticker".to_string(),
            });
            continue;
        }

        let Some(close) = parse_price(cell(&raw, index.close)) else {
            skipped.push(SkippedRow {
                row,
                reason: format!("invalid close {:?}", cell(&raw, index.close)),
            });
            continue;
        };

        let Some(volume) = parse_volume(cell(&raw, index.volume)) else {
            skipped.push(SkippedRow {
                row,
                reason: format!("invalid volume {:?}", cell(&raw, index.volume)),
            });
            continue;
        };

        if !seen.insert((ticker.clone(), date)) {
            skipped.push(SkippedRow {
                row,
                reason: format!("duplicate row for {ticker} on {date}"),
            });
            continue;
        }

        let mut record = PriceRecord::new(date, ticker, close, volume);
        record.anomaly_label = cell(&raw, index.label).to_string();
        for category in AlertCategory::ALL {
            record.alerts[category.index()] = index.alerts[category.index()]
                .and_then(|col| parse_optional_text(cell(&raw, col)));
        }
        record.anomaly_score = optional_number(&raw, index.score, &names.anomaly_score, row);
        record.rsi = optional_number(&raw, index.rsi, &names.rsi, row);
        record.macd = optional_number(&raw, index.macd, &names.macd, row);
        record.signal_line = optional_number(&raw, index.signal_line, &names.signal_line, row);

        records.push(record);
    }

    for skip in &skipped {
        debug!(row = skip.row, reason = %skip.reason, "skipped row");
    }

    if records.is_empty() {
        return Err(StoreError::Empty);
    }

    Ok(LoadReport {
        table: RecordTable::new(records),
        encoding,
        skipped,
    })
}
