//! Projection of records into header-labelled tables for listing and export.

use anomaly_watch_core::{AlertCategory, Cell, ColumnNames, PriceRecord, Table};

/// Alert columns shown in the on-screen anomaly listing (no ATR).
const LISTING_ALERTS: [AlertCategory; 6] = [
    AlertCategory::PriceVolatility,
    AlertCategory::ForeignFlow,
    AlertCategory::Liquidity,
    AlertCategory::Bollinger,
    AlertCategory::Rsi,
    AlertCategory::Macd,
];

fn volume_cell(volume: u64) -> Cell {
    i64::try_from(volume).map_or_else(|_| Cell::Number(volume as f64), Cell::Integer)
}

fn text_cell(value: Option<&str>) -> Cell {
    value.map_or(Cell::Empty, Cell::from)
}

/// Every known column, in source order, with the configured header text.
#[must_use]
pub fn records_to_table(records: &[PriceRecord], names: &ColumnNames) -> Table {
    let mut columns = vec![
        names.date.clone(),
        names.ticker.clone(),
        names.close.clone(),
        names.volume.clone(),
    ];
    columns.extend(AlertCategory::ALL.iter().map(|&c| names.alert(c).to_string()));
    columns.extend([
        names.anomaly_label.clone(),
        names.anomaly_score.clone(),
        names.rsi.clone(),
        names.macd.clone(),
        names.signal_line.clone(),
    ]);

    let mut table = Table::new(columns);
    for record in records {
        let mut row = vec![
            Cell::Date(record.date),
            Cell::from(record.ticker.as_str()),
            Cell::Number(record.close),
            volume_cell(record.volume),
        ];
        row.extend(AlertCategory::ALL.iter().map(|&c| text_cell(record.alert(c))));
        row.extend([
            Cell::from(record.anomaly_label.as_str()),
            Cell::from(record.anomaly_score),
            Cell::from(record.rsi),
            Cell::from(record.macd),
            Cell::from(record.signal_line),
        ]);
        table.push_row(row);
    }
    table
}

/// The compact anomaly listing: date, ticker, close, volume and six alerts.
#[must_use]
pub fn listing_table(records: &[PriceRecord], names: &ColumnNames) -> Table {
    let mut columns = vec![
        names.date.clone(),
        names.ticker.clone(),
        names.close.clone(),
        names.volume.clone(),
    ];
    columns.extend(LISTING_ALERTS.iter().map(|&c| names.alert(c).to_string()));

    let mut table = Table::new(columns);
    for record in records {
        let mut row = vec![
            Cell::Date(record.date),
            Cell::from(record.ticker.as_str()),
            Cell::Number(record.close),
            volume_cell(record.volume),
        ];
        row.extend(LISTING_ALERTS.iter().map(|&c| text_cell(record.alert(c))));
        table.push_row(row);
    }
    table
}
