//! Export entry points: table serialization and the full request pipeline.

use anomaly_watch_core::{ColumnNames, DateRange, ExportConfig, PriceRecord, Table};
use anomaly_watch_screener::{
    aggregate, filter_anomalies, records_to_table, AnomalyPredicate, Granularity,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifact::{ExportArtifact, ExportFormat, ExportOutcome};
use crate::error::Result;
use crate::pdf::{render_document, FontResource};
use crate::xlsx::render_workbook;

/// What to export and over which window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub granularity: Granularity,
    /// Bounds daily and weekly exports; ignored by unrestricted ones
    pub date_range: Option<DateRange>,
}

/// Flagged rows selected by `request`, projected to the export column layout.
#[must_use]
pub fn prepare_export_table(
    records: &[PriceRecord],
    request: &ExportRequest,
    predicate: &AnomalyPredicate,
    names: &ColumnNames,
) -> Table {
    let range = match request.granularity {
        Granularity::Unrestricted => None,
        Granularity::Daily | Granularity::Weekly => request.date_range.as_ref(),
    };
    let anomalies = filter_anomalies(records, range, predicate);
    let rows = aggregate(&anomalies, range, request.granularity);
    records_to_table(&rows, names)
}

/// Serializes tables into downloadable artifacts.
///
/// Holds only configuration; every call is independent and leaves no state.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    #[must_use]
    pub const fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Serializes `table` in `format`.
    ///
    /// An empty table yields [`ExportOutcome::NothingToExport`] before any
    /// rendering. For documents the grid settings are checked and the font is
    /// loaded first, so either problem fails without producing any bytes.
    ///
    /// # Errors
    /// Returns an error if the grid settings are invalid, the font is missing
    /// or invalid, or rendering fails.
    pub fn export(&self, table: &Table, format: ExportFormat) -> Result<ExportOutcome> {
        if table.is_empty() {
            info!(%format, "nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let bytes = match format {
            ExportFormat::Spreadsheet => render_workbook(table, &self.config.sheet_name)?,
            ExportFormat::Document => {
                self.config.validate()?;
                let font = FontResource::load(&self.config.font_path)?;
                render_document(table, &self.config, &font)?
            }
        };

        info!(%format, rows = table.len(), bytes = bytes.len(), "export complete");
        Ok(ExportOutcome::Artifact(ExportArtifact::new(bytes, format)))
    }

    /// Runs filter, aggregation, projection, and serialization for `request`.
    ///
    /// # Errors
    /// See [`Exporter::export`].
    pub fn export_request(
        &self,
        records: &[PriceRecord],
        request: &ExportRequest,
        predicate: &AnomalyPredicate,
        names: &ColumnNames,
    ) -> Result<ExportOutcome> {
        let table = prepare_export_table(records, request, predicate, names);
        self.export(&table, request.format)
    }
}
