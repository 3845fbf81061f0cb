//! Export of flagged-stock tables.
//!
//! Renders a finished [`anomaly_watch_core::Table`] either as an xlsx workbook
//! with a single named sheet or as a PDF grid with an embedded Unicode font.
//! Empty selections short-circuit to [`ExportOutcome::NothingToExport`].

pub mod artifact;
pub mod error;
pub mod exporter;
pub mod pdf;
pub mod xlsx;

pub use artifact::{ExportArtifact, ExportFormat, ExportOutcome};
pub use error::ExportError;
pub use exporter::{prepare_export_table, ExportRequest, Exporter};
pub use pdf::{render_document, FontResource, TextMeasure};
pub use xlsx::render_workbook;
