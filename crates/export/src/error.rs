use anomaly_watch_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Export failures. None of them leaves a partial artifact behind.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Font file for PDF export is absent; a configuration problem the user can fix.
    #[error("font file not found: {} (place a Unicode TrueType font there or set export.font_path)", path.display())]
    FontNotFound { path: PathBuf },

    #[error("cannot read font {}: {source}", path.display())]
    FontUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font {} is not a usable TrueType font: {reason}", path.display())]
    InvalidFont { path: PathBuf, reason: String },

    #[error("invalid export settings: {0}")]
    InvalidConfig(#[from] CoreError),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("document error: {0}")]
    Document(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// True for problems fixed by changing configuration rather than data.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::FontNotFound { .. }
                | Self::FontUnreadable { .. }
                | Self::InvalidFont { .. }
                | Self::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
