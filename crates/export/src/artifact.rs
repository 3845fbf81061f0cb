use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook (xlsx)
    Spreadsheet,
    /// Paginated PDF grid
    Document,
}

impl ExportFormat {
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Document => "application/pdf",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Document => "pdf",
        }
    }

    #[must_use]
    pub fn suggested_filename(self) -> String {
        format!("abnormal_stocks.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Ok(Self::Spreadsheet),
            "pdf" | "document" => Ok(Self::Document),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Serialized export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub suggested_filename: String,
}

impl ExportArtifact {
    #[must_use]
    pub fn new(bytes: Vec<u8>, format: ExportFormat) -> Self {
        Self {
            bytes,
            format,
            suggested_filename: format.suggested_filename(),
        }
    }

    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Writes the artifact into `dir` under its suggested filename.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.suggested_filename);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "wrote export");
        Ok(path)
    }
}

/// Result of an export request. An empty selection is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Artifact(ExportArtifact),
    NothingToExport,
}

impl ExportOutcome {
    #[must_use]
    pub const fn artifact(&self) -> Option<&ExportArtifact> {
        match self {
            Self::Artifact(artifact) => Some(artifact),
            Self::NothingToExport => None,
        }
    }
}
