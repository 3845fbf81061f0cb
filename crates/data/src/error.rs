use thiserror::Error;

/// Errors from loading the record table.
///
/// Every variant is fatal to the load step and is reported separately from an
/// empty selection made later in the pipeline.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the header row.
    #[error("missing required column: {0:?}")]
    MissingColumn(String),

    /// Row number is 1-based and counts data rows only.
    #[error("row {row}: unparseable date {value:?}")]
    InvalidDate { row: usize, value: String },

    /// Source had a header but no usable data rows.
    #[error("source contains no records")]
    Empty,
}

pub type Result<T> = std::result::Result<T, StoreError>;
