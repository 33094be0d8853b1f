use std::path::PathBuf;

use thiserror::Error;

/// Failure to read the source table. Fatal: the dashboard cannot start
/// without a dataset and the load is not retried.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("workbook {} has no usable sheet", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("missing required column(s) in {}: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// `row` is the spreadsheet row number, header included
    #[error("invalid year {value:?} in row {row}")]
    InvalidYear { row: usize, value: String },

    #[error("unsupported dataset format '{0}'; use .xlsx, .xls, .xlsm, .xlsb, .ods or .csv")]
    UnsupportedFormat(String),
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::Workbook(err.to_string())
    }
}

/// Convenience type alias for Results using LoadError.
pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to write a filtered view to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DataFrame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    #[error("unsupported export format for {}; use .csv or .parquet", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("parquet support is disabled; rebuild with the 'parquet' feature")]
    ParquetDisabled,
}

pub type ExportResult<T> = Result<T, ExportError>;
