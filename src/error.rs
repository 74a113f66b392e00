use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the data and view layers.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Everything that can go wrong while loading the dataset or dispatching a view.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("column '{0}' has missing values but no observed value to fill them with")]
    NoObservedValues(&'static str),

    #[error("unknown tab identifier '{0}'")]
    UnknownTab(String),
}
