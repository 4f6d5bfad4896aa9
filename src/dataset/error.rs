//! Dataset error types
//!
//! Defines all errors that can occur while loading the source table.
//! Every variant is a load-time fault: the server must not start when one
//! of these is returned.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and reshaping the wide table
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source file could not be opened
    #[error("Failed to open dataset {path:?}: {error}")]
    Open { path: PathBuf, error: String },

    /// Delimited text could not be parsed
    #[error("CSV error: {0}")]
    Csv(String),

    /// The file has no header row at all
    #[error("Missing header row")]
    MissingHeader,

    /// A year column label is not an integer
    #[error("Invalid year column {index}: {label:?}")]
    InvalidYear { index: usize, label: String },
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Csv(err.to_string())
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
