//! Error types for histogram parsing and aggregation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading and accumulating histogram files.
#[derive(Error, Debug)]
pub enum HistogramError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read histogram file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has fewer data lines than the radial and angular blocks need.
    #[error("{path}: expected at least {expected} data lines, found {found}")]
    TooFewLines {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// A data line did not split into the expected number of fields.
    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    FieldCount {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A field could not be parsed as a floating point number.
    #[error("{path}:{line}: invalid number '{token}'")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// Aggregation was asked to run over an empty file list.
    #[error("No histogram files to aggregate")]
    NoInput,
}

/// Convenience alias for histogram operations.
pub type Result<T> = std::result::Result<T, HistogramError>;
