//! Error types for the tally binary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised around the allocation core.
#[derive(Debug, Error)]
pub enum Error {
    /// Allocation failed.
    #[error(transparent)]
    Allocation(#[from] tally_core::Error),

    /// Ballot or result file could not be read or written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Ballot file lacks a required column.
    #[error("missing column {column:?} in {path}")]
    MissingColumn { column: &'static str, path: String },

    /// Config file could not be parsed.
    #[error("invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
