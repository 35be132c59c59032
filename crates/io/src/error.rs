//! Error types for hmhews-io.

use std::path::PathBuf;

use hmhews_regions::RegionError;

/// Error type for all fallible operations in the hmhews-io crate.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying failure.
        reason: String,
    },

    /// A JSON file could not be read, parsed, or written.
    #[error("json error in {}: {reason}", path.display())]
    Json { path: PathBuf, reason: String },

    /// A TOML file could not be read, parsed, or written.
    #[error("toml error in {}: {reason}", path.display())]
    Toml { path: PathBuf, reason: String },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// The loaded regions do not form a valid hierarchy.
    #[error(transparent)]
    Region(#[from] RegionError),
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}
