//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or validating a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// Source could not be found
    #[error("Dataset not found: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Required columns are missing
    #[error("Missing required columns: {}", missing.join(", "))]
    Schema {
        /// Every missing column, in the order they were required
        missing: Vec<String>,
    },

    /// Dataset has no rows left to analyse
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Returns the missing column names for a schema error.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::Schema { missing } => Some(missing),
            _ => None,
        }
    }

    /// Returns true if the error means the source could not be reached.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
