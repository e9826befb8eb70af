//! Error types for cleaning and metric computation

use polars::error::PolarsError;
use thiserror::Error;
use tracer_data::DataError;

/// Errors that can occur while cleaning or computing metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The table handed to a pass has no rows
    #[error("Cannot compute {pass} metrics on an empty dataset")]
    EmptyDataset {
        /// Name of the pass that refused the table
        pass: &'static str,
    },

    /// Input table failed validation
    #[error(transparent)]
    Data(#[from] DataError),

    /// Polars error during computation
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetricsError {
    /// Whether the error was caused by an empty table.
    pub const fn is_empty_dataset(&self) -> bool {
        matches!(
            self,
            Self::EmptyDataset { .. } | Self::Data(DataError::EmptyDataset(_))
        )
    }
}

/// Result type for metric operations
pub type Result<T> = std::result::Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_message() {
        let err = MetricsError::EmptyDataset { pass: "summary" };
        assert_eq!(
            err.to_string(),
            "Cannot compute summary metrics on an empty dataset"
        );
        assert!(err.is_empty_dataset());
    }

    #[test]
    fn test_data_error_is_transparent() {
        let err: MetricsError = DataError::Schema {
            missing: vec!["nps_0_10".to_string()],
        }
        .into();
        assert_eq!(err.to_string(), "Missing required columns: nps_0_10");
        assert!(!err.is_empty_dataset());
    }
}
