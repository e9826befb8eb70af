//! Top-level error type.

use thiserror::Error;
use tracer_data::DataError;
use tracer_metrics::MetricsError;
use tracer_output::{ExportError, RenderError, ReportError};

/// Any error a pipeline run can produce
#[derive(Debug, Error)]
pub enum TracerError {
    /// Loading or validating the dataset failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Cleaning or a metric pass failed
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Report generation failed
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl TracerError {
    /// The underlying data error, also when it surfaced through a metric pass.
    pub const fn data_error(&self) -> Option<&DataError> {
        match self {
            Self::Data(e) | Self::Metrics(MetricsError::Data(e)) => Some(e),
            _ => None,
        }
    }

    /// Whether the dataset could not be found.
    pub const fn is_not_found(&self) -> bool {
        matches!(self.data_error(), Some(e) if e.is_not_found())
    }

    /// Missing required columns, if this is a schema error.
    pub fn missing_columns(&self) -> Option<&[String]> {
        self.data_error().and_then(DataError::missing_columns)
    }

    /// Whether the dataset, raw or cleaned, had no rows.
    pub const fn is_empty_dataset(&self) -> bool {
        match self {
            Self::Data(DataError::EmptyDataset(_)) => true,
            Self::Metrics(e) => e.is_empty_dataset(),
            _ => false,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, TracerError>;
