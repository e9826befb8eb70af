//! The result of one pipeline run.

use serde::{Deserialize, Serialize};
use tracer_data::QualityReport;
use tracer_metrics::{
    Breakdowns, CleaningReport, ComparisonMetrics, PerformanceMetrics, PipelineConfig,
    SummaryMetrics,
};

/// Everything computed for one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Where the raw table came from
    pub source: String,
    /// Configuration the run used
    pub config: PipelineConfig,
    /// Raw versus cleaned data quality
    pub quality: QualityReport,
    /// What the cleaner removed or clipped
    pub cleaning: CleaningReport,
    /// Summary pass output
    pub summary: SummaryMetrics,
    /// Performance pass output
    pub performance: PerformanceMetrics,
    /// Comparison pass output
    pub comparison: ComparisonMetrics,
    /// Chart breakdowns
    pub breakdowns: Breakdowns,
}
