#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/unsika-te/tracer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod breakdown;
pub mod clean;
pub mod comparison;
pub mod config;
pub mod describe;
pub mod error;
pub mod pass;
pub mod performance;
pub mod stats;
pub mod summary;

pub use breakdown::{BreakdownPass, Breakdowns, GroupShare, HistogramBin};
pub use clean::{CleaningReport, WinsorBounds};
pub use comparison::{ComparisonMetrics, ComparisonPass, SalaryGap};
pub use config::PipelineConfig;
pub use describe::ColumnDescription;
pub use error::{MetricsError, Result};
pub use pass::MetricPass;
pub use performance::{PerformanceMetrics, PerformancePass};
pub use stats::{CategoryCount, CohortStatusCount, GroupMedian};
pub use summary::{SummaryMetrics, SummaryPass};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
