#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/unsika-te/tracer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pipeline;
pub mod source;

// Re-export main types from sub-crates
pub use tracer_data as data;
pub use tracer_metrics as metrics;
pub use tracer_output as output;

pub use error::{Result, TracerError};
pub use pipeline::Pipeline;
pub use source::{DEFAULT_DATASET, DataSource, LoadedSource};
pub use tracer_metrics::PipelineConfig;
pub use tracer_output::Analysis;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
