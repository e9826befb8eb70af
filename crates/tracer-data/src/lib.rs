#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/unsika-te/tracer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod loader;
pub mod quality;
pub mod schema;

pub use cache::{CacheStats, SourceCache, SourceKey};
pub use error::{DataError, Result};
pub use loader::{load_csv, load_csv_validated, read_csv};
pub use quality::{MissingValues, QualityReport};
pub use schema::{ColumnInfo, ColumnKind, EmploymentStatus, REQUIRED_COLUMNS, validate};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
