#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/unsika-te/tracer/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod export;
pub mod narrative;
pub mod render;
pub mod report;

pub use analysis::Analysis;
pub use export::{ExportError, ExportFormat, Exporter};
pub use narrative::{Findings, Kpi};
pub use render::{OutputFormat, Render, RenderError, format_idr, render};
pub use report::{Report, ReportBuilder, ReportError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
