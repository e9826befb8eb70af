//! Common interface of the metric passes.

use crate::error::Result;
use polars::prelude::DataFrame;

/// A read-only computation over a cleaned tracer study table.
///
/// Passes are independent: they may run in any order and never modify the
/// table they are given.
pub trait MetricPass {
    /// Metrics produced by the pass
    type Output;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Columns the pass reads
    fn required_columns(&self) -> &[&'static str];

    /// Compute the metrics without checking the schema first.
    fn compute(&self, df: &DataFrame) -> Result<Self::Output>;

    /// Validate the required columns, then compute.
    fn run(&self, df: &DataFrame) -> Result<Self::Output> {
        tracer_data::validate(df, self.required_columns())?;
        let output = self.compute(df)?;
        tracing::debug!(pass = self.name(), rows = df.height(), "metric pass complete");
        Ok(output)
    }
}
