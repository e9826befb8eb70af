//! Summary pass
//!
//! Headline figures for the dataset as a whole: respondent count, status
//! distribution, GPA median, and the employed subpopulation's median time to
//! first job and starting salary.

use crate::config::PipelineConfig;
use crate::describe::{ColumnDescription, describe};
use crate::error::Result;
use crate::pass::MetricPass;
use crate::stats::{
    CategoryCount, CohortStatusCount, ensure_rows, numeric, scalar, status_by_cohort,
    value_counts, working,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracer_data::schema::columns::{COHORT, GPA, SALARY, STATUS, TTFJ};

/// Output of the summary pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Rows in the cleaned table
    pub total_respondents: usize,
    /// Median GPA over all rows
    pub ipk_median: Option<f64>,
    /// Median months to first job of the employed subpopulation
    pub ttfj_median_employed: Option<f64>,
    /// Median starting salary of the employed subpopulation
    pub salary_median_employed: Option<f64>,
    /// Frequency of each status label, most frequent first
    pub status_distribution: Vec<CategoryCount>,
    /// Status counts per graduation cohort
    pub status_by_cohort: Vec<CohortStatusCount>,
    /// Descriptive statistics for every column
    pub description: Vec<ColumnDescription>,
}

impl SummaryMetrics {
    /// Share of respondents carrying `status`, in percent.
    pub fn status_share(&self, status: &str) -> f64 {
        if self.total_respondents == 0 {
            return 0.0;
        }
        let count = self
            .status_distribution
            .iter()
            .find(|c| c.category == status)
            .map_or(0, |c| c.count);
        count as f64 / self.total_respondents as f64 * 100.0
    }
}

/// Computes [`SummaryMetrics`]
#[derive(Debug, Clone, Default)]
pub struct SummaryPass {
    config: PipelineConfig,
}

impl SummaryPass {
    /// Create a summary pass
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }
}

impl MetricPass for SummaryPass {
    type Output = SummaryMetrics;

    fn name(&self) -> &'static str {
        "summary"
    }

    fn required_columns(&self) -> &[&'static str] {
        &[COHORT, STATUS, GPA, TTFJ, SALARY]
    }

    fn compute(&self, df: &DataFrame) -> Result<SummaryMetrics> {
        ensure_rows(df, self.name())?;

        let medians = df
            .clone()
            .lazy()
            .select([
                numeric(GPA).median().alias("ipk"),
                numeric(TTFJ)
                    .filter(working(&self.config))
                    .median()
                    .alias("ttfj"),
                numeric(SALARY)
                    .filter(working(&self.config))
                    .median()
                    .alias("salary"),
            ])
            .collect()?;

        Ok(SummaryMetrics {
            total_respondents: df.height(),
            ipk_median: scalar(&medians, "ipk")?,
            ttfj_median_employed: scalar(&medians, "ttfj")?,
            salary_median_employed: scalar(&medians, "salary")?,
            status_distribution: value_counts(df, STATUS)?,
            status_by_cohort: status_by_cohort(df)?,
            description: describe(df)?,
        })
    }
}
