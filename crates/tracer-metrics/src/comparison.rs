//! Comparison pass
//!
//! Internship effect on time to first job, and starting salary by job level.

use crate::error::Result;
use crate::pass::MetricPass;
use crate::stats::{GroupMedian, ensure_rows, grouped_medians, numeric, scalar};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracer_data::schema::columns::{INTERNSHIP, JOB_LEVEL, SALARY, TTFJ};

/// Output of the comparison pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Median months to first job of respondents who did an internship
    pub ttfj_median_interned: Option<f64>,
    /// Median months to first job of respondents who did not
    pub ttfj_median_not_interned: Option<f64>,
    /// Median starting salary per job level, lowest first
    pub salary_by_level: Vec<GroupMedian>,
}

/// Difference between the lowest- and highest-paid job levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryGap {
    /// Lowest-paid level
    pub from: GroupMedian,
    /// Highest-paid level
    pub to: GroupMedian,
}

impl SalaryGap {
    /// Salary difference in IDR.
    pub fn amount(&self) -> f64 {
        self.to.median - self.from.median
    }
}

impl ComparisonMetrics {
    /// Whether interns found their first job sooner. `None` if either group is empty.
    pub fn interns_faster(&self) -> Option<bool> {
        Some(self.ttfj_median_interned? < self.ttfj_median_not_interned?)
    }

    /// Months saved by doing an internship. Negative when interns were slower.
    pub fn internship_effect(&self) -> Option<f64> {
        Some(self.ttfj_median_not_interned? - self.ttfj_median_interned?)
    }

    /// Gap between the first and last entries of `salary_by_level`.
    pub fn largest_salary_gap(&self) -> Option<SalaryGap> {
        match (self.salary_by_level.first(), self.salary_by_level.last()) {
            (Some(from), Some(to)) if self.salary_by_level.len() > 1 => Some(SalaryGap {
                from: from.clone(),
                to: to.clone(),
            }),
            _ => None,
        }
    }
}

/// Computes [`ComparisonMetrics`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonPass;

impl MetricPass for ComparisonPass {
    type Output = ComparisonMetrics;

    fn name(&self) -> &'static str {
        "comparison"
    }

    fn required_columns(&self) -> &[&'static str] {
        &[INTERNSHIP, TTFJ, SALARY, JOB_LEVEL]
    }

    fn compute(&self, df: &DataFrame) -> Result<ComparisonMetrics> {
        ensure_rows(df, self.name())?;

        let medians = df
            .clone()
            .lazy()
            .select([
                numeric(TTFJ)
                    .filter(numeric(INTERNSHIP).eq(lit(1.0)))
                    .median()
                    .alias("interned"),
                numeric(TTFJ)
                    .filter(numeric(INTERNSHIP).eq(lit(0.0)))
                    .median()
                    .alias("not_interned"),
            ])
            .collect()?;

        let mut salary_by_level = grouped_medians(df.clone().lazy(), JOB_LEVEL, SALARY)?;
        salary_by_level.sort_by(|a, b| {
            a.median
                .total_cmp(&b.median)
                .then_with(|| a.group.cmp(&b.group))
        });

        Ok(ComparisonMetrics {
            ttfj_median_interned: scalar(&medians, "interned")?,
            ttfj_median_not_interned: scalar(&medians, "not_interned")?,
            salary_by_level,
        })
    }
}
