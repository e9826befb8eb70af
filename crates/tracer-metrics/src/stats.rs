//! Shared expressions and aggregation helpers.

use crate::config::PipelineConfig;
use crate::error::{MetricsError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracer_data::schema::columns;

/// Median of a numeric column within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMedian {
    /// Group label
    pub group: String,
    /// Median value within the group
    pub median: f64,
}

/// Number of rows carrying a categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category label
    pub category: String,
    /// Number of rows
    pub count: usize,
}

/// Number of rows for one (cohort, status) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortStatusCount {
    /// Graduation cohort
    pub cohort: String,
    /// Status label
    pub status: String,
    /// Number of rows
    pub count: usize,
}

/// A column read as `Float64`; values that do not convert become null.
pub fn numeric(name: &str) -> Expr {
    col(name).cast(DataType::Float64)
}

/// Mask selecting the employed subpopulation.
///
/// Only labels that map to a working `EmploymentStatus` take part. Rows with a
/// missing status evaluate to null and are dropped by filters.
pub fn working(config: &PipelineConfig) -> Expr {
    config.working_labels().fold(lit(false), |acc, label| {
        acc.or(col(columns::STATUS).eq(lit(label)))
    })
}

/// Order group labels numerically when both parse as numbers, lexically otherwise.
///
/// Numeric labels sort before text labels.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

pub(crate) fn ensure_rows(df: &DataFrame, pass: &'static str) -> Result<()> {
    if df.height() == 0 {
        return Err(MetricsError::EmptyDataset { pass });
    }
    Ok(())
}

/// First value of a `Float64` column, `None` when null or absent.
pub(crate) fn scalar(df: &DataFrame, name: &str) -> Result<Option<f64>> {
    Ok(df.column(name)?.f64()?.get(0))
}

/// Median of `value` per distinct non-null `key`.
///
/// Groups whose values are all missing are omitted. The result is in no
/// particular order; callers sort it.
pub(crate) fn grouped_medians(lf: LazyFrame, key: &str, value: &str) -> Result<Vec<GroupMedian>> {
    let df = lf
        .filter(col(key).is_not_null())
        .group_by([col(key).cast(DataType::String)])
        .agg([numeric(value).median().alias("median")])
        .collect()?;

    let keys = df.column(key)?.str()?;
    let medians = df.column("median")?.f64()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(group), Some(median)) = (keys.get(i), medians.get(i)) {
            out.push(GroupMedian {
                group: group.to_string(),
                median,
            });
        }
    }
    Ok(out)
}

/// Frequency of every non-null value in `column`, most frequent first.
///
/// Ties are broken by label.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<CategoryCount>> {
    let counts = df
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column).cast(DataType::String)])
        .agg([len().cast(DataType::UInt64).alias("count")])
        .collect()?;

    let labels = counts.column(column)?.str()?;
    let values = counts.column("count")?.u64()?;

    let mut out: Vec<CategoryCount> = (0..counts.height())
        .filter_map(|i| {
            Some(CategoryCount {
                category: labels.get(i)?.to_string(),
                count: values.get(i)? as usize,
            })
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    Ok(out)
}

/// Status counts per graduation cohort, cohorts in natural order.
pub fn status_by_cohort(df: &DataFrame) -> Result<Vec<CohortStatusCount>> {
    let counts = df
        .clone()
        .lazy()
        .filter(
            col(columns::COHORT)
                .is_not_null()
                .and(col(columns::STATUS).is_not_null()),
        )
        .group_by([
            col(columns::COHORT).cast(DataType::String),
            col(columns::STATUS).cast(DataType::String),
        ])
        .agg([len().cast(DataType::UInt64).alias("count")])
        .collect()?;

    let cohorts = counts.column(columns::COHORT)?.str()?;
    let statuses = counts.column(columns::STATUS)?.str()?;
    let values = counts.column("count")?.u64()?;

    let mut out: Vec<CohortStatusCount> = (0..counts.height())
        .filter_map(|i| {
            Some(CohortStatusCount {
                cohort: cohorts.get(i)?.to_string(),
                status: statuses.get(i)?.to_string(),
                count: values.get(i)? as usize,
            })
        })
        .collect();
    out.sort_by(|a, b| {
        compare_labels(&a.cohort, &b.cohort).then_with(|| a.status.cmp(&b.status))
    });
    Ok(out)
}

/// Non-null values of a numeric column within the employed subpopulation.
pub(crate) fn working_values(
    df: &DataFrame,
    config: &PipelineConfig,
    name: &str,
) -> Result<Vec<f64>> {
    let selected = df
        .clone()
        .lazy()
        .filter(working(config))
        .select([numeric(name).alias(name)])
        .collect()?;

    Ok(selected
        .column(name)?
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}
