//! Chart-oriented breakdowns of the employed subpopulation.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pass::MetricPass;
use crate::stats::{ensure_rows, numeric, working, working_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracer_data::schema::columns::{FIELD_FIT, SECTOR, STATUS, TTFJ};

/// Share of a group meeting a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShare {
    /// Group label
    pub group: String,
    /// Percentage of the group meeting the condition
    pub percent: f64,
    /// Rows in the group
    pub respondents: usize,
}

/// One bin of a histogram. Bins are half-open except the last, which is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
    /// Values falling in the bin
    pub count: usize,
}

/// Output of the breakdown pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdowns {
    /// Field-fit percentage per sector, highest first
    pub field_fit_by_sector: Vec<GroupShare>,
    /// Distribution of months to first job among the employed
    pub ttfj_histogram: Vec<HistogramBin>,
}

/// Computes [`Breakdowns`]
#[derive(Debug, Clone, Default)]
pub struct BreakdownPass {
    config: PipelineConfig,
}

impl BreakdownPass {
    /// Create a breakdown pass
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }
}

impl MetricPass for BreakdownPass {
    type Output = Breakdowns;

    fn name(&self) -> &'static str {
        "breakdown"
    }

    fn required_columns(&self) -> &[&'static str] {
        &[STATUS, TTFJ, FIELD_FIT, SECTOR]
    }

    fn compute(&self, df: &DataFrame) -> Result<Breakdowns> {
        ensure_rows(df, self.name())?;
        let values = working_values(df, &self.config, TTFJ)?;
        Ok(Breakdowns {
            field_fit_by_sector: field_fit_by_sector(df, &self.config)?,
            ttfj_histogram: histogram(&values, self.config.histogram_bins),
        })
    }
}

/// Percentage of employed respondents per sector whose field-fit rating meets
/// [`PipelineConfig::field_fit_min`], highest first.
///
/// A missing rating counts against the sector.
pub fn field_fit_by_sector(df: &DataFrame, config: &PipelineConfig) -> Result<Vec<GroupShare>> {
    let grouped = df
        .clone()
        .lazy()
        .filter(working(config))
        .filter(col(SECTOR).is_not_null())
        .group_by([col(SECTOR).cast(DataType::String)])
        .agg([
            numeric(FIELD_FIT)
                .gt_eq(lit(config.field_fit_min))
                .cast(DataType::UInt64)
                .sum()
                .alias("fit"),
            len().cast(DataType::UInt64).alias("n"),
        ])
        .collect()?;

    let sectors = grouped.column(SECTOR)?.str()?;
    let fit = grouped.column("fit")?.u64()?;
    let n = grouped.column("n")?.u64()?;

    let mut out: Vec<GroupShare> = (0..grouped.height())
        .filter_map(|i| {
            let respondents = n.get(i)? as usize;
            Some(GroupShare {
                group: sectors.get(i)?.to_string(),
                percent: fit.get(i).unwrap_or(0) as f64 / respondents.max(1) as f64 * 100.0,
                respondents,
            })
        })
        .collect();
    out.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| a.group.cmp(&b.group))
    });
    Ok(out)
}

/// Equal-width histogram over the range of `values`.
///
/// A degenerate range `[v, v]` is widened to `[v - 0.5, v + 0.5]`. Empty input
/// or zero bins yield no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}
