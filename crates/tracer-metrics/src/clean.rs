//! Cleaning of the raw tracer study table
//!
//! Steps, in order:
//!
//! 1. Remove exact-duplicate rows, keeping the first occurrence.
//! 2. Remove rows with a missing time-to-first-job or starting salary.
//! 3. Remove rows with a negative time-to-first-job.
//! 4. Winsorize the starting salary of every remaining row to the
//!    [`winsor_lower`](PipelineConfig::winsor_lower) /
//!    [`winsor_upper`](PipelineConfig::winsor_upper) quantiles (linear
//!    interpolation) of the employed subpopulation. When nobody is employed
//!    the salaries are left untouched.
//!
//! The bounds come from a subpopulation but are applied to the whole table, so
//! an unemployed respondent with an extreme salary is clamped too.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::stats::{numeric, working};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracer_data::schema::columns::{SALARY, TTFJ};

/// Salary bounds derived from the employed subpopulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinsorBounds {
    /// Lower bound (salary at `winsor_lower`)
    pub lower: f64,
    /// Upper bound (salary at `winsor_upper`)
    pub upper: f64,
    /// Employed rows the bounds were computed from
    pub employed_rows: usize,
}

/// What each cleaning step removed or changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows handed to the cleaner
    pub rows_in: usize,
    /// Exact duplicates removed
    pub duplicates_removed: usize,
    /// Rows removed for a missing TTFJ or salary
    pub missing_removed: usize,
    /// Rows removed for a negative TTFJ
    pub negative_ttfj_removed: usize,
    /// Rows in the cleaned table
    pub rows_out: usize,
    /// Winsorization bounds, `None` when clipping was skipped
    pub bounds: Option<WinsorBounds>,
    /// Salaries raised to the lower bound
    pub clipped_low: usize,
    /// Salaries lowered to the upper bound
    pub clipped_high: usize,
}

impl CleaningReport {
    /// Total rows removed.
    pub const fn rows_removed(&self) -> usize {
        self.duplicates_removed + self.missing_removed + self.negative_ttfj_removed
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows in: {}", self.rows_in)?;
        writeln!(f, "  Duplicates removed: {}", self.duplicates_removed)?;
        writeln!(f, "  Missing TTFJ/salary removed: {}", self.missing_removed)?;
        writeln!(f, "  Negative TTFJ removed: {}", self.negative_ttfj_removed)?;
        writeln!(
            f,
            "Rows out: {} ({} removed)",
            self.rows_out,
            self.rows_removed()
        )?;
        match &self.bounds {
            Some(b) => writeln!(
                f,
                "Salary winsorized to [{:.0}, {:.0}] from {} employed rows ({} raised, {} lowered)",
                b.lower, b.upper, b.employed_rows, self.clipped_low, self.clipped_high
            ),
            None => writeln!(f, "Salary winsorization skipped: no employed rows"),
        }
    }
}

/// Clean a raw table with the given configuration.
///
/// The input must carry at least the status, TTFJ and salary columns.
pub fn clean(df: &DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    clean_with_report(df, config).map(|(cleaned, _)| cleaned)
}

/// Clean a raw table and report what each step did.
pub fn clean_with_report(
    df: &DataFrame,
    config: &PipelineConfig,
) -> Result<(DataFrame, CleaningReport)> {
    let rows_in = df.height();

    let deduped = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    // NaN counts as missing alongside null
    let complete = deduped
        .clone()
        .lazy()
        .filter(
            col(TTFJ)
                .is_not_null()
                .and(col(SALARY).is_not_null())
                .and(numeric(TTFJ).is_not_nan())
                .and(numeric(SALARY).is_not_nan()),
        )
        .collect()?;

    let valid = complete
        .clone()
        .lazy()
        .filter(numeric(TTFJ).gt_eq(lit(0.0)))
        .collect()?;

    let bounds = winsor_bounds(&valid, config)?;
    let (cleaned, clipped_low, clipped_high) = match bounds {
        Some(b) => winsorize_salary(valid.clone(), &b)?,
        None => {
            tracing::debug!("no employed rows, salary winsorization skipped");
            (valid.clone(), 0, 0)
        }
    };

    let report = CleaningReport {
        rows_in,
        duplicates_removed: rows_in - deduped.height(),
        missing_removed: deduped.height() - complete.height(),
        negative_ttfj_removed: complete.height() - valid.height(),
        rows_out: cleaned.height(),
        bounds,
        clipped_low,
        clipped_high,
    };

    tracing::info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        duplicates = report.duplicates_removed,
        clipped = report.clipped_low + report.clipped_high,
        "cleaned dataset"
    );

    Ok((cleaned, report))
}

/// Salary quantiles of the employed subpopulation, `None` when it is empty.
pub fn winsor_bounds(df: &DataFrame, config: &PipelineConfig) -> Result<Option<WinsorBounds>> {
    let stats = df
        .clone()
        .lazy()
        .filter(working(config))
        .select([
            numeric(SALARY)
                .quantile(lit(config.winsor_lower), QuantileMethod::Linear)
                .alias("lower"),
            numeric(SALARY)
                .quantile(lit(config.winsor_upper), QuantileMethod::Linear)
                .alias("upper"),
            numeric(SALARY)
                .count()
                .cast(DataType::UInt64)
                .alias("employed"),
        ])
        .collect()?;

    let lower = stats.column("lower")?.f64()?.get(0);
    let upper = stats.column("upper")?.f64()?.get(0);
    let employed_rows = stats.column("employed")?.u64()?.get(0).unwrap_or(0) as usize;

    Ok(match (lower, upper) {
        (Some(lower), Some(upper)) if employed_rows > 0 => Some(WinsorBounds {
            lower,
            upper,
            employed_rows,
        }),
        _ => None,
    })
}

fn winsorize_salary(df: DataFrame, bounds: &WinsorBounds) -> Result<(DataFrame, usize, usize)> {
    let counts = df
        .clone()
        .lazy()
        .select([
            numeric(SALARY)
                .lt(lit(bounds.lower))
                .cast(DataType::UInt64)
                .sum()
                .alias("low"),
            numeric(SALARY)
                .gt(lit(bounds.upper))
                .cast(DataType::UInt64)
                .sum()
                .alias("high"),
        ])
        .collect()?;
    let low = counts.column("low")?.u64()?.get(0).unwrap_or(0) as usize;
    let high = counts.column("high")?.u64()?.get(0).unwrap_or(0) as usize;

    let clipped = df
        .lazy()
        .with_columns([when(numeric(SALARY).lt(lit(bounds.lower)))
            .then(lit(bounds.lower))
            .when(numeric(SALARY).gt(lit(bounds.upper)))
            .then(lit(bounds.upper))
            .otherwise(numeric(SALARY))
            .alias(SALARY)])
        .collect()?;

    Ok((clipped, low, high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 21 employed rows with salaries 1..=21 million, plus one unemployed outlier.
    fn salary_frame() -> DataFrame {
        let n = 22;
        let ids: Vec<String> = (0..n).map(|i| format!("A{i:03}")).collect();
        let mut statuses = vec!["Bekerja"; n - 1];
        statuses.push("Studi Lanjut");
        let ttfj: Vec<f64> = (0..n).map(|i| (i % 7) as f64).collect();
        let mut salary: Vec<f64> = (1..n).map(|i| i as f64 * 1.0e6).collect();
        salary.push(90.0e6);

        df! {
            "alumni_id" => ids,
            "status_saat_ini" => statuses,
            "ttfj_bulan" => ttfj,
            "gaji_awal_idr" => salary,
        }
        .unwrap()
    }

    fn salaries(df: &DataFrame) -> Vec<f64> {
        df.column(SALARY).unwrap().f64().unwrap().into_no_null_iter().collect()
    }

    #[test]
    fn test_removes_duplicates_missing_and_negative() {
        let df = df! {
            "alumni_id" => ["a", "a", "b", "c", "d"],
            "status_saat_ini" => ["Bekerja", "Bekerja", "Bekerja", "Bekerja", "Bekerja"],
            "ttfj_bulan" => [Some(3.0), Some(3.0), Some(-1.0), None, Some(10.0)],
            "gaji_awal_idr" => [Some(5.0e6), Some(5.0e6), Some(6.0e6), Some(7.0e6), Some(8.0e6)],
        }
        .unwrap();

        let (cleaned, report) = clean_with_report(&df, &PipelineConfig::default()).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.missing_removed, 1);
        assert_eq!(report.negative_ttfj_removed, 1);
        assert_eq!(report.rows_removed(), 3);
        let ids = cleaned.column("alumni_id").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("a"));
        assert_eq!(ids.get(1), Some("d"));
    }

    #[test]
    fn test_bounds_from_employed_subpopulation() {
        let bounds = winsor_bounds(&salary_frame(), &PipelineConfig::default())
            .unwrap()
            .unwrap();
        // rank 0.05 * 20 = 1 and 0.95 * 20 = 19 land on sample points
        assert_relative_eq!(bounds.lower, 2.0e6);
        assert_relative_eq!(bounds.upper, 20.0e6);
        assert_eq!(bounds.employed_rows, 21);
    }

    #[test]
    fn test_bounds_applied_to_every_row() {
        let (cleaned, report) =
            clean_with_report(&salary_frame(), &PipelineConfig::default()).unwrap();
        let values = salaries(&cleaned);

        assert_relative_eq!(values[0], 2.0e6);
        let inside: Vec<f64> = (2..=20).map(|i| i as f64 * 1.0e6).collect();
        assert_eq!(values[1..20], inside[..]);
        assert_relative_eq!(values[20], 20.0e6);
        // unemployed outlier clamped to the employed upper bound
        assert_relative_eq!(values[21], 20.0e6);
        assert_eq!(report.clipped_low, 1);
        assert_eq!(report.clipped_high, 2);
        for v in values {
            assert!((2.0e6..=20.0e6).contains(&v));
        }
    }

    #[test]
    fn test_clean_is_idempotent() {
        let config = PipelineConfig::default();
        let once = clean(&salary_frame(), &config).unwrap();
        let twice = clean(&once, &config).unwrap();

        assert_eq!(once.height(), twice.height());
        assert_eq!(salaries(&once), salaries(&twice));
    }

    #[test]
    fn test_no_employed_rows_skips_clipping() {
        let df = df! {
            "alumni_id" => ["a", "b"],
            "status_saat_ini" => ["Studi Lanjut", "Belum Bekerja"],
            "ttfj_bulan" => [1.0, 2.0],
            "gaji_awal_idr" => [1.0, 1.0e9],
        }
        .unwrap();

        let (cleaned, report) = clean_with_report(&df, &PipelineConfig::default()).unwrap();
        assert!(report.bounds.is_none());
        assert_eq!(salaries(&cleaned), vec![1.0, 1.0e9]);
        assert!(report.to_string().contains("skipped"));
    }

    #[test]
    fn test_empty_table_cleans_to_empty() {
        let df = salary_frame().head(Some(0));
        let (cleaned, report) = clean_with_report(&df, &PipelineConfig::default()).unwrap();
        assert_eq!(cleaned.height(), 0);
        assert!(report.bounds.is_none());
    }
}
