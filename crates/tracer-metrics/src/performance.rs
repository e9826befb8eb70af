//! Performance pass
//!
//! Onboarding speed, field fit and promoter score. Proportions are percentages
//! of the employed subpopulation; when nobody is employed the denominator is 1
//! and the proportions are 0. The NPS is taken over every respondent.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pass::MetricPass;
use crate::stats::{GroupMedian, compare_labels, ensure_rows, grouped_medians, numeric, working};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracer_data::schema::columns::{COHORT, FIELD_FIT, NPS, SALARY, STATUS, TTFJ};

/// Output of the performance pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Rows in the cleaned table
    pub total_respondents: usize,
    /// Rows in the employed subpopulation
    pub employed_respondents: usize,
    /// Percentage of employed respondents with a first job within the threshold
    pub proportion_fast_onboard: f64,
    /// Median months to first job per cohort, in cohort order
    pub ttfj_by_cohort: Vec<GroupMedian>,
    /// Median starting salary per cohort, in cohort order
    pub salary_by_cohort: Vec<GroupMedian>,
    /// Percentage of employed respondents whose job fits their field
    pub proportion_field_fit: f64,
    /// Promoters minus detractors as a percentage of all respondents
    pub nps: f64,
}

impl PerformanceMetrics {
    /// Cohort with the lowest median time to first job.
    pub fn fastest_cohort(&self) -> Option<&GroupMedian> {
        self.ttfj_by_cohort
            .iter()
            .min_by(|a, b| a.median.total_cmp(&b.median))
    }

    /// Cohort with the highest median starting salary.
    pub fn best_paid_cohort(&self) -> Option<&GroupMedian> {
        self.salary_by_cohort
            .iter()
            .max_by(|a, b| a.median.total_cmp(&b.median))
    }

    /// Starting salary trend across cohorts.
    pub fn salary_trend(&self) -> &[GroupMedian] {
        &self.salary_by_cohort
    }
}

/// Computes [`PerformanceMetrics`]
#[derive(Debug, Clone, Default)]
pub struct PerformancePass {
    config: PipelineConfig,
}

impl PerformancePass {
    /// Create a performance pass
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }
}

impl MetricPass for PerformancePass {
    type Output = PerformanceMetrics;

    fn name(&self) -> &'static str {
        "performance"
    }

    fn required_columns(&self) -> &[&'static str] {
        &[COHORT, STATUS, TTFJ, SALARY, FIELD_FIT, NPS]
    }

    fn compute(&self, df: &DataFrame) -> Result<PerformanceMetrics> {
        ensure_rows(df, self.name())?;
        let cfg = &self.config;
        let flag = |e: Expr, alias: &str| e.cast(DataType::UInt64).sum().alias(alias);

        let counts = df
            .clone()
            .lazy()
            .select([
                flag(working(cfg), "employed"),
                flag(
                    working(cfg).and(numeric(TTFJ).lt_eq(lit(cfg.fast_onboard_months))),
                    "fast",
                ),
                flag(
                    working(cfg).and(numeric(FIELD_FIT).gt_eq(lit(cfg.field_fit_min))),
                    "fit",
                ),
                flag(numeric(NPS).gt_eq(lit(cfg.promoter_min)), "promoters"),
                flag(numeric(NPS).lt_eq(lit(cfg.detractor_max)), "detractors"),
            ])
            .collect()?;

        let count = |name: &str| -> Result<f64> {
            Ok(counts.column(name)?.u64()?.get(0).unwrap_or(0) as f64)
        };
        let employed = count("employed")?;
        let denominator = if employed > 0.0 { employed } else { 1.0 };
        let total = df.height() as f64;

        let mut ttfj_by_cohort = grouped_medians(df.clone().lazy(), COHORT, TTFJ)?;
        ttfj_by_cohort.sort_by(|a, b| compare_labels(&a.group, &b.group));
        let mut salary_by_cohort = grouped_medians(df.clone().lazy(), COHORT, SALARY)?;
        salary_by_cohort.sort_by(|a, b| compare_labels(&a.group, &b.group));

        let metrics = PerformanceMetrics {
            total_respondents: df.height(),
            employed_respondents: employed as usize,
            proportion_fast_onboard: count("fast")? / denominator * 100.0,
            ttfj_by_cohort,
            salary_by_cohort,
            proportion_field_fit: count("fit")? / denominator * 100.0,
            nps: (count("promoters")? - count("detractors")?) / total * 100.0,
        };

        tracing::debug!(
            employed = metrics.employed_respondents,
            fast_onboard = metrics.proportion_fast_onboard,
            nps = metrics.nps,
            "performance metrics"
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn frame(statuses: [&str; 4], nps: [f64; 4]) -> DataFrame {
        df! {
            "angkatan_lulus" => ["2021", "2020", "2021", "2019"],
            "status_saat_ini" => statuses,
            "ttfj_bulan" => [3.0, 10.0, 6.0, 1.0],
            "gaji_awal_idr" => [5.0e6, 8.0e6, 7.0e6, 4.0e6],
            "kesesuaian_bidang_1_5" => [5.0, 2.0, 4.0, 3.0],
            "nps_0_10" => nps,
        }
        .unwrap()
    }

    #[test]
    fn test_proportions_over_employed() {
        let df = frame(
            ["Bekerja", "Bekerja", "Wirausaha", "Studi Lanjut"],
            [10.0, 9.0, 7.0, 3.0],
        );
        let m = PerformancePass::default().run(&df).unwrap();

        assert_eq!(m.employed_respondents, 3);
        // ttfj 3 and 6 are within six months, 10 is not
        assert_relative_eq!(m.proportion_fast_onboard, 200.0 / 3.0);
        assert_relative_eq!(m.proportion_field_fit, 200.0 / 3.0);
        // 2 promoters, 1 detractor, 4 respondents
        assert_relative_eq!(m.nps, 25.0);
    }

    #[test]
    fn test_cohorts_in_order() {
        let df = frame(["Bekerja"; 4], [9.0; 4]);
        let m = PerformancePass::default().run(&df).unwrap();

        let cohorts: Vec<&str> = m.ttfj_by_cohort.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(cohorts, vec!["2019", "2020", "2021"]);
        assert_relative_eq!(m.ttfj_by_cohort[2].median, 4.5);
        assert_eq!(m.fastest_cohort().unwrap().group, "2019");
        assert_eq!(m.best_paid_cohort().unwrap().group, "2020");
        assert_eq!(m.salary_trend().len(), 3);
    }

    #[test]
    fn test_no_employed_rows_gives_zero_proportions() {
        let df = frame(["Studi Lanjut"; 4], [0.0; 4]);
        let m = PerformancePass::default().run(&df).unwrap();

        assert_eq!(m.proportion_fast_onboard, 0.0);
        assert_eq!(m.proportion_field_fit, 0.0);
        assert_relative_eq!(m.nps, -100.0);
    }

    #[rstest]
    #[case([10.0; 4], 100.0)]
    #[case([6.0; 4], -100.0)]
    #[case([7.0, 8.0, 9.0, 5.0], 0.0)]
    fn test_nps_bounds(#[case] nps: [f64; 4], #[case] expected: f64) {
        let df = frame(["Bekerja"; 4], nps);
        let m = PerformancePass::default().run(&df).unwrap();
        assert_relative_eq!(m.nps, expected);
        assert!((-100.0..=100.0).contains(&m.nps));
    }

    #[test]
    fn test_empty_table_is_error() {
        let df = frame(["Bekerja"; 4], [9.0; 4]).head(Some(0));
        let err = PerformancePass::default().run(&df).unwrap_err();
        assert!(matches!(err, MetricsError::EmptyDataset { pass: "performance" }));
    }
}
