//! One end-to-end run: validate, clean, measure.

use crate::error::Result;
use polars::prelude::DataFrame;
use tracer_data::{QualityReport, REQUIRED_COLUMNS, validate};
use tracer_metrics::clean::clean_with_report;
use tracer_metrics::{
    BreakdownPass, ComparisonPass, MetricPass, PerformancePass, PipelineConfig, SummaryPass,
};
use tracer_output::Analysis;

/// Runs the cleaner and every metric pass over a raw table.
///
/// The raw table is never modified; cleaning works on a copy and each pass
/// reads the cleaned table independently.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    source: String,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub const fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            source: String::new(),
        }
    }

    /// Label the analysis with where the raw table came from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Validate, clean and compute every metric.
    pub fn run(&self, raw: &DataFrame) -> Result<Analysis> {
        validate(raw, REQUIRED_COLUMNS)?;

        let (cleaned, cleaning) = clean_with_report(raw, &self.config)?;
        tracing::info!(
            rows_in = cleaning.rows_in,
            rows_out = cleaning.rows_out,
            "dataset cleaned"
        );
        let quality = QualityReport::from_frames(raw, &cleaned)?;

        let summary = SummaryPass::new(self.config.clone()).run(&cleaned)?;
        let performance = PerformancePass::new(self.config.clone()).run(&cleaned)?;
        let comparison = ComparisonPass.run(&cleaned)?;
        let breakdowns = BreakdownPass::new(self.config.clone()).run(&cleaned)?;
        tracing::info!(source = %self.source, respondents = summary.total_respondents, "analysis complete");

        Ok(Analysis {
            source: self.source.clone(),
            config: self.config.clone(),
            quality,
            cleaning,
            summary,
            performance,
            comparison,
            breakdowns,
        })
    }

    /// Data quality of the raw table alongside its cleaned form.
    pub fn quality(&self, raw: &DataFrame) -> Result<QualityReport> {
        validate(raw, REQUIRED_COLUMNS)?;
        let (cleaned, _) = clean_with_report(raw, &self.config)?;
        Ok(QualityReport::from_frames(raw, &cleaned)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn raw_table() -> DataFrame {
        df! {
            "alumni_id" => ["A1", "A1", "A2", "A3"],
            "angkatan_lulus" => ["2020", "2020", "2021", "2021"],
            "status_saat_ini" => ["Bekerja", "Bekerja", "Wirausaha", "Studi Lanjut"],
            "ipk" => [3.2, 3.2, 3.6, 3.8],
            "magang" => [1.0, 1.0, 0.0, 1.0],
            "sertifikasi" => [0.0, 0.0, 1.0, 1.0],
            "projects_count" => [2.0, 2.0, 4.0, 1.0],
            "ttfj_bulan" => [3.0, 3.0, 8.0, 1.0],
            "gaji_awal_idr" => [5.0e6, 5.0e6, 9.0e6, 4.0e6],
            "kesesuaian_bidang_1_5" => [4.0, 4.0, 3.0, 5.0],
            "relevansi_kurikulum_1_5" => [4.0, 4.0, 3.0, 5.0],
            "sektor" => ["TIK", "TIK", "Energi", "Pendidikan"],
            "level_jabatan" => ["Junior", "Junior", "Senior", "Intern"],
            "nps_0_10" => [9.0, 9.0, 5.0, 10.0],
        }
        .unwrap()
    }

    #[test]
    fn test_run_fills_every_section() {
        let raw = raw_table();
        let analysis = Pipeline::default()
            .with_source("memory")
            .run(&raw)
            .unwrap();

        assert_eq!(analysis.source, "memory");
        assert_eq!(analysis.cleaning.duplicates_removed, 1);
        assert_eq!(analysis.summary.total_respondents, 3);
        assert_eq!(analysis.performance.employed_respondents, 2);
        assert_eq!(analysis.quality.raw_rows, 4);
        assert_eq!(analysis.quality.cleaned_rows, Some(3));
        assert_eq!(raw.height(), 4);
    }

    #[test]
    fn test_quality_matches_run() {
        let raw = raw_table();
        let pipeline = Pipeline::new(PipelineConfig::default());
        let quality = pipeline.quality(&raw).unwrap();
        assert_eq!(quality, pipeline.run(&raw).unwrap().quality);
        assert_eq!(quality.duplicate_rows, 1);
    }

    #[test]
    fn test_missing_column_rejected_before_cleaning() {
        let raw = raw_table().drop("nps_0_10").unwrap();
        let err = Pipeline::default().run(&raw).unwrap_err();
        assert_eq!(err.missing_columns().unwrap(), ["nps_0_10".to_string()]);
    }
}
