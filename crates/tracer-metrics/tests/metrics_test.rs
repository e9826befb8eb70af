//! End-to-end tests: clean a raw table, then run every pass over it.

use approx::assert_relative_eq;
use polars::prelude::*;
use tracer_metrics::clean::{clean, clean_with_report};
use tracer_metrics::{
    BreakdownPass, ComparisonPass, MetricPass, MetricsError, PerformancePass, PipelineConfig,
    SummaryPass,
};

fn full_row_frame(
    ids: &[&str],
    statuses: &[&str],
    ttfj: &[f64],
    salary: &[f64],
    magang: &[f64],
) -> DataFrame {
    let n = ids.len();
    df! {
        "alumni_id" => ids,
        "angkatan_lulus" => vec!["2021"; n],
        "status_saat_ini" => statuses,
        "ipk" => vec![3.4; n],
        "magang" => magang,
        "sertifikasi" => vec![1.0; n],
        "projects_count" => vec![2.0; n],
        "ttfj_bulan" => ttfj,
        "gaji_awal_idr" => salary,
        "kesesuaian_bidang_1_5" => vec![4.0; n],
        "relevansi_kurikulum_1_5" => vec![4.0; n],
        "sektor" => vec!["TIK"; n],
        "level_jabatan" => vec!["Junior"; n],
        "nps_0_10" => vec![9.0; n],
    }
    .unwrap()
}

#[test]
fn test_two_row_example() {
    let raw = full_row_frame(
        &["A1", "A2"],
        &["Bekerja", "Bekerja"],
        &[3.0, 10.0],
        &[5.0e6, 9.0e6],
        &[1.0, 0.0],
    );
    let config = PipelineConfig::default();
    let cleaned = clean(&raw, &config).unwrap();

    let performance = PerformancePass::new(config.clone()).run(&cleaned).unwrap();
    assert_relative_eq!(performance.proportion_fast_onboard, 50.0);
    assert_relative_eq!(performance.proportion_field_fit, 100.0);
    assert_relative_eq!(performance.nps, 100.0);

    let comparison = ComparisonPass.run(&cleaned).unwrap();
    assert_relative_eq!(comparison.ttfj_median_interned.unwrap(), 3.0);
    assert_relative_eq!(comparison.ttfj_median_not_interned.unwrap(), 10.0);

    let summary = SummaryPass::new(config).run(&cleaned).unwrap();
    assert_eq!(summary.total_respondents, 2);
    assert_eq!(summary.description.len(), 14);
}

#[test]
fn test_cleaning_invariants() {
    let raw = full_row_frame(
        &["A1", "A1", "A2", "A3", "A4"],
        &["Bekerja", "Bekerja", "Wirausaha", "Bekerja", "Studi Lanjut"],
        &[3.0, 3.0, -1.0, 5.0, 12.0],
        &[5.0e6, 5.0e6, 6.0e6, 7.0e6, 50.0e6],
        &[1.0, 1.0, 0.0, 1.0, 0.0],
    );
    let (cleaned, report) = clean_with_report(&raw, &PipelineConfig::default()).unwrap();

    assert_eq!(cleaned.height(), 3);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.negative_ttfj_removed, 1);

    let ttfj = cleaned.column("ttfj_bulan").unwrap().f64().unwrap();
    assert!(ttfj.min().unwrap() >= 0.0);

    let bounds = report.bounds.unwrap();
    let salary = cleaned.column("gaji_awal_idr").unwrap().f64().unwrap();
    for v in salary.into_no_null_iter() {
        assert!(v >= bounds.lower && v <= bounds.upper);
    }
    // the unemployed outlier is clamped to the employed upper bound
    assert_relative_eq!(salary.get(2).unwrap(), bounds.upper);
}

#[test]
fn test_passes_do_not_mutate_input() {
    let raw = full_row_frame(
        &["A1", "A2", "A3"],
        &["Bekerja", "Wirausaha", "Studi Lanjut"],
        &[1.0, 8.0, 4.0],
        &[4.0e6, 6.0e6, 5.0e6],
        &[1.0, 0.0, 1.0],
    );
    let config = PipelineConfig::default();
    let before = raw.clone();

    SummaryPass::new(config.clone()).run(&raw).unwrap();
    PerformancePass::new(config.clone()).run(&raw).unwrap();
    ComparisonPass.run(&raw).unwrap();
    BreakdownPass::new(config).run(&raw).unwrap();

    assert!(raw.equals_missing(&before));
}

#[test]
fn test_everything_cleaned_away_is_empty_dataset() {
    let raw = full_row_frame(&["A1"], &["Bekerja"], &[-2.0], &[5.0e6], &[1.0]);
    let cleaned = clean(&raw, &PipelineConfig::default()).unwrap();
    assert_eq!(cleaned.height(), 0);

    let err = SummaryPass::default().run(&cleaned).unwrap_err();
    assert!(err.is_empty_dataset());
    let err = ComparisonPass.run(&cleaned).unwrap_err();
    assert!(matches!(err, MetricsError::EmptyDataset { .. }));
    let err = BreakdownPass::default().run(&cleaned).unwrap_err();
    assert!(matches!(err, MetricsError::EmptyDataset { pass: "breakdown" }));
}
