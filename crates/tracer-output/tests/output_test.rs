//! Render and export an analysis computed from a real table.

use polars::prelude::*;
use tracer_data::{QualityReport, REQUIRED_COLUMNS, validate};
use tracer_metrics::clean::clean_with_report;
use tracer_metrics::{
    BreakdownPass, ComparisonPass, MetricPass, PerformancePass, PipelineConfig, SummaryPass,
};
use tracer_output::{
    Analysis, ExportFormat, Exporter, Findings, OutputFormat, Render, Report, render,
};

fn raw_table() -> DataFrame {
    df! {
        "alumni_id" => ["A1", "A2", "A3", "A4", "A5", "A5"],
        "angkatan_lulus" => ["2020", "2020", "2021", "2021", "2022", "2022"],
        "status_saat_ini" => ["Bekerja", "Wirausaha", "Bekerja", "Studi Lanjut", "Bekerja", "Bekerja"],
        "ipk" => [3.2, 3.5, 3.8, 3.9, 3.1, 3.1],
        "magang" => [1.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        "sertifikasi" => [1.0, 0.0, 2.0, 1.0, 0.0, 0.0],
        "projects_count" => [3.0, 1.0, 4.0, 2.0, 1.0, 1.0],
        "ttfj_bulan" => [2.0, 9.0, 3.0, 0.0, 7.0, 7.0],
        "gaji_awal_idr" => [6.5e6, 5.0e6, 8.0e6, 0.0, 5.5e6, 5.5e6],
        "kesesuaian_bidang_1_5" => [5.0, 3.0, 4.0, 1.0, 2.0, 2.0],
        "relevansi_kurikulum_1_5" => [4.0, 3.0, 5.0, 2.0, 3.0, 3.0],
        "sektor" => ["TIK", "Manufaktur", "Energi", "Pendidikan", "TIK", "TIK"],
        "level_jabatan" => ["Junior", "Middle", "Senior", "Intern", "Junior", "Junior"],
        "nps_0_10" => [9.0, 6.0, 10.0, 8.0, 5.0, 5.0],
    }
    .unwrap()
}

fn analyze(raw: &DataFrame) -> Analysis {
    validate(raw, REQUIRED_COLUMNS).unwrap();
    let config = PipelineConfig::default();
    let (cleaned, cleaning) = clean_with_report(raw, &config).unwrap();

    Analysis {
        source: "memory".to_string(),
        quality: QualityReport::from_frames(raw, &cleaned).unwrap(),
        cleaning,
        summary: SummaryPass::new(config.clone()).run(&cleaned).unwrap(),
        performance: PerformancePass::new(config.clone()).run(&cleaned).unwrap(),
        comparison: ComparisonPass.run(&cleaned).unwrap(),
        breakdowns: BreakdownPass::new(config.clone()).run(&cleaned).unwrap(),
        config,
    }
}

#[test]
fn test_text_rendering_of_computed_analysis() {
    let analysis = analyze(&raw_table());
    assert_eq!(analysis.quality.duplicate_rows, 1);
    assert_eq!(analysis.summary.total_respondents, 5);

    let text = render(&analysis, OutputFormat::Text).unwrap();
    assert!(text.contains("Tracer Study Analysis: memory"));
    assert!(text.contains("Executive Summary"));
    assert!(text.contains("Field Fit by Sector"));
}

#[test]
fn test_findings_follow_the_numbers() {
    let analysis = analyze(&raw_table());
    let findings = Findings::from_analysis(&analysis);

    // interns: ttfj 2 and 3; others: 9, 0 and 7
    assert_eq!(analysis.comparison.interns_faster(), Some(true));
    assert!(findings.findings[0].contains("2.5 months vs 7.0 months"));
    assert_eq!(findings.recommendations.len(), 3);
    assert!(findings.to_markdown().contains("### Recommendations"));
}

#[test]
fn test_exports_and_report() {
    let analysis = analyze(&raw_table());

    let cohorts = analysis
        .performance
        .ttfj_by_cohort
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    let groups: Vec<&str> = cohorts
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(groups, vec!["2020", "2021", "2022"]);

    let csv = analysis.export_to_string(ExportFormat::Csv).unwrap();
    assert!(csv.contains("summary,total_respondents,5"));

    let report = Report::from_analysis(&analysis);
    assert_eq!(report.respondents, 5);
    assert!(report.findings.is_some());
    assert!(report.to_json().unwrap().contains("\"breakdowns\""));
}
