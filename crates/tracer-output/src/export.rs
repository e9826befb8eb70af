//! CSV and JSON export of analysis results.
//!
//! Grouped series (cohort and level medians, sector shares, status counts,
//! histogram bins) export one row per group. A whole [`Analysis`] exports as
//! JSON, or as flat `section,metric,value` rows for CSV.

use crate::analysis::Analysis;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracer_metrics::{CategoryCount, GroupMedian, GroupShare, HistogramBin};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer produced invalid UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(format!(
                "cannot infer export format from extension {:?}",
                other.unwrap_or("")
            ))),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn records_to_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    Ok(String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?)
}

fn export_records<T: Serialize>(records: &[T], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => records_to_csv(records),
        ExportFormat::Json => Ok(serde_json::to_string(records)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(records)?),
    }
}

impl Exporter for Vec<GroupMedian> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

impl Exporter for Vec<GroupShare> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

impl Exporter for Vec<CategoryCount> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

impl Exporter for Vec<HistogramBin> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

/// Flattened analysis metric for CSV export.
#[derive(Debug, Serialize, Deserialize)]
struct MetricRecord {
    section: String,
    metric: String,
    value: String,
}

impl MetricRecord {
    fn new(section: &str, metric: impl Into<String>, value: impl ToString) -> Self {
        Self {
            section: section.to_string(),
            metric: metric.into(),
            value: value.to_string(),
        }
    }

    fn optional(section: &str, metric: &str, value: Option<f64>) -> Self {
        Self::new(section, metric, value.map(|v| v.to_string()).unwrap_or_default())
    }
}

impl Analysis {
    fn to_flat_records(&self) -> Vec<MetricRecord> {
        let s = &self.summary;
        let p = &self.performance;
        let c = &self.comparison;

        let mut records = vec![
            MetricRecord::new("quality", "raw_rows", self.quality.raw_rows),
            MetricRecord::new("quality", "duplicate_rows", self.quality.duplicate_rows),
            MetricRecord::new("quality", "total_missing", self.quality.total_missing()),
            MetricRecord::new("cleaning", "rows_out", self.cleaning.rows_out),
            MetricRecord::optional(
                "cleaning",
                "winsor_lower",
                self.cleaning.bounds.map(|b| b.lower),
            ),
            MetricRecord::optional(
                "cleaning",
                "winsor_upper",
                self.cleaning.bounds.map(|b| b.upper),
            ),
            MetricRecord::new("summary", "total_respondents", s.total_respondents),
            MetricRecord::optional("summary", "ipk_median", s.ipk_median),
            MetricRecord::optional("summary", "ttfj_median_employed", s.ttfj_median_employed),
            MetricRecord::optional(
                "summary",
                "salary_median_employed",
                s.salary_median_employed,
            ),
        ];
        records.extend(s.status_distribution.iter().map(|cc| {
            MetricRecord::new("summary", format!("status[{}]", cc.category), cc.count)
        }));

        records.extend([
            MetricRecord::new("performance", "employed_respondents", p.employed_respondents),
            MetricRecord::new(
                "performance",
                "proportion_fast_onboard",
                p.proportion_fast_onboard,
            ),
            MetricRecord::new("performance", "proportion_field_fit", p.proportion_field_fit),
            MetricRecord::new("performance", "nps", p.nps),
        ]);
        records.extend(p.ttfj_by_cohort.iter().map(|g| {
            MetricRecord::new("performance", format!("ttfj_by_cohort[{}]", g.group), g.median)
        }));
        records.extend(p.salary_by_cohort.iter().map(|g| {
            MetricRecord::new("performance", format!("salary_by_cohort[{}]", g.group), g.median)
        }));

        records.extend([
            MetricRecord::optional("comparison", "ttfj_median_interned", c.ttfj_median_interned),
            MetricRecord::optional(
                "comparison",
                "ttfj_median_not_interned",
                c.ttfj_median_not_interned,
            ),
        ]);
        records.extend(c.salary_by_level.iter().map(|g| {
            MetricRecord::new("comparison", format!("salary_by_level[{}]", g.group), g.median)
        }));
        records.extend(self.breakdowns.field_fit_by_sector.iter().map(|g| {
            MetricRecord::new("breakdown", format!("field_fit[{}]", g.group), g.percent)
        }));

        records
    }
}

impl Exporter for Analysis {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => records_to_csv(&self.to_flat_records()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_analysis;
    use rstest::rstest;

    #[test]
    fn test_group_medians_csv() {
        let analysis = sample_analysis();
        let csv = analysis
            .performance
            .ttfj_by_cohort
            .export_to_string(ExportFormat::Csv)
            .unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("group,median"));
        assert_eq!(lines.next(), Some("2020,5.0"));
        assert_eq!(lines.next(), Some("2021,3.0"));
    }

    #[test]
    fn test_sector_shares_json() {
        let analysis = sample_analysis();
        let json = analysis
            .breakdowns
            .field_fit_by_sector
            .export_to_string(ExportFormat::Json)
            .unwrap();
        assert!(json.starts_with("[{\"group\":\"TIK\""));
        assert!(json.contains("\"respondents\":40"));
    }

    #[test]
    fn test_analysis_csv_is_flat() {
        let csv = sample_analysis()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.starts_with("section,metric,value\n"));
        assert!(csv.contains("performance,nps,12\n"));
        assert!(csv.contains("comparison,salary_by_level[Senior],11000000\n"));
        assert!(csv.contains("summary,status[Bekerja],70\n"));
    }

    #[test]
    fn test_analysis_json_keeps_structure() {
        let json = sample_analysis()
            .export_to_string(ExportFormat::PrettyJson)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["performance"]["nps"], 12.0);
        assert_eq!(value["summary"]["total_respondents"], 100);
        assert_eq!(value["comparison"]["salary_by_level"][0]["group"], "Intern");
        assert!(value["cleaning"]["bounds"].is_object());
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!("tracer-export-{}.csv", std::process::id()));
        sample_analysis()
            .summary
            .status_distribution
            .export_to_file(&path, ExportFormat::Csv)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Studi Lanjut,20"));
        std::fs::remove_file(path).ok();
    }

    #[rstest]
    #[case("out.csv", Some(ExportFormat::Csv))]
    #[case("out.json", Some(ExportFormat::PrettyJson))]
    #[case("out.xlsx", None)]
    fn test_format_from_extension(#[case] path: &str, #[case] expected: Option<ExportFormat>) {
        assert_eq!(ExportFormat::from_extension(Path::new(path)).ok(), expected);
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
