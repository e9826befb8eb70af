//! Timestamped JSON reports.
//!
//! A report pairs one [`Analysis`] with the narrative derived from it, so a
//! consumer of the JSON document sees the same findings the terminal shows.

use crate::analysis::Analysis;
use crate::narrative::Findings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A tracer study report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Dataset the report describes
    pub source: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Respondents left after cleaning
    pub respondents: usize,
    /// Executive summary, findings and recommendations
    pub findings: Option<Findings>,
    /// Every computed metric
    pub analysis: Analysis,
}

impl Report {
    /// Report on an analysis, findings included, stamped with the current time.
    pub fn from_analysis(analysis: &Analysis) -> Self {
        ReportBuilder::new(analysis).build()
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for [`Report`].
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    analysis: &'a Analysis,
    findings: bool,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> ReportBuilder<'a> {
    /// Start a report on `analysis`. Findings are included by default.
    pub const fn new(analysis: &'a Analysis) -> Self {
        Self {
            analysis,
            findings: true,
            generated_at: None,
        }
    }

    /// Include or leave out the narrative findings.
    pub const fn findings(mut self, include: bool) -> Self {
        self.findings = include;
        self
    }

    /// Fix the generation time instead of using the current time.
    pub const fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Build the report.
    pub fn build(self) -> Report {
        Report {
            source: self.analysis.source.clone(),
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            respondents: self.analysis.summary.total_respondents,
            findings: self
                .findings
                .then(|| Findings::from_analysis(self.analysis)),
            analysis: self.analysis.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_analysis;
    use chrono::TimeZone;

    #[test]
    fn test_report_from_analysis() {
        let analysis = sample_analysis();
        let report = Report::from_analysis(&analysis);

        assert_eq!(report.source, "tracer_study.csv");
        assert_eq!(report.respondents, 100);
        assert_eq!(report.analysis, analysis);
        assert_eq!(report.findings.unwrap().recommendations.len(), 3);
    }

    #[test]
    fn test_builder_without_findings() {
        let at = Utc.with_ymd_and_hms(2024, 8, 17, 9, 0, 0).unwrap();
        let report = ReportBuilder::new(&sample_analysis())
            .findings(false)
            .generated_at(at)
            .build();

        assert!(report.findings.is_none());
        assert_eq!(report.generated_at, at);
    }

    #[test]
    fn test_json_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 8, 17, 9, 0, 0).unwrap();
        let report = ReportBuilder::new(&sample_analysis())
            .generated_at(at)
            .build();

        let json = report.to_json().unwrap();
        assert!(json.contains("\"generated_at\": \"2024-08-17T09:00:00Z\""));
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source, report.source);
        assert_eq!(back.findings, report.findings);
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!("tracer-report-{}.json", std::process::id()));
        Report::from_analysis(&sample_analysis())
            .write_to_file(&path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["analysis"]["comparison"]["ttfj_median_interned"], 2.5);
        std::fs::remove_file(path).ok();
    }
}
