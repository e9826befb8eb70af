//! Text and Markdown rendering.

use crate::analysis::Analysis;
use crate::narrative::Findings;
use crate::report::{Report, ReportError};
use std::str::FromStr;
use thiserror::Error;
use tracer_data::QualityReport;
use tracer_metrics::{
    Breakdowns, CleaningReport, ColumnDescription, ComparisonMetrics, PerformanceMetrics,
    SummaryMetrics,
};

const WIDTH: usize = 80;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON rendering failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Unknown output format name.
    #[error("Unknown output format '{0}' (expected text, markdown or json)")]
    UnknownFormat(String),
}

/// How an analysis is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain-text tables for the terminal.
    #[default]
    Text,
    /// Markdown document.
    Markdown,
    /// Timestamped JSON report.
    Json,
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

/// Terminal and Markdown rendering of a result.
pub trait Render {
    /// Format as ASCII table for terminal display.
    fn to_ascii_table(&self) -> String;

    /// Format as Markdown for documentation.
    fn to_markdown(&self) -> String;
}

/// Render an analysis together with its narrative findings.
pub fn render(analysis: &Analysis, format: OutputFormat) -> Result<String, RenderError> {
    let findings = Findings::from_analysis(analysis);
    match format {
        OutputFormat::Text => Ok(format!(
            "{}{}",
            analysis.to_ascii_table(),
            findings.to_ascii_table()
        )),
        OutputFormat::Markdown => Ok(format!(
            "{}\n{}",
            analysis.to_markdown(),
            findings.to_markdown()
        )),
        OutputFormat::Json => Ok(Report::from_analysis(analysis).to_json()?),
    }
}

/// Format an amount in Indonesian rupiah, e.g. `Rp 7.500.000`.
pub fn format_idr(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}Rp {}", sign, grouped)
}

pub(crate) fn rule(ch: char) -> String {
    let mut line: String = std::iter::repeat_n(ch, WIDTH).collect();
    line.push('\n');
    line
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

fn opt_idr(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_idr)
}

impl Render for QualityReport {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nData Quality\n");
        output.push_str(&rule('='));
        output.push_str(&format!(
            "  Raw dataset:              {} rows x {} columns\n",
            self.raw_rows, self.raw_columns
        ));
        output.push_str(&format!(
            "  Duplicate rows:           {}\n",
            self.duplicate_rows
        ));
        if let (Some(rows), Some(cols)) = (self.cleaned_rows, self.cleaned_columns) {
            output.push_str(&format!(
                "  Cleaned dataset:          {} rows x {} columns\n",
                rows, cols
            ));
        }
        if let Some(removed) = self.rows_removed() {
            output.push_str(&format!("  Rows removed:             {}\n", removed));
        }
        if self.missing.is_empty() {
            output.push_str("  No missing values detected\n");
        } else {
            output.push_str("\nMissing Values:\n");
            output.push_str(&rule('-'));
            for m in &self.missing {
                output.push_str(&format!("  {:<32} {:>8}\n", m.column, m.count));
            }
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("## Data Quality\n\n");
        output.push_str(&format!(
            "- **Raw dataset:** {} rows x {} columns\n",
            self.raw_rows, self.raw_columns
        ));
        output.push_str(&format!("- **Duplicate rows:** {}\n", self.duplicate_rows));
        if let (Some(rows), Some(cols)) = (self.cleaned_rows, self.cleaned_columns) {
            output.push_str(&format!(
                "- **Cleaned dataset:** {} rows x {} columns\n",
                rows, cols
            ));
        }
        if let Some(removed) = self.rows_removed() {
            output.push_str(&format!("- **Rows removed:** {}\n", removed));
        }
        if !self.missing.is_empty() {
            output.push_str("\n| Column | Missing |\n|--------|---------|\n");
            for m in &self.missing {
                output.push_str(&format!("| {} | {} |\n", m.column, m.count));
            }
        }
        output.push('\n');
        output
    }
}

impl Render for CleaningReport {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nCleaning\n");
        output.push_str(&rule('-'));
        for line in self.to_string().lines() {
            output.push_str(&format!("  {}\n", line));
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("## Cleaning\n\n");
        for line in self.to_string().lines() {
            output.push_str(&format!("- {}\n", line.trim()));
        }
        output.push('\n');
        output
    }
}

fn description_row(d: &ColumnDescription) -> String {
    if d.is_numeric() {
        format!(
            "{:<26} {:>6} {:>14} {:>14} {:>14}\n",
            d.column,
            d.count,
            opt(d.mean, 2),
            opt(d.median, 2),
            format!("{}..{}", opt(d.min, 1), opt(d.max, 1))
        )
    } else {
        format!(
            "{:<26} {:>6} {:>14} {:>14} {:>14}\n",
            d.column,
            d.count,
            d.unique.map_or_else(String::new, |u| format!("{} unique", u)),
            d.top.clone().unwrap_or_default(),
            d.freq.map_or_else(String::new, |f| format!("x{}", f))
        )
    }
}

impl Render for SummaryMetrics {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nSummary\n");
        output.push_str(&rule('='));
        output.push_str(&format!(
            "  Total respondents:        {}\n",
            self.total_respondents
        ));
        output.push_str(&format!(
            "  GPA median:               {}\n",
            opt(self.ipk_median, 2)
        ));
        output.push_str(&format!(
            "  TTFJ median (employed):   {} months\n",
            opt(self.ttfj_median_employed, 2)
        ));
        output.push_str(&format!(
            "  Salary median (employed): {}\n",
            opt_idr(self.salary_median_employed)
        ));

        output.push_str("\nStatus Distribution:\n");
        output.push_str(&rule('-'));
        for status in &self.status_distribution {
            output.push_str(&format!(
                "  {:<32} {:>8} {:>7.1}%\n",
                status.category,
                status.count,
                self.status_share(&status.category)
            ));
        }

        if !self.description.is_empty() {
            output.push_str("\nColumns:\n");
            output.push_str(&rule('-'));
            output.push_str(&format!(
                "{:<26} {:>6} {:>14} {:>14} {:>14}\n",
                "Column", "Count", "Mean/Unique", "Median/Top", "Range/Freq"
            ));
            for d in &self.description {
                output.push_str(&description_row(d));
            }
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "- **Total respondents:** {}\n",
            self.total_respondents
        ));
        output.push_str(&format!(
            "- **GPA median:** {}\n",
            opt(self.ipk_median, 2)
        ));
        output.push_str(&format!(
            "- **TTFJ median (employed):** {} months\n",
            opt(self.ttfj_median_employed, 2)
        ));
        output.push_str(&format!(
            "- **Salary median (employed):** {}\n\n",
            opt_idr(self.salary_median_employed)
        ));

        output.push_str("| Status | Count | Share |\n|--------|-------|-------|\n");
        for status in &self.status_distribution {
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                status.category,
                status.count,
                self.status_share(&status.category)
            ));
        }
        output.push('\n');
        output
    }
}

impl Render for PerformanceMetrics {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nPerformance\n");
        output.push_str(&rule('='));
        output.push_str(&format!(
            "  First job within threshold: {:.2}%\n",
            self.proportion_fast_onboard
        ));
        output.push_str(&format!(
            "  Field fit:                  {:.2}%\n",
            self.proportion_field_fit
        ));
        output.push_str(&format!("  NPS:                        {:.2}\n", self.nps));

        if !self.ttfj_by_cohort.is_empty() {
            output.push_str("\nBy Cohort:\n");
            output.push_str(&rule('-'));
            output.push_str(&format!(
                "{:<12} {:>16} {:>20}\n",
                "Cohort", "Median TTFJ", "Median Salary"
            ));
            for cohort in &self.ttfj_by_cohort {
                let salary = self
                    .salary_by_cohort
                    .iter()
                    .find(|s| s.group == cohort.group)
                    .map(|s| s.median);
                output.push_str(&format!(
                    "{:<12} {:>16.2} {:>20}\n",
                    cohort.group,
                    cohort.median,
                    opt_idr(salary)
                ));
            }
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("## Performance\n\n");
        output.push_str(&format!(
            "- **First job within threshold:** {:.2}%\n",
            self.proportion_fast_onboard
        ));
        output.push_str(&format!(
            "- **Field fit:** {:.2}%\n",
            self.proportion_field_fit
        ));
        output.push_str(&format!("- **NPS:** {:.2}\n\n", self.nps));

        if !self.ttfj_by_cohort.is_empty() {
            output.push_str("| Cohort | Median TTFJ | Median Salary |\n");
            output.push_str("|--------|-------------|---------------|\n");
            for cohort in &self.ttfj_by_cohort {
                let salary = self
                    .salary_by_cohort
                    .iter()
                    .find(|s| s.group == cohort.group)
                    .map(|s| s.median);
                output.push_str(&format!(
                    "| {} | {:.2} | {} |\n",
                    cohort.group,
                    cohort.median,
                    opt_idr(salary)
                ));
            }
            output.push('\n');
        }
        output
    }
}

impl Render for ComparisonMetrics {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nComparison\n");
        output.push_str(&rule('='));
        output.push_str(&format!(
            "  TTFJ median, internship:    {} months\n",
            opt(self.ttfj_median_interned, 2)
        ));
        output.push_str(&format!(
            "  TTFJ median, no internship: {} months\n",
            opt(self.ttfj_median_not_interned, 2)
        ));

        if !self.salary_by_level.is_empty() {
            output.push_str("\nStarting Salary by Job Level:\n");
            output.push_str(&rule('-'));
            for level in &self.salary_by_level {
                output.push_str(&format!(
                    "  {:<30} {:>20}\n",
                    level.group,
                    format_idr(level.median)
                ));
            }
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("## Comparison\n\n");
        output.push_str(&format!(
            "- **TTFJ median, internship:** {} months\n",
            opt(self.ttfj_median_interned, 2)
        ));
        output.push_str(&format!(
            "- **TTFJ median, no internship:** {} months\n\n",
            opt(self.ttfj_median_not_interned, 2)
        ));
        if !self.salary_by_level.is_empty() {
            output.push_str("| Job Level | Median Salary |\n|-----------|---------------|\n");
            for level in &self.salary_by_level {
                output.push_str(&format!(
                    "| {} | {} |\n",
                    level.group,
                    format_idr(level.median)
                ));
            }
            output.push('\n');
        }
        output
    }
}

impl Render for Breakdowns {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        if !self.field_fit_by_sector.is_empty() {
            output.push_str("\nField Fit by Sector:\n");
            output.push_str(&rule('-'));
            for sector in &self.field_fit_by_sector {
                output.push_str(&format!(
                    "  {:<30} {:>7.1}% ({} respondents)\n",
                    sector.group, sector.percent, sector.respondents
                ));
            }
        }

        let peak = self
            .ttfj_histogram
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0);
        if peak > 0 {
            output.push_str("\nTime to First Job (employed):\n");
            output.push_str(&rule('-'));
            for bin in &self.ttfj_histogram {
                let bar = "#".repeat(bin.count * 40 / peak);
                output.push_str(&format!(
                    "  {:>6.1} - {:<6.1} {:>5} {}\n",
                    bin.lower, bin.upper, bin.count, bar
                ));
            }
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        if !self.field_fit_by_sector.is_empty() {
            output.push_str("## Field Fit by Sector\n\n");
            output.push_str("| Sector | Field Fit | Respondents |\n");
            output.push_str("|--------|-----------|-------------|\n");
            for sector in &self.field_fit_by_sector {
                output.push_str(&format!(
                    "| {} | {:.1}% | {} |\n",
                    sector.group, sector.percent, sector.respondents
                ));
            }
            output.push('\n');
        }
        if !self.ttfj_histogram.is_empty() {
            output.push_str("## Time to First Job\n\n");
            output.push_str("| Months | Alumni |\n|--------|--------|\n");
            for bin in &self.ttfj_histogram {
                output.push_str(&format!(
                    "| {:.1} - {:.1} | {} |\n",
                    bin.lower, bin.upper, bin.count
                ));
            }
            output.push('\n');
        }
        output
    }
}

impl Render for Analysis {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("\nTracer Study Analysis: {}\n", self.source));
        output.push_str(&rule('='));
        output.push_str(&self.quality.to_ascii_table());
        output.push_str(&self.cleaning.to_ascii_table());
        output.push_str(&self.summary.to_ascii_table());
        output.push_str(&self.performance.to_ascii_table());
        output.push_str(&self.comparison.to_ascii_table());
        output.push_str(&self.breakdowns.to_ascii_table());
        output.push_str(&rule('='));
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("# Tracer Study Analysis: {}\n\n", self.source));
        output.push_str(&self.quality.to_markdown());
        output.push_str(&self.cleaning.to_markdown());
        output.push_str(&self.summary.to_markdown());
        output.push_str(&self.performance.to_markdown());
        output.push_str(&self.comparison.to_markdown());
        output.push_str(&self.breakdowns.to_markdown());
        output
    }
}
