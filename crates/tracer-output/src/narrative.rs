//! Findings and recommendations phrased from an analysis.
//!
//! Every sentence is built from the computed numbers; when a figure is missing
//! (empty subpopulation, single job level) the sentence says so instead of
//! guessing.

use crate::analysis::Analysis;
use crate::render::{Render, format_idr, rule};
use serde::{Deserialize, Serialize};

/// A headline figure for the executive summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    /// What is measured
    pub label: String,
    /// Formatted value
    pub value: String,
}

impl Kpi {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Narrative summary of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    /// Headline figures
    pub kpis: Vec<Kpi>,
    /// Observations drawn from the metrics
    pub findings: Vec<String>,
    /// The main risk the numbers point to, if any
    pub risk: Option<String>,
    /// Prioritised recommendations for the study program
    pub recommendations: Vec<String>,
}

fn months(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.1} months", v))
}

fn rupiah(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_idr)
}

impl Findings {
    /// Derive findings from a completed analysis.
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            kpis: Self::kpis(analysis),
            findings: Self::observations(analysis),
            risk: Self::main_risk(analysis),
            recommendations: Self::recommendations(analysis),
        }
    }

    fn kpis(a: &Analysis) -> Vec<Kpi> {
        vec![
            Kpi::new("Respondents", a.summary.total_respondents.to_string()),
            Kpi::new(
                "Median time to first job (employed)",
                months(a.summary.ttfj_median_employed),
            ),
            Kpi::new(
                "Median starting salary (employed)",
                rupiah(a.summary.salary_median_employed),
            ),
            Kpi::new(
                "First job within threshold",
                format!("{:.1}%", a.performance.proportion_fast_onboard),
            ),
            Kpi::new(
                "Field fit",
                format!("{:.1}%", a.performance.proportion_field_fit),
            ),
            Kpi::new("NPS", format!("{:.1}", a.performance.nps)),
        ]
    }

    fn observations(a: &Analysis) -> Vec<String> {
        let c = &a.comparison;
        let mut out = Vec::new();

        out.push(match c.interns_faster() {
            Some(true) => format!(
                "Alumni with an internship found their first job faster ({} vs {}).",
                months(c.ttfj_median_interned),
                months(c.ttfj_median_not_interned)
            ),
            Some(false) => format!(
                "Alumni without an internship found work as fast or faster ({} vs {}).",
                months(c.ttfj_median_not_interned),
                months(c.ttfj_median_interned)
            ),
            None => "The internship effect could not be measured: one of the groups is empty."
                .to_string(),
        });

        if let Some(gap) = c.largest_salary_gap() {
            out.push(format!(
                "The largest starting-salary gap is between {} ({}) and {} ({}), a difference of {}.",
                gap.from.group,
                format_idr(gap.from.median),
                gap.to.group,
                format_idr(gap.to.median),
                format_idr(gap.amount())
            ));
        }

        let top = a.breakdowns.field_fit_by_sector.iter().take(2);
        let sectors: Vec<String> = top
            .map(|s| format!("{} ({:.1}%)", s.group, s.percent))
            .collect();
        if !sectors.is_empty() {
            out.push(format!(
                "Sectors with the highest field fit: {}.",
                sectors.join(", ")
            ));
        }

        if let Some(fastest) = a.performance.fastest_cohort() {
            out.push(format!(
                "Cohort {} has the shortest median time to first job ({}).",
                fastest.group,
                months(Some(fastest.median))
            ));
        }
        if let Some(best) = a.performance.best_paid_cohort() {
            out.push(format!(
                "Cohort {} has the highest median starting salary ({}).",
                best.group,
                format_idr(best.median)
            ));
        }

        out
    }

    fn main_risk(a: &Analysis) -> Option<String> {
        let trend = a.performance.salary_trend();
        let min = trend.iter().map(|g| g.median).reduce(f64::min)?;
        let max = trend.iter().map(|g| g.median).reduce(f64::max)?;
        if trend.len() < 2 || min <= 0.0 {
            return None;
        }
        let spread = (max - min) / min * 100.0;
        Some(format!(
            "Median starting salary varies by {:.1}% across cohorts ({} to {}).",
            spread,
            format_idr(min),
            format_idr(max)
        ))
    }

    fn recommendations(a: &Analysis) -> Vec<String> {
        let c = &a.comparison;

        let partnerships = match (c.interns_faster(), c.internship_effect()) {
            (Some(true), Some(saved)) => format!(
                "Expand industry partnerships and internship placements: interns start work {:.1} months sooner ({} vs {}).",
                saved,
                months(c.ttfj_median_interned),
                months(c.ttfj_median_not_interned)
            ),
            _ => "Review the internship program: it shows no measurable advantage in time to first job yet.".to_string(),
        };

        let sectors: Vec<&str> = a
            .breakdowns
            .field_fit_by_sector
            .iter()
            .take(2)
            .map(|s| s.group.as_str())
            .collect();
        let focus = if sectors.is_empty() {
            "Collect sector data for employed alumni to identify where the curriculum fits best."
                .to_string()
        } else {
            format!(
                "Prioritise curriculum and certifications aligned with {}, the sectors with the highest field fit.",
                sectors.join(" and ")
            )
        };

        let competency = match c.largest_salary_gap() {
            Some(gap) => format!(
                "Build the competencies expected at {} level early: it pays {} more than {} at the start.",
                gap.to.group,
                format_idr(gap.amount()),
                gap.from.group
            ),
            None => "Track job levels of employed alumni to measure salary progression.".to_string(),
        };

        vec![partnerships, focus, competency]
    }
}

impl Render for Findings {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nExecutive Summary\n");
        output.push_str(&rule('='));
        for kpi in &self.kpis {
            output.push_str(&format!("  {:<40} {:>20}\n", kpi.label, kpi.value));
        }
        output.push_str("\nFindings:\n");
        output.push_str(&rule('-'));
        for finding in &self.findings {
            output.push_str(&format!("  - {}\n", finding));
        }
        if let Some(risk) = &self.risk {
            output.push_str(&format!("\nMain risk: {}\n", risk));
        }
        output.push_str("\nRecommendations:\n");
        output.push_str(&rule('-'));
        for (i, rec) in self.recommendations.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, rec));
        }
        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("## Executive Summary\n\n");
        output.push_str("| KPI | Value |\n|-----|-------|\n");
        for kpi in &self.kpis {
            output.push_str(&format!("| {} | {} |\n", kpi.label, kpi.value));
        }
        output.push_str("\n### Findings\n\n");
        for finding in &self.findings {
            output.push_str(&format!("- {}\n", finding));
        }
        if let Some(risk) = &self.risk {
            output.push_str(&format!("\n**Main risk:** {}\n", risk));
        }
        output.push_str("\n### Recommendations\n\n");
        for (i, rec) in self.recommendations.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, rec));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_analysis;

    #[test]
    fn test_findings_from_numbers() {
        let findings = Findings::from_analysis(&sample_analysis());

        assert_eq!(findings.kpis.len(), 6);
        assert_eq!(findings.kpis[1].value, "4.0 months");
        assert_eq!(findings.kpis[2].value, "Rp 7.500.000");
        assert!(findings.findings[0].contains("with an internship found their first job faster"));
        assert!(findings.findings[1].contains("between Intern (Rp 4.500.000) and Senior"));
        assert!(findings.findings[2].contains("TIK (85.0%), Energi (80.0%)"));
        assert_eq!(findings.recommendations.len(), 3);
        assert!(findings.recommendations[0].contains("3.2 months sooner"));
        assert!(findings.recommendations[1].contains("TIK and Energi"));
    }

    #[test]
    fn test_missing_groups_are_stated() {
        let mut analysis = sample_analysis();
        analysis.comparison.ttfj_median_not_interned = None;
        analysis.comparison.salary_by_level.truncate(1);

        let findings = Findings::from_analysis(&analysis);
        assert!(findings.findings[0].contains("could not be measured"));
        assert!(findings.recommendations[0].starts_with("Review the internship program"));
        assert!(findings.recommendations[2].starts_with("Track job levels"));
    }

    #[test]
    fn test_main_risk_from_cohort_spread() {
        let findings = Findings::from_analysis(&sample_analysis());
        let risk = findings.risk.unwrap();
        assert!(risk.contains("14.3%"));
    }

    #[test]
    fn test_markdown_lists_recommendations() {
        let md = Findings::from_analysis(&sample_analysis()).to_markdown();
        assert!(md.contains("## Executive Summary"));
        assert!(md.contains("| NPS | 12.0 |"));
        assert!(md.contains("\n3. "));
    }
}
