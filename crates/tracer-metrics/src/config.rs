//! Pipeline configuration
//!
//! Thresholds and percentiles shared by the cleaner and the metric passes.
//! Every field has a default, so a JSON file only needs the values it changes.

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracer_data::EmploymentStatus;

/// Configuration for cleaning and metric computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Status labels that make up the employed subpopulation.
    ///
    /// Each label must map to a working [`EmploymentStatus`]; a subset narrows
    /// the subpopulation.
    pub working_statuses: Vec<String>,
    /// Lower winsorization quantile for starting salary (default: 0.05)
    pub winsor_lower: f64,
    /// Upper winsorization quantile for starting salary (default: 0.95)
    pub winsor_upper: f64,
    /// Months within which a first job counts as fast onboarding (default: 6)
    pub fast_onboard_months: f64,
    /// Minimum field-fit rating that counts as a match (default: 4)
    pub field_fit_min: f64,
    /// Minimum NPS score of a promoter (default: 9)
    pub promoter_min: f64,
    /// Maximum NPS score of a detractor (default: 6)
    pub detractor_max: f64,
    /// Number of bins in the time-to-first-job histogram (default: 15)
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            working_statuses: EmploymentStatus::working_labels()
                .into_iter()
                .map(String::from)
                .collect(),
            winsor_lower: 0.05,
            winsor_upper: 0.95,
            fast_onboard_months: 6.0,
            field_fit_min: 4.0,
            promoter_min: 9.0,
            detractor_max: 6.0,
            histogram_bins: 15,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.working_statuses.is_empty() {
            return Err(MetricsError::InvalidConfig(
                "working_statuses must not be empty".to_string(),
            ));
        }
        if let Some(label) = self
            .working_statuses
            .iter()
            .find(|l| !EmploymentStatus::from_label(l).is_working())
        {
            return Err(MetricsError::InvalidConfig(format!(
                "'{}' is not an employed status; expected one of {}",
                label,
                EmploymentStatus::working_labels().join(", ")
            )));
        }
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if !in_unit(self.winsor_lower) || !in_unit(self.winsor_upper) {
            return Err(MetricsError::InvalidConfig(format!(
                "winsorization quantiles must lie in [0, 1], got {} and {}",
                self.winsor_lower, self.winsor_upper
            )));
        }
        if self.winsor_lower >= self.winsor_upper {
            return Err(MetricsError::InvalidConfig(format!(
                "winsor_lower ({}) must be below winsor_upper ({})",
                self.winsor_lower, self.winsor_upper
            )));
        }
        if self.detractor_max >= self.promoter_min {
            return Err(MetricsError::InvalidConfig(format!(
                "detractor_max ({}) must be below promoter_min ({})",
                self.detractor_max, self.promoter_min
            )));
        }
        if self.histogram_bins == 0 {
            return Err(MetricsError::InvalidConfig(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured labels that map to a working [`EmploymentStatus`].
    pub fn working_labels(&self) -> impl Iterator<Item = &str> {
        self.working_statuses
            .iter()
            .map(String::as_str)
            .filter(|label| EmploymentStatus::from_label(label).is_working())
    }
}
