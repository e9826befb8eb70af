//! Tracer study schema.
//!
//! Column names, the required-column registry, the employment status mapping and
//! the schema validator that every pipeline run starts with.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names used by the pipeline.
pub mod columns {
    /// Opaque respondent identifier, always read as text.
    pub const ALUMNI_ID: &str = "alumni_id";
    /// Graduation cohort.
    pub const COHORT: &str = "angkatan_lulus";
    /// Current employment status.
    pub const STATUS: &str = "status_saat_ini";
    /// Grade point average.
    pub const GPA: &str = "ipk";
    /// Internship flag (0/1).
    pub const INTERNSHIP: &str = "magang";
    /// Number of certifications.
    pub const CERTIFICATIONS: &str = "sertifikasi";
    /// Number of projects.
    pub const PROJECTS: &str = "projects_count";
    /// Months to first job.
    pub const TTFJ: &str = "ttfj_bulan";
    /// Starting salary in IDR.
    pub const SALARY: &str = "gaji_awal_idr";
    /// Field-fit rating (1-5).
    pub const FIELD_FIT: &str = "kesesuaian_bidang_1_5";
    /// Curriculum relevance rating (1-5).
    pub const CURRICULUM_RELEVANCE: &str = "relevansi_kurikulum_1_5";
    /// Employment sector.
    pub const SECTOR: &str = "sektor";
    /// Job level.
    pub const JOB_LEVEL: &str = "level_jabatan";
    /// Promoter score (0-10).
    pub const NPS: &str = "nps_0_10";
}

/// Every column a tracer study dataset must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    columns::ALUMNI_ID,
    columns::COHORT,
    columns::STATUS,
    columns::GPA,
    columns::INTERNSHIP,
    columns::CERTIFICATIONS,
    columns::PROJECTS,
    columns::TTFJ,
    columns::SALARY,
    columns::FIELD_FIT,
    columns::CURRICULUM_RELEVANCE,
    columns::SECTOR,
    columns::JOB_LEVEL,
    columns::NPS,
];

/// How a column is stored once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Opaque text that must never be parsed as a number
    Identifier,
    /// Grouping key kept with its inferred type
    Ordinal,
    /// Free categorical text
    Categorical,
    /// Numeric value coerced to `Float64`
    Numeric,
}

/// Column metadata.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name as it appears in the CSV header
    pub name: &'static str,
    /// Storage kind
    pub kind: ColumnKind,
    /// Short description of the survey question
    pub description: &'static str,
}

/// Get metadata for every required column, in schema order.
pub fn column_registry() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo {
            name: columns::ALUMNI_ID,
            kind: ColumnKind::Identifier,
            description: "Respondent identifier",
        },
        ColumnInfo {
            name: columns::COHORT,
            kind: ColumnKind::Ordinal,
            description: "Graduation cohort",
        },
        ColumnInfo {
            name: columns::STATUS,
            kind: ColumnKind::Categorical,
            description: "Current status (Bekerja, Wirausaha, Studi Lanjut, ...)",
        },
        ColumnInfo {
            name: columns::GPA,
            kind: ColumnKind::Numeric,
            description: "Grade point average",
        },
        ColumnInfo {
            name: columns::INTERNSHIP,
            kind: ColumnKind::Numeric,
            description: "Completed an internship (1) or not (0)",
        },
        ColumnInfo {
            name: columns::CERTIFICATIONS,
            kind: ColumnKind::Numeric,
            description: "Number of professional certifications",
        },
        ColumnInfo {
            name: columns::PROJECTS,
            kind: ColumnKind::Numeric,
            description: "Number of projects completed while studying",
        },
        ColumnInfo {
            name: columns::TTFJ,
            kind: ColumnKind::Numeric,
            description: "Months between graduation and first job",
        },
        ColumnInfo {
            name: columns::SALARY,
            kind: ColumnKind::Numeric,
            description: "Starting salary (IDR)",
        },
        ColumnInfo {
            name: columns::FIELD_FIT,
            kind: ColumnKind::Numeric,
            description: "Fit between job and field of study (1-5)",
        },
        ColumnInfo {
            name: columns::CURRICULUM_RELEVANCE,
            kind: ColumnKind::Numeric,
            description: "Relevance of the curriculum to the job (1-5)",
        },
        ColumnInfo {
            name: columns::SECTOR,
            kind: ColumnKind::Categorical,
            description: "Employment sector",
        },
        ColumnInfo {
            name: columns::JOB_LEVEL,
            kind: ColumnKind::Categorical,
            description: "Job level (Intern, Junior, Middle, Senior, ...)",
        },
        ColumnInfo {
            name: columns::NPS,
            kind: ColumnKind::Numeric,
            description: "Likelihood to recommend the study program (0-10)",
        },
    ]
}

/// Names of the columns that are coerced to `Float64` on load.
pub fn numeric_columns() -> Vec<&'static str> {
    column_registry()
        .into_iter()
        .filter(|info| info.kind == ColumnKind::Numeric)
        .map(|info| info.name)
        .collect()
}

/// Get metadata for a single column.
pub fn get_column_info(name: &str) -> Option<ColumnInfo> {
    column_registry().into_iter().find(|info| info.name == name)
}

/// Check that every required column is present.
///
/// Fails with [`DataError::Schema`] listing all missing columns, not just the
/// first one.
pub fn validate(df: &DataFrame, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| df.get_column_index(name).is_none())
        .map(|name| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::debug!(missing = ?missing, "schema validation failed");
        Err(DataError::Schema { missing })
    }
}

/// Employment status, mapped from the raw `status_saat_ini` labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    /// Bekerja
    Employed,

    /// Wirausaha
    SelfEmployed,

    /// Anything else, including missing and unrecognized labels
    Other,
}

impl EmploymentStatus {
    /// Returns all statuses.
    pub fn all() -> Vec<Self> {
        vec![Self::Employed, Self::SelfEmployed, Self::Other]
    }

    /// Map a raw label. Unknown labels fall back to [`EmploymentStatus::Other`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Bekerja" => Self::Employed,
            "Wirausaha" => Self::SelfEmployed,
            _ => Self::Other,
        }
    }

    /// Raw label used in the dataset, if the status has one.
    pub const fn label(&self) -> Option<&'static str> {
        match self {
            Self::Employed => Some("Bekerja"),
            Self::SelfEmployed => Some("Wirausaha"),
            Self::Other => None,
        }
    }

    /// Whether the status belongs to the employed subpopulation.
    pub const fn is_working(&self) -> bool {
        matches!(self, Self::Employed | Self::SelfEmployed)
    }

    /// Labels of the employed subpopulation.
    pub fn working_labels() -> Vec<&'static str> {
        Self::all()
            .into_iter()
            .filter(Self::is_working)
            .filter_map(|status| status.label())
            .collect()
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Employed => write!(f, "Employed"),
            Self::SelfEmployed => write!(f, "Self-employed"),
            Self::Other => write!(f, "Other"),
        }
    }
}
