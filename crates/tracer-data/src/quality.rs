//! Data-quality diagnostics for a raw dataset.
//!
//! Reports what the cleaner is about to deal with: missing values per column,
//! duplicate rows, and the dimensions before and after cleaning.

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Missing-value count for a single column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissingValues {
    /// Column name
    pub column: String,
    /// Number of null cells
    pub count: usize,
}

/// Quality summary of a raw dataset, optionally paired with its cleaned form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityReport {
    /// Rows in the raw dataset
    pub raw_rows: usize,
    /// Columns in the raw dataset
    pub raw_columns: usize,
    /// Columns with at least one missing value, in column order
    pub missing: Vec<MissingValues>,
    /// Rows that exactly repeat an earlier row
    pub duplicate_rows: usize,
    /// Rows after cleaning
    pub cleaned_rows: Option<usize>,
    /// Columns after cleaning
    pub cleaned_columns: Option<usize>,
}

impl QualityReport {
    /// Inspect a raw dataset.
    pub fn from_raw(raw: &DataFrame) -> Result<Self> {
        let missing = raw
            .get_columns()
            .iter()
            .filter(|c| c.null_count() > 0)
            .map(|c| MissingValues {
                column: c.name().to_string(),
                count: c.null_count(),
            })
            .collect();

        Ok(Self {
            raw_rows: raw.height(),
            raw_columns: raw.width(),
            missing,
            duplicate_rows: count_duplicates(raw)?,
            cleaned_rows: None,
            cleaned_columns: None,
        })
    }

    /// Inspect a raw dataset together with its cleaned counterpart.
    pub fn from_frames(raw: &DataFrame, cleaned: &DataFrame) -> Result<Self> {
        let mut report = Self::from_raw(raw)?;
        report.cleaned_rows = Some(cleaned.height());
        report.cleaned_columns = Some(cleaned.width());
        Ok(report)
    }

    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|m| m.count).sum()
    }

    /// Rows removed by cleaning, if the cleaned frame is known.
    pub fn rows_removed(&self) -> Option<usize> {
        self.cleaned_rows
            .map(|cleaned| self.raw_rows.saturating_sub(cleaned))
    }
}

/// Count rows that are exact repeats of an earlier row.
pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
    let unique = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(df.height() - unique.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        df! {
            "alumni_id" => ["a", "b", "b", "c"],
            "ttfj_bulan" => [Some(1.0), Some(2.0), Some(2.0), None],
            "gaji_awal_idr" => [Some(5.0e6), None, None, Some(6.0e6)],
        }
        .unwrap()
    }

    #[test]
    fn test_counts_duplicates() {
        assert_eq!(count_duplicates(&raw_frame()).unwrap(), 1);
    }

    #[test]
    fn test_missing_values_only_lists_affected_columns() {
        let report = QualityReport::from_raw(&raw_frame()).unwrap();
        assert_eq!(report.raw_rows, 4);
        assert_eq!(report.raw_columns, 3);
        assert_eq!(
            report.missing,
            vec![
                MissingValues {
                    column: "ttfj_bulan".to_string(),
                    count: 1
                },
                MissingValues {
                    column: "gaji_awal_idr".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(report.total_missing(), 3);
        assert!(report.rows_removed().is_none());
    }

    #[test]
    fn test_with_cleaned_frame() {
        let raw = raw_frame();
        let cleaned = raw.head(Some(1));
        let report = QualityReport::from_frames(&raw, &cleaned).unwrap();
        assert_eq!(report.cleaned_rows, Some(1));
        assert_eq!(report.rows_removed(), Some(3));
        assert_eq!(report.cleaned_columns, Some(3));
    }
}
