//! Per-column descriptive statistics.
//!
//! Numeric columns get count, mean, standard deviation (ddof = 1), min, max and
//! the linear-interpolated quartiles. Other columns get count, distinct values
//! and the most frequent value with its frequency.

use crate::error::Result;
use crate::stats::{numeric, scalar, value_counts};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    /// Column name
    pub column: String,
    /// Storage type
    pub dtype: String,
    /// Non-null values
    pub count: usize,
    /// Distinct non-null values (non-numeric columns)
    pub unique: Option<usize>,
    /// Most frequent value (non-numeric columns)
    pub top: Option<String>,
    /// Frequency of `top`
    pub freq: Option<usize>,
    /// Mean
    pub mean: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    /// Minimum
    pub min: Option<f64>,
    /// First quartile
    pub q25: Option<f64>,
    /// Median
    pub median: Option<f64>,
    /// Third quartile
    pub q75: Option<f64>,
    /// Maximum
    pub max: Option<f64>,
}

impl ColumnDescription {
    /// Whether the column was described numerically.
    pub const fn is_numeric(&self) -> bool {
        self.unique.is_none()
    }
}

/// Describe every column of a table, in column order.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnDescription>> {
    df.get_columns()
        .iter()
        .map(|c| {
            let dtype = c.dtype();
            if dtype.is_float() || dtype.is_integer() {
                describe_numeric(df, c.name().as_str(), dtype)
            } else {
                describe_categorical(df, c.name().as_str(), dtype)
            }
        })
        .collect()
}

fn describe_numeric(df: &DataFrame, name: &str, dtype: &DataType) -> Result<ColumnDescription> {
    let quartile = |q: f64, alias: &str| {
        numeric(name)
            .quantile(lit(q), QuantileMethod::Linear)
            .alias(alias)
    };

    let stats = df
        .clone()
        .lazy()
        .select([
            numeric(name).mean().alias("mean"),
            numeric(name).std(1).alias("std"),
            numeric(name).min().alias("min"),
            quartile(0.25, "q25"),
            numeric(name).median().alias("median"),
            quartile(0.75, "q75"),
            numeric(name).max().alias("max"),
        ])
        .collect()?;

    Ok(ColumnDescription {
        column: name.to_string(),
        dtype: dtype.to_string(),
        count: non_null(df, name)?,
        unique: None,
        top: None,
        freq: None,
        mean: scalar(&stats, "mean")?,
        std: scalar(&stats, "std")?,
        min: scalar(&stats, "min")?,
        q25: scalar(&stats, "q25")?,
        median: scalar(&stats, "median")?,
        q75: scalar(&stats, "q75")?,
        max: scalar(&stats, "max")?,
    })
}

fn describe_categorical(
    df: &DataFrame,
    name: &str,
    dtype: &DataType,
) -> Result<ColumnDescription> {
    let counts = value_counts(df, name)?;
    let top = counts.first();

    Ok(ColumnDescription {
        column: name.to_string(),
        dtype: dtype.to_string(),
        count: non_null(df, name)?,
        unique: Some(counts.len()),
        top: top.map(|c| c.category.clone()),
        freq: top.map(|c| c.count),
        mean: None,
        std: None,
        min: None,
        q25: None,
        median: None,
        q75: None,
        max: None,
    })
}

fn non_null(df: &DataFrame, name: &str) -> Result<usize> {
    let c = df.column(name)?;
    Ok(c.len() - c.null_count())
}
