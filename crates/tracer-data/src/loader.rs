//! CSV loading for tracer study datasets.
//!
//! Every column is first read as text so that `alumni_id` keeps its exact
//! representation (leading zeros, long digit strings). Survey columns that are
//! numeric by nature are then coerced to `Float64`; values that do not parse
//! become nulls.

use crate::error::{DataError, Result};
use crate::schema::{self, numeric_columns};
use polars::prelude::*;
use std::io::{Cursor, ErrorKind, Read};
use std::path::Path;

/// Load a CSV file from disk.
///
/// # Errors
///
/// Returns [`DataError::NotFound`] when the path does not exist, and
/// [`DataError::EmptyDataset`] when the file has no content at all.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::Io(e),
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read dataset");
    parse_csv(bytes)
}

/// Load a CSV file and check it carries the required columns.
pub fn load_csv_validated(path: impl AsRef<Path>, required: &[&str]) -> Result<DataFrame> {
    let df = load_csv(path)?;
    schema::validate(&df, required)?;
    Ok(df)
}

/// Read a CSV dataset from any reader (stdin, an uploaded buffer, ...).
pub fn read_csv<R: Read>(mut reader: R) -> Result<DataFrame> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_csv(bytes)
}

fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DataError::EmptyDataset(
            "source contains no CSV content".to_string(),
        ));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    let df = coerce_numeric_columns(df)?;
    tracing::info!(rows = df.height(), columns = df.width(), "loaded dataset");
    Ok(df)
}

/// Cast the numeric survey columns that are present to `Float64`.
///
/// Columns absent from the frame are skipped; schema validation reports them.
pub fn coerce_numeric_columns(df: DataFrame) -> Result<DataFrame> {
    let casts: Vec<Expr> = numeric_columns()
        .into_iter()
        .filter(|name| df.get_column_index(name).is_some())
        .map(|name| col(name).cast(DataType::Float64))
        .collect();

    if casts.is_empty() {
        return Ok(df);
    }

    Ok(df.lazy().with_columns(casts).collect()?)
}
