//! Where a raw dataset comes from.

use crate::error::Result;
use polars::prelude::DataFrame;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracer_data::{REQUIRED_COLUMNS, SourceCache, load_csv_validated, read_csv, validate};

/// Dataset read when no path is given.
pub const DEFAULT_DATASET: &str = "Dataset - unsika_tracer_alumni_teknik_elektro.csv";

/// Source of a raw tracer study table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    /// [`DEFAULT_DATASET`] in the working directory
    #[default]
    Default,
    /// A CSV file at the given path
    Path(PathBuf),
    /// CSV piped on standard input
    Stdin,
}

/// A validated raw table and a label naming where it came from
#[derive(Debug, Clone)]
pub struct LoadedSource {
    /// Raw table carrying every required column
    pub frame: DataFrame,
    /// Human-readable origin
    pub label: String,
}

impl DataSource {
    /// Path read by file-backed sources.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Default => Some(Path::new(DEFAULT_DATASET)),
            Self::Path(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Load and validate the table, consulting `cache` for file-backed sources.
    ///
    /// Files that fail validation are not cached.
    pub fn load(&self, cache: &mut SourceCache) -> Result<LoadedSource> {
        match self.path() {
            Some(path) => {
                let frame =
                    cache.get_or_load(path, |p| load_csv_validated(p, REQUIRED_COLUMNS))?;
                Ok(LoadedSource {
                    frame,
                    label: path.display().to_string(),
                })
            }
            None => self.load_from_reader(std::io::stdin().lock()),
        }
    }

    /// Load and validate a table from any reader, bypassing the cache.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<LoadedSource> {
        let frame = read_csv(reader)?;
        validate(&frame, REQUIRED_COLUMNS)?;
        Ok(LoadedSource {
            frame,
            label: self.to_string(),
        })
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "{}", DEFAULT_DATASET),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_path() {
        assert_eq!(DataSource::default().path(), Some(Path::new(DEFAULT_DATASET)));
        assert!(DataSource::Stdin.path().is_none());
        assert_eq!(DataSource::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let mut cache = SourceCache::new();
        let err = DataSource::Path(PathBuf::from("no/such/tracer.csv"))
            .load(&mut cache)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reader_missing_columns() {
        let err = DataSource::Stdin
            .load_from_reader("alumni_id,ipk\nA1,3.5\n".as_bytes())
            .unwrap_err();
        let missing = err.missing_columns().unwrap();
        assert_eq!(missing.len(), REQUIRED_COLUMNS.len() - 2);
    }
}
