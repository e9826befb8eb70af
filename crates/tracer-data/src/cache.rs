//! In-memory memoization of loaded datasets.
//!
//! The presentation layer owns a [`SourceCache`] and asks it for a table before
//! going to disk. Entries are keyed by source identity: the canonical path plus
//! the file's length and modification time, so an edited file is reloaded.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity of a dataset on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceKey {
    /// Build the key for a file.
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let not_found = |e: std::io::Error| match e.kind() {
            ErrorKind::NotFound => DataError::NotFound {
                path: path.to_path_buf(),
            },
            _ => DataError::Io(e),
        };

        let canonical = path.canonicalize().map_err(not_found)?;
        let meta = std::fs::metadata(&canonical).map_err(not_found)?;

        Ok(Self {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cached tables
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that had to load from the source
    pub misses: usize,
}

/// Single-owner cache of raw tables keyed by [`SourceKey`].
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<SourceKey, DataFrame>,
    hits: usize,
    misses: usize,
}

impl SourceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it with `load` on a miss.
    ///
    /// A failed load is not cached.
    pub fn get_or_load<F>(&mut self, path: impl AsRef<Path>, load: F) -> Result<DataFrame>
    where
        F: FnOnce(&Path) -> Result<DataFrame>,
    {
        let key = SourceKey::for_path(path.as_ref())?;

        if let Some(df) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(path = %key.path.display(), "source cache hit");
            return Ok(df.clone());
        }

        self.misses += 1;
        tracing::debug!(path = %key.path.display(), "source cache miss");
        let df = load(&key.path)?;
        self.entries.insert(key, df.clone());
        Ok(df)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
