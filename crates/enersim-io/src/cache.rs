use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enersim_core::Dataset;
use tracing::debug;

use crate::error::LoadResult;
use crate::loader::{load_dataset_with, LoadOptions};

/// Loaded datasets keyed by file path.
///
/// A file is read at most once for the lifetime of the cache; later calls
/// hand out the same `Arc`. The cache is owned by the application context
/// and passed to whoever needs data. Failed loads are not stored, and are
/// not retried on their own.
#[derive(Debug, Default)]
pub struct DatasetCache {
    options: LoadOptions,
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
        }
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> LoadResult<Arc<Dataset>> {
        let key = cache_key(path.as_ref());
        if let Some(dataset) = self.entries.get(&key) {
            debug!("dataset cache hit for {}", key.display());
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset_with(&key, &self.options)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(&cache_key(path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Same file reached through different relative paths shares one entry.
fn cache_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
