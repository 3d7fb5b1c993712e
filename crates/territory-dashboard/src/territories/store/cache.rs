use super::{StoreError, TerritoryDataset};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Identity of a dataset source: the path plus its last modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Memoizes the most recently loaded dataset.
///
/// Entries never expire on their own: a lookup reuses the cached dataset while
/// the fingerprint is unchanged, and [`DatasetCache::reload`] or
/// [`DatasetCache::invalidate`] drop it explicitly.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(SourceFingerprint, Arc<TerritoryDataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<Arc<TerritoryDataset>, StoreError> {
        let fingerprint = SourceFingerprint::of(path.as_ref())?;
        if let Some((cached, dataset)) = &self.entry {
            if *cached == fingerprint {
                debug!(path = %fingerprint.path.display(), "territory dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
        }

        debug!(path = %fingerprint.path.display(), "territory dataset cache miss");
        self.load(fingerprint)
    }

    /// Drops any cached dataset and loads `path` again.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<TerritoryDataset>, StoreError> {
        self.invalidate();
        let fingerprint = SourceFingerprint::of(path.as_ref())?;
        self.load(fingerprint)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn fingerprint(&self) -> Option<&SourceFingerprint> {
        self.entry.as_ref().map(|(fingerprint, _)| fingerprint)
    }

    fn load(
        &mut self,
        fingerprint: SourceFingerprint,
    ) -> Result<Arc<TerritoryDataset>, StoreError> {
        let dataset = Arc::new(TerritoryDataset::from_path(&fingerprint.path)?);
        self.entry = Some((fingerprint, Arc::clone(&dataset)));
        Ok(dataset)
    }
}
