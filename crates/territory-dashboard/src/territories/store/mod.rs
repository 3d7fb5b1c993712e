mod cache;
mod parser;

pub use cache::{DatasetCache, SourceFingerprint};

use super::domain::TerritoryRecord;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read territory list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid territory CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Territory records loaded from one source, read-only after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritoryDataset {
    records: Vec<TerritoryRecord>,
}

impl TerritoryDataset {
    pub fn new(records: Vec<TerritoryRecord>) -> Self {
        Self { records }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "territory dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let records = parser::parse_records(reader)?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TerritoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct, non-blank states.
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.state.trim())
            .filter(|state| !state.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
