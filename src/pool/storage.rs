use super::gene_pool::{GenePool, GenePoolEntry};
use crate::config::PoolConfig;
use crate::error::{CodonSoupError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub trait PoolStore {
    fn load(&self) -> Result<Vec<GenePoolEntry>>;
    fn save(&self, entries: &[GenePoolEntry]) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: Vec<GenePoolEntry>,
}

const SNAPSHOT_VERSION: u32 = 1;

/// Pool snapshot kept as a single JSON document
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot into a new pool. A missing file yields an empty pool.
    pub fn restore(&self, config: &PoolConfig) -> Result<GenePool> {
        if !self.path.exists() {
            return Ok(GenePool::new(config));
        }
        let entries = self.load()?;
        info!("restored {} genomes from {}", entries.len(), self.path.display());
        Ok(GenePool::from_entries(config, entries))
    }
}

impl PoolStore for JsonFileStore {
    fn load(&self) -> Result<Vec<GenePoolEntry>> {
        let content = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CodonSoupError::Storage(format!(
                "unsupported snapshot version {} in {}",
                snapshot.version,
                self.path.display()
            )));
        }
        Ok(snapshot.entries)
    }

    fn save(&self, entries: &[GenePoolEntry]) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        // write-then-rename so a crash never leaves a truncated snapshot
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
