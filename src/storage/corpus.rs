use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::CollectedPr;

/// Flat-file store for the collected corpus: one pretty-printed JSON array.
pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the whole file, creating its directory if needed.
    pub fn save(&self, records: &[CollectedPr]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        tracing::info!("Saved {} PRs to {}", records.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<CollectedPr>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::CorpusNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<CollectedPr> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} PRs from {}", records.len(), self.path.display());
        Ok(records)
    }
}
