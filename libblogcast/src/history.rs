//! Record of posts that have already been shared
//!
//! The whole mapping is persisted as one JSON object on every change. Writes go
//! to `<file>.tmp` and are renamed over the real file, so a crash mid-write
//! leaves the previous history intact.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HistoryError, Result};
use crate::types::PostedRecord;

/// Post id to posting record, backed by a JSON file
#[derive(Debug)]
pub struct PostedHistory {
    path: PathBuf,
    entries: BTreeMap<String, PostedRecord>,
}

impl PostedHistory {
    /// Load the history at `path`, or start empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!("No history at {}, starting empty", path.display());
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|e| HistoryError::io(&path, e))?;
        let entries = serde_json::from_str(&contents).map_err(|source| HistoryError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PostedRecord> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, PostedRecord> {
        &self.entries
    }

    /// Add a record and persist the full mapping before returning
    pub fn record(&mut self, id: impl Into<String>, record: PostedRecord) -> Result<()> {
        self.entries.insert(id.into(), record);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
        }

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            HistoryError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = tmp_path(&self.path);
        let mut file = std::fs::File::create(&tmp).map_err(|e| HistoryError::io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| HistoryError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| HistoryError::io(&self.path, e))?;

        debug!(
            "Saved {} history entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
