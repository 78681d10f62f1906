//! Resume-history store
//!
//! One JSON document mapping title id to its latest progress entry,
//! rewritten wholesale on every update and read wholesale at startup.
//! A missing file means an empty history, never an error. Concurrent
//! runs race read-modify-write and may lose an update; acceptable for
//! a single-user local tool.

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use crate::error::SessionError;
use crate::models::ProgressEntry;

/// Persists and retrieves the resume history.
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Store at the default location under the user data dir.
    pub fn new() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelstream")
            .join("progress.json");
        Self::with_path(path)
    }

    /// Store at an explicit path (flag override or tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All entries, most recently played first. A missing or unreadable
    /// file yields an empty history; the next record rewrites it.
    pub fn load_all(&self) -> Vec<ProgressEntry> {
        let mut entries: Vec<ProgressEntry> = self.read_map().into_values().collect();
        entries.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        entries
    }

    /// Upsert by title id, stamping the current time.
    pub fn record(&self, mut entry: ProgressEntry) -> Result<(), SessionError> {
        entry.played_at = Utc::now();

        let mut map = self.read_map();
        map.insert(entry.id.to_string(), entry);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| SessionError::Store(err.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&map)
            .map_err(|err| SessionError::Store(err.to_string()))?;
        std::fs::write(&self.path, json).map_err(|err| SessionError::Store(err.to_string()))?;
        Ok(())
    }

    fn read_map(&self) -> BTreeMap<String, ProgressEntry> {
        let Ok(text) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&text) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "progress file unreadable, starting fresh");
                BTreeMap::new()
            }
        }
    }
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, ResolvedTitle};

    fn title(id: u64, name: &str) -> ResolvedTitle {
        ResolvedTitle {
            search_id: id,
            external_id: format!("tt{:07}", id),
            title: name.to_string(),
            year: Some(2021),
            kind: MediaKind::Movie,
        }
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::with_path(dir.path().join("progress.json"));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "not json {{{").unwrap();
        let store = ProgressStore::with_path(&path);
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_record_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.json");
        let store = ProgressStore::with_path(&path);

        let entry = ProgressEntry::from_session(&title(1, "Dune"), None);
        store.record(entry).unwrap();
        assert!(path.exists());
    }
}
