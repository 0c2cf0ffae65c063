//! Saved `{name, url}` sources.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSource {
    pub name: String,
    pub url: String,
}

impl SavedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Ordered list of saved sources. Items are appended or removed, never edited.
pub trait SourceStore: Send {
    fn list(&self) -> &[SavedSource];

    fn append(&mut self, source: SavedSource) -> Result<(), StoreError>;

    fn remove_at(&mut self, index: usize) -> Result<SavedSource, StoreError>;
}

fn remove_checked(items: &mut Vec<SavedSource>, index: usize) -> Result<SavedSource, StoreError> {
    if index >= items.len() {
        return Err(StoreError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Vec<SavedSource>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<SavedSource>) -> Self {
        Self { items }
    }
}

impl SourceStore for MemoryStore {
    fn list(&self) -> &[SavedSource] {
        &self.items
    }

    fn append(&mut self, source: SavedSource) -> Result<(), StoreError> {
        self.items.push(source);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<SavedSource, StoreError> {
        remove_checked(&mut self.items, index)
    }
}

/// JSON array persisted to a file after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    items: Vec<SavedSource>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty list, and so is
    /// one that does not hold a valid list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable saved sources");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = items.len(), "Opened saved sources");
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SourceStore for JsonFileStore {
    fn list(&self) -> &[SavedSource] {
        &self.items
    }

    fn append(&mut self, source: SavedSource) -> Result<(), StoreError> {
        self.items.push(source);
        if let Err(e) = self.persist() {
            self.items.pop();
            return Err(e);
        }
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<SavedSource, StoreError> {
        let removed = remove_checked(&mut self.items, index)?;
        if let Err(e) = self.persist() {
            self.items.insert(index, removed);
            return Err(e);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sources.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.list().is_empty());
        store.append(SavedSource::new("Playlist 1", "http://a/list.m3u")).unwrap();
        store.append(SavedSource::new("Sports", "http://b/list.m3u")).unwrap();

        let mut reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.list().len(), 2);
        assert_eq!(reopened.list()[1].name, "Sports");

        let removed = reopened.remove_at(0).unwrap();
        assert_eq!(removed.url, "http://a/list.m3u");
        assert_eq!(JsonFileStore::open(&path).unwrap().list(), reopened.list());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sources.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.list().is_empty());
        store.append(SavedSource::new("Fresh", "http://fresh")).unwrap();
        assert_eq!(JsonFileStore::open(&path).unwrap().list().len(), 1);
    }

    #[test]
    fn remove_out_of_range() {
        let mut store = MemoryStore::with_items(vec![SavedSource::new("a", "http://a")]);
        let err = store.remove_at(3).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(store.list().len(), 1);
    }
}
