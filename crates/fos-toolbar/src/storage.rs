//! Settings Persistence
//!
//! Key/value backends and the fail-soft settings store layered on top.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::status::{StatusMap, StatusValue};

/// Prefix of every persisted settings record
pub const STORAGE_PREFIX: &str = "BA__ACC_";

/// Backend failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    
    #[error("settings serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value storage in the manner of a page's local storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
    
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, creating it if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
    
    pub fn dir(&self) -> &Path {
        &self.dir
    }
    
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read settings file for {}: {}", key, e);
                None
            }
        }
    }
    
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Settings record for one toolbar instance
pub struct SettingsStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl SettingsStore {
    /// Settings stored under `key` (see `ToolbarConfig::storage_key`)
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }
    
    pub fn key(&self) -> &str {
        &self.key
    }
    
    /// Stored overrides; empty when absent or unreadable
    pub fn load(&self) -> StatusMap {
        let Some(raw) = self.backend.get_item(&self.key) else {
            return StatusMap::new();
        };
        tracing::debug!("Loaded settings record {} ({} bytes)", self.key, raw.len());
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings record {}: {}", self.key, e);
                return StatusMap::new();
            }
        };
        let serde_json::Value::Object(entries) = value else {
            tracing::warn!("Settings record {} is not an object", self.key);
            return StatusMap::new();
        };
        
        let mut status = StatusMap::new();
        for (name, entry) in entries {
            match serde_json::from_value::<StatusValue>(entry) {
                Ok(v) => status.set(&name, v),
                Err(_) => tracing::debug!("Skipping non-scalar setting {}", name),
            }
        }
        status
    }
    
    /// Write the full map; failures are logged, never raised
    pub fn save(&mut self, status: &StatusMap) {
        if let Err(e) = self.try_save(status) {
            tracing::warn!("Failed to persist settings {}: {}", self.key, e);
        }
    }
    
    pub fn try_save(&mut self, status: &StatusMap) -> Result<(), StorageError> {
        let json = serde_json::to_string(status)?;
        self.backend.set_item(&self.key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_load_missing_is_empty() {
        let store = SettingsStore::new(Box::new(MemoryStore::new()), "BA__ACC_page");
        assert_eq!(store.key(), "BA__ACC_page");
        assert!(store.load().is_empty());
    }
    
    #[test]
    fn test_load_malformed_is_empty() {
        let mut backend = MemoryStore::new();
        backend.set_item("BA__ACC_x", "{not json").unwrap();
        let store = SettingsStore::new(Box::new(backend.clone()), "BA__ACC_x");
        assert!(store.load().is_empty());
        
        backend.set_item("BA__ACC_x", "[1,2]").unwrap();
        assert!(store.load().is_empty());
    }
    
    #[test]
    fn test_round_trip_through_memory() {
        let backend = MemoryStore::new();
        let mut store = SettingsStore::new(Box::new(backend.clone()), "BA__ACC_x");
        let mut status = StatusMap::new();
        status.set("darkmode", true);
        status.set("text-color", "#000000");
        store.save(&status);
        
        assert_eq!(backend.len(), 1);
        assert_eq!(store.load(), status);
    }
    
    #[test]
    fn test_nested_values_skipped() {
        let mut backend = MemoryStore::new();
        backend.set_item("BA__ACC_x", r#"{"a": true, "b": {"c": 1}}"#).unwrap();
        let store = SettingsStore::new(Box::new(backend), "BA__ACC_x");
        let status = store.load();
        assert_eq!(status.len(), 1);
        assert!(status.is_truthy("a"));
    }
    
    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = FileStore::open(dir.path().join("settings")).unwrap();
        assert_eq!(files.get_item("BA__ACC_a/b"), None);
        
        files.set_item("BA__ACC_a/b", "{}").unwrap();
        assert_eq!(files.get_item("BA__ACC_a/b").as_deref(), Some("{}"));
        assert!(files.dir().join("BA__ACC_a_b.json").exists());
        
        files.set_item("BA__ACC_a/b", r#"{"darkmode":true}"#).unwrap();
        assert_eq!(files.get_item("BA__ACC_a/b").as_deref(), Some(r#"{"darkmode":true}"#));
    }
}
