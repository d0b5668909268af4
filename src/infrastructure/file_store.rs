// Key-value store persisted as a flat TOML table
use crate::application::ports::KeyValueStore;
use crate::domain::error::{DashboardError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct TomlFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl TomlFileStore {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| DashboardError::Store(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(DashboardError::Store(e.to_string())),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let raw = toml::to_string(entries).map_err(|e| DashboardError::Store(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| DashboardError::Store(e.to_string()))
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| DashboardError::Store(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| DashboardError::Store(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }
}
