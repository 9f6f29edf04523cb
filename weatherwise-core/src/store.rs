use anyhow::{Context, Result};
use std::{collections::BTreeMap, collections::HashMap, fmt::Debug, fs, path::PathBuf};

/// Key under which the last searched city is kept.
pub const LAST_CITY_KEY: &str = "lastCity";

/// Small string key-value port for state that outlives a run.
pub trait KeyValueStore: Send + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps everything in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A flat TOML table on disk. Every `set` rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&entries).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(LAST_CITY_KEY).unwrap(), None);

        store.set(LAST_CITY_KEY, "London").unwrap();
        store.set(LAST_CITY_KEY, "Paris").unwrap();
        assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Paris"));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.toml"));
        assert_eq!(store.get(LAST_CITY_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let mut store = FileStore::new(&path);
        store.set(LAST_CITY_KEY, "São Paulo").unwrap();
        store.set("other", "value").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(LAST_CITY_KEY).unwrap().as_deref(), Some("São Paulo"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = FileStore::new(&path).get(LAST_CITY_KEY).unwrap_err();
        assert!(err.to_string().contains("Failed to parse state file"));
    }
}
