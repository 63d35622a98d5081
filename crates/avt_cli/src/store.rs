//! Persisted transpiler preferences.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use avt_transpile::{TranspilerConfig, CONFIG_STORAGE_KEY};
use serde_json::{Map, Value};
use tracing::debug;

/// Somewhere a [`TranspilerConfig`] outlives one run.
pub trait ConfigStore {
    /// The stored config, or the default one if nothing is stored.
    fn load(&self) -> Result<TranspilerConfig>;
    fn save(&self, config: &TranspilerConfig) -> Result<()>;
    /// Forget the stored config.
    fn reset(&self) -> Result<()>;
}

/// A JSON file holding a flat object; the config lives under
/// [`CONFIG_STORAGE_KEY`]. Other keys in the file are preserved.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/aiscript-version-transpiler/storage.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aiscript-version-transpiler").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text).with_context(|| format!("{} is not a JSON object", self.path.display()))
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text).with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<TranspilerConfig> {
        let entries = self.read_entries()?;
        let Some(value) = entries.get(CONFIG_STORAGE_KEY) else {
            debug!(path = %self.path.display(), "no stored config");
            return Ok(TranspilerConfig::default());
        };
        serde_json::from_value(value.clone())
            .with_context(|| format!("invalid config stored in {}", self.path.display()))
    }

    fn save(&self, config: &TranspilerConfig) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(CONFIG_STORAGE_KEY.to_string(), serde_json::to_value(config)?);
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), ?config, "saved config");
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(CONFIG_STORAGE_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("nested").join("storage.json"))
    }

    #[test]
    fn missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load().unwrap(), TranspilerConfig::default());
    }

    #[test]
    fn saved_config_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let config = TranspilerConfig {
            set_version_notation: true,
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[CONFIG_STORAGE_KEY]["setVersionNotation"], Value::Bool(true));
    }

    #[test]
    fn other_keys_survive_save_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let store = FileStore::new(&path);

        store
            .save(&TranspilerConfig {
                set_version_notation: true,
            })
            .unwrap();
        store.reset().unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(CONFIG_STORAGE_KEY).is_none());
        assert_eq!(store.load().unwrap(), TranspilerConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(FileStore::new(&path).load().is_err());
    }
}
