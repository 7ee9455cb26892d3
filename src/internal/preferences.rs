use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Durable string key-value storage for user preferences.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept in a JSON object on disk.
///
/// The file is only created on the first write.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    values: BTreeMap<String, String>,
    file_path: PathBuf,
    reset: bool,
}

impl FilePreferences {
    /// Default location: `<config_dir>/news-time/preferences.json`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("news-time");
        Ok(config_dir.join("preferences.json"))
    }

    /// Load the store at `path` (or the default location).
    ///
    /// A file that is not a JSON object starts the store empty and is
    /// rewritten on the next `set`; `was_reset` reports that case. Entries
    /// whose value is not a string are skipped.
    pub fn load_or_create(path: Option<PathBuf>) -> Result<Self> {
        let file_path = match path {
            Some(p) => p,
            None => Self::default_path()?,
        };
        info!(preferences_file = %file_path.display(), "Resolved preferences file path");

        let mut reset = false;
        let values = match file_path.exists() {
            true => {
                let content =
                    fs::read_to_string(&file_path).context("Failed to read preferences file")?;
                match serde_json::from_str::<Map<String, Value>>(&content) {
                    Ok(map) => {
                        let values: BTreeMap<String, String> = map
                            .into_iter()
                            .filter_map(|(k, v)| match v {
                                Value::String(s) => Some((k, s)),
                                _ => None,
                            })
                            .collect();
                        info!(count = values.len(), "Loaded preferences from file");
                        values
                    }
                    Err(e) => {
                        warn!(
                            preferences_file = %file_path.display(),
                            error = %e,
                            "Preferences file is unreadable; starting empty"
                        );
                        reset = true;
                        BTreeMap::new()
                    }
                }
            }
            false => BTreeMap::new(),
        };

        Ok(Self {
            values,
            file_path,
            reset,
        })
    }

    /// Whether an unreadable file was discarded on load.
    pub fn was_reset(&self) -> bool {
        self.reset
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.file_path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize preferences")?;
        fs::write(&self.file_path, content).context("Failed to write preferences file")?;
        info!(preferences_file = %self.file_path.display(), "Saved preferences to file");
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Preferences that live only for the process; used when the file store is
/// unavailable and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
