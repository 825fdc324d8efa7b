use crate::common::errors::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Key of the desktop sidebar collapse preference (`"true"` / `"false"`).
pub const SIDEBAR_COLLAPSED_KEY: &str = "sufee-sidebar-collapsed";
/// Key of the colour theme preference (`"light"` / `"dark"`).
pub const THEME_KEY: &str = "sufee-theme";

/// Key/value storage behind [`SettingsStore`].
pub trait SettingsBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn remove(&self, key: &str) -> Result<(), SettingsError>;
}

/// Volatile backend, used by tests and when no settings path is configured.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, SettingsError> {
        self.values.lock().map_err(|e| SettingsError::Unavailable {
            reason: e.to_string(),
        })
    }
}

impl SettingsBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON file backend. The whole map is rewritten on every change.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Open (or lazily create) the settings file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| SettingsError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| SettingsError::Corrupted {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// `<config dir>/sufee/settings.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sufee").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        let write_error = |reason: String| SettingsError::Write {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(values).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_error(e.to_string()))
    }

    fn update<F>(&self, f: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut values = self.values.lock().map_err(|e| SettingsError::Unavailable {
            reason: e.to_string(),
        })?;
        f(&mut values);
        self.persist(&values)
    }
}

impl SettingsBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let values = self.values.lock().map_err(|e| SettingsError::Unavailable {
            reason: e.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

/// Colour theme of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{other}'")),
        }
    }
}

/// Typed access to the persisted dashboard preferences.
///
/// Backend failures never surface to callers: reads fall back to defaults and
/// failed writes are logged. Writes are last-write-wins per key.
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn SettingsBackend>,
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// File-backed store, degrading to memory when the file cannot be opened.
    pub fn from_path_or_memory(path: Option<&Path>) -> Self {
        let Some(path) = path
            .map(Path::to_path_buf)
            .or_else(FileBackend::default_path)
        else {
            log::warn!("No settings path available, preferences will not persist");
            return Self::in_memory();
        };

        match FileBackend::open(&path) {
            Ok(backend) => {
                log::info!("Settings stored in {}", path.display());
                Self::new(Arc::new(backend))
            }
            Err(e) => {
                log::warn!("{e}. Falling back to in-memory settings");
                Self::in_memory()
            }
        }
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read setting '{key}': {e}");
                None
            }
        }
    }

    pub fn set_raw(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            log::warn!("Failed to write setting '{key}': {e}");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            log::warn!("Failed to remove setting '{key}': {e}");
        }
    }

    /// Only the exact string `"true"` counts as collapsed.
    pub fn sidebar_collapsed(&self) -> bool {
        self.get_raw(SIDEBAR_COLLAPSED_KEY).as_deref() == Some("true")
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.set_raw(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" });
    }

    /// Persisted theme, `None` when the user never picked one.
    pub fn theme(&self) -> Option<Theme> {
        self.get_raw(THEME_KEY).and_then(|raw| match raw.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::warn!("Ignoring stored theme: {e}");
                None
            }
        })
    }

    pub fn set_theme(&self, theme: Theme) {
        self.set_raw(THEME_KEY, theme.as_str());
    }
}
