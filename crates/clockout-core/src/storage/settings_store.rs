//! Settings persistence.
//!
//! The engine and the settings editors share one [`SettingsStore`]. Writes
//! are read-modify-write patches; there is no transaction around them.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::data_dir;
use crate::error::ConfigError;
use crate::settings::{Settings, SettingsPatch, SETTINGS_KEYS};

/// Key-value store holding the single [`Settings`] record.
pub trait SettingsStore: Send + Sync {
    /// Read the record, defaulting any missing key.
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Apply a partial patch and return the stored result.
    fn update(&self, patch: &SettingsPatch) -> Result<Settings, ConfigError>;

    /// Overwrite the whole record.
    fn replace(&self, settings: &Settings) -> Result<(), ConfigError>;

    /// Whether a record has been written before.
    fn is_initialized(&self) -> bool {
        true
    }

    /// Write default values for every key that is not stored yet.
    fn ensure_defaults(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Settings stored as TOML at `~/.config/clockout/settings.toml`.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store in the default data directory.
    pub fn open() -> Result<Self, ConfigError> {
        Ok(Self::with_path(data_dir()?.join("settings.toml")))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<Option<toml::Table>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content
                .parse::<toml::Table>()
                .map(Some)
                .map_err(|e| ConfigError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn write(&self, settings: &Settings) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        match self.read_table()? {
            Some(table) => toml::Value::Table(table)
                .try_into::<Settings>()
                .map(Settings::normalized)
                .map_err(|e| ConfigError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                }),
            None => Ok(Settings::default()),
        }
    }

    fn update(&self, patch: &SettingsPatch) -> Result<Settings, ConfigError> {
        let next = self.load()?.merged(patch);
        self.write(&next)?;
        Ok(next)
    }

    fn replace(&self, settings: &Settings) -> Result<(), ConfigError> {
        self.write(settings)
    }

    fn is_initialized(&self) -> bool {
        self.path.exists()
    }

    fn ensure_defaults(&self) -> Result<(), ConfigError> {
        let complete = match self.read_table()? {
            Some(table) => SETTINGS_KEYS.iter().all(|key| table.contains_key(*key)),
            None => false,
        };
        if complete {
            return Ok(());
        }
        let merged = self.load()?;
        self.write(&merged)
    }
}

/// In-process store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Settings>, ConfigError> {
        self.settings
            .lock()
            .map_err(|_| ConfigError::StorePoisoned)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        Ok(self.lock()?.clone().normalized())
    }

    fn update(&self, patch: &SettingsPatch) -> Result<Settings, ConfigError> {
        let mut guard = self.lock()?;
        patch.apply(&mut guard);
        Ok(guard.clone())
    }

    fn replace(&self, settings: &Settings) -> Result<(), ConfigError> {
        *self.lock()? = settings.clone();
        Ok(())
    }
}
