use super::app_config::AppConfig;
use super::state_config::StateConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_FILE_NAME: &str = "state.toml";

/// Failure reading or writing the config files.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode {file}: {source}")]
    Encode {
        file: PathBuf,
        source: toml::ser::Error,
    },
}

/// Owns `config.toml` (user settings) and `state.toml` (remembered between
/// runs, currently the last weather city).
pub struct StorageManager {
    dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigDirNotFound`] when the platform has none.
    pub fn new() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::with_dir)
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Uses `dir` instead of the platform directory.
    #[must_use]
    pub const fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Reads the settings from `path_override` or `config.toml`. A missing
    /// file is created with the defaults; a malformed one is left untouched
    /// and the defaults are used for this run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults
    /// cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.dir.join(CONFIG_FILE_NAME), Path::to_path_buf);
        match read_toml(&path)? {
            Some(config) => Ok(config),
            None => {
                info!(path = %path.display(), "No config file, writing defaults");
                let config = AppConfig::default();
                write_toml(&path, &config)?;
                Ok(config)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if `state.toml` exists but cannot be read.
    pub fn load_state(&self) -> Result<StateConfig, ConfigError> {
        Ok(read_toml(&self.dir.join(STATE_FILE_NAME))?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if `state.toml` cannot be written.
    pub fn save_state(&self, state: &StateConfig) -> Result<(), ConfigError> {
        write_toml(&self.dir.join(STATE_FILE_NAME), state)
    }
}

/// `Ok(None)` when the file does not exist. Malformed content is logged and
/// read as the type's default.
fn read_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<Option<T>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&content).unwrap_or_else(|e| {
        warn!(error = %e, path = %path.display(), "Malformed file, using defaults");
        T::default()
    })))
}

/// Atomic write through a temp file in the target directory.
fn write_toml<T: Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(data).map_err(|source| ConfigError::Encode {
        file: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), "Saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_writes_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("campusdesk"));

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.courses.page_size, 15);

        let written =
            fs::read_to_string(dir.path().join("campusdesk").join(CONFIG_FILE_NAME)).unwrap();
        let reparsed: AppConfig = toml::from_str(&written).unwrap();
        assert_eq!(reparsed.weather.default_city, "London");
    }

    #[test]
    fn test_load_config_keeps_malformed_file() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "[courses\npage_size = ").unwrap();

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.courses.page_size, 15);
        let content = fs::read_to_string(&config_file).unwrap();
        assert_eq!(content, "[courses\npage_size = ");
    }

    #[test]
    fn test_config_override_path() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[courses]\npage_size = 25\n").unwrap();

        let config = manager.load_config(Some(&custom)).unwrap();
        assert_eq!(config.courses.page_size, 25);
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_save_and_load_state() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let state = StateConfig {
            last_city: Some("Lagos".to_string()),
        };
        manager.save_state(&state).unwrap();

        assert!(dir.path().join(STATE_FILE_NAME).exists());
        assert_eq!(manager.load_state().unwrap(), state);
    }

    #[test]
    fn test_missing_state_is_default() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        assert_eq!(manager.load_state().unwrap(), StateConfig::default());
    }
}
