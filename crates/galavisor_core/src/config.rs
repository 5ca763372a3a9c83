//! Flat key-value configuration file.
//!
//! # Responsibility
//! - Load a JSON object of string values once at process start.
//! - Expose the recognized keys as an enum instead of free-form strings.
//! - Persist every mutation back to the same file.
//!
//! # Invariants
//! - A missing file loads as an empty store; it is created on first save.
//! - The store is passed by reference to whoever needs it; there is no
//!   process-wide instance.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default file name looked up next to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "galavisor_config.json";

/// Recognized configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// SQLite database file path.
    DatabaseConnectionString,
    /// Log level for `init_logging`.
    LogLevel,
    /// Absolute log directory for `init_logging`.
    LogDir,
    /// Comma-separated static admin subjects.
    AdminSubjects,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::DatabaseConnectionString,
    ConfigKey::LogLevel,
    ConfigKey::LogDir,
    ConfigKey::AdminSubjects,
];

impl ConfigKey {
    /// Stable key string stored in the JSON file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DatabaseConnectionString => "DatabaseConnectionString",
            Self::LogLevel => "LogLevel",
            Self::LogDir => "LogDir",
            Self::AdminSubjects => "AdminSubjects",
        }
    }

    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// Parses a key string, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for ConfigKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration load/save errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    MissingKey(ConfigKey),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "config file `{}` io error: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "config file `{}` is not valid: {source}", path.display())
            }
            Self::MissingKey(key) => write!(f, "config value not found: {key}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::MissingKey(_) => None,
        }
    }
}

/// File-backed configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Loads `path`, or starts empty when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let values = if text.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value for `key`, failing when it was never set.
    pub fn get(&self, key: ConfigKey) -> Result<&str, ConfigError> {
        self.values
            .get(key.as_str())
            .map(String::as_str)
            .ok_or(ConfigError::MissingKey(key))
    }

    /// Returns the value for `key`, or `default` when unset or empty.
    pub fn get_or<'a>(&'a self, key: ConfigKey, default: &'a str) -> &'a str {
        match self.get(key) {
            Ok(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    /// Returns whether `key` is set to a non-empty value.
    pub fn exists(&self, key: ConfigKey) -> bool {
        self.get(key).map(|value| !value.is_empty()).unwrap_or(false)
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) -> Result<(), ConfigError> {
        self.values.insert(key.as_str().to_string(), value.into());
        self.save()
    }

    /// Removes `key`; the file is only rewritten when something changed.
    pub fn remove(&mut self, key: ConfigKey) -> Result<(), ConfigError> {
        if self.values.remove(key.as_str()).is_some() {
            self.save()?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.values.clear();
        self.save()
    }

    fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.values).map_err(|source| {
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ConfigKey, ConfigStore};

    #[test]
    fn missing_file_loads_empty_and_reports_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("absent.json")).unwrap();

        let err = store.get(ConfigKey::LogDir).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ConfigKey::LogDir)));
        assert!(!store.exists(ConfigKey::LogDir));
        assert_eq!(store.get_or(ConfigKey::LogLevel, "info"), "info");
    }

    #[test]
    fn set_persists_and_reload_sees_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut store = ConfigStore::load(&path).unwrap();
        store
            .set(ConfigKey::DatabaseConnectionString, "/tmp/galavisor.db")
            .unwrap();
        store.set(ConfigKey::AdminSubjects, "").unwrap();

        let reloaded = ConfigStore::load(&path).unwrap();
        assert_eq!(
            reloaded.get(ConfigKey::DatabaseConnectionString).unwrap(),
            "/tmp/galavisor.db"
        );
        assert!(!reloaded.exists(ConfigKey::AdminSubjects));
    }

    #[test]
    fn remove_and_clear_rewrite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut store = ConfigStore::load(&path).unwrap();
        store.set(ConfigKey::LogDir, "/var/log/galavisor").unwrap();
        store.set(ConfigKey::LogLevel, "debug").unwrap();

        store.remove(ConfigKey::LogDir).unwrap();
        assert!(ConfigStore::load(&path)
            .unwrap()
            .get(ConfigKey::LogDir)
            .is_err());

        store.clear().unwrap();
        assert!(!ConfigStore::load(&path).unwrap().exists(ConfigKey::LogLevel));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = ConfigStore::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn key_parse_is_case_insensitive() {
        assert_eq!(
            ConfigKey::parse("adminsubjects"),
            Some(ConfigKey::AdminSubjects)
        );
        assert_eq!(ConfigKey::parse("nope"), None);
    }
}
