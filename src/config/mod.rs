//! Configuration module for mapsel
//!
//! Manages application configuration: known libraries, the default combine
//! mode and how collection databases are read and written.
//! Configuration is stored in the user's config directory.

mod setup;

pub use setup::first_time_setup;

use crate::groupdb::CURRENT_VERSION;
use crate::library::NameComparison;
use crate::selection::CombineMode;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `config get` and `config set`
pub const KEYS: [&str; 5] = [
    "quiet",
    "combine_mode",
    "groups.case_sensitive",
    "groups.version",
    "groups.sort_on_write",
];

/// Settings for collection databases
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GroupSettings {
    /// Compare collection names case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Version number written to the database header
    #[serde(default = "default_version")]
    pub version: i32,

    /// Sort collections by name before writing
    #[serde(default)]
    pub sort_on_write: bool,
}

const fn default_version() -> i32 {
    CURRENT_VERSION
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            version: CURRENT_VERSION,
            sort_on_write: false,
        }
    }
}

impl GroupSettings {
    #[must_use]
    pub const fn comparison(&self) -> NameComparison {
        NameComparison::from_case_sensitive(self.case_sensitive)
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MapselConfig {
    /// Map of library names to their store directories
    #[serde(default)]
    pub libraries: HashMap<String, PathBuf>,

    /// The library to use when none is specified
    #[serde(default)]
    pub default_library: Option<String>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// How filters combine unless a command says otherwise
    #[serde(default)]
    pub combine_mode: CombineMode,

    #[serde(default)]
    pub groups: GroupSettings,
}

impl MapselConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("mapsel").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, creating a default one if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup(quiet: bool) -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() || quiet {
            Self::load_from(&config_path)
        } else {
            first_time_setup()
        }
    }

    #[must_use]
    pub fn get_library(&self, name: &str) -> Option<&PathBuf> {
        self.libraries.get(name)
    }

    /// Library names, sorted
    #[must_use]
    pub fn list_libraries(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.libraries.keys().collect();
        names.sort();
        names
    }

    /// Add a library; the first one added becomes the default
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a library with this name already exists.
    pub fn add_library(&mut self, name: String, path: PathBuf) -> Result<(), ConfigError> {
        if self.libraries.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Library '{name}' already exists"
            )));
        }
        if self.libraries.is_empty() {
            self.default_library = Some(name.clone());
        }
        self.libraries.insert(name, path);
        Ok(())
    }

    /// Remove a library, clearing the default if it pointed at it
    pub fn remove_library(&mut self, name: &str) -> Option<PathBuf> {
        let removed = self.libraries.remove(name);
        if removed.is_some() && self.default_library.as_deref() == Some(name) {
            self.default_library = None;
        }
        removed
    }

    /// Set the default library
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the library name doesn't exist in the configuration.
    pub fn set_default_library(&mut self, name: String) -> Result<(), ConfigError> {
        if !self.libraries.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Library '{name}' does not exist in configuration"
            )));
        }
        self.default_library = Some(name);
        Ok(())
    }

    /// Resolve a library name (or the default) to its path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no name is given and no default is set, or the
    /// name is unknown.
    pub fn resolve_library(&self, name: Option<&str>) -> Result<(&str, &Path), ConfigError> {
        let name = name.or(self.default_library.as_deref()).ok_or_else(|| {
            ConfigError::Message(
                "No default library set. Use 'mapsel library add <name> <path>' to create one, or pass --library <name>."
                    .to_string(),
            )
        })?;
        let (name, path) = self.libraries.get_key_value(name).ok_or_else(|| {
            ConfigError::Message(format!("Library '{name}' not found in configuration"))
        })?;
        Ok((name.as_str(), path.as_path()))
    }

    /// Read a setting by key
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "quiet" => self.quiet.to_string(),
            "combine_mode" => self.combine_mode.to_string(),
            "groups.case_sensitive" => self.groups.case_sensitive.to_string(),
            "groups.version" => self.groups.version.to_string(),
            "groups.sort_on_write" => self.groups.sort_on_write.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Change a setting by key
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or a value of the wrong type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |expected: &str| {
            ConfigError::Message(format!(
                "Invalid value for {key}: '{value}'. Expected {expected}"
            ))
        };

        match key {
            "quiet" => self.quiet = value.parse().map_err(|_| invalid("true or false"))?,
            "combine_mode" => {
                self.combine_mode = value.parse().map_err(|_| invalid("'all' or 'any'"))?;
            }
            "groups.case_sensitive" => {
                self.groups.case_sensitive = value.parse().map_err(|_| invalid("true or false"))?;
            }
            "groups.version" => {
                self.groups.version = value.parse().map_err(|_| invalid("an integer"))?;
            }
            "groups.sort_on_write" => {
                self.groups.sort_on_write = value.parse().map_err(|_| invalid("true or false"))?;
            }
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown configuration key: '{key}'. Available keys: {}",
                    KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MapselConfig::default();
        assert!(config.libraries.is_empty());
        assert!(config.default_library.is_none());
        assert_eq!(config.combine_mode, CombineMode::All);
        assert_eq!(config.groups.version, CURRENT_VERSION);
        assert_eq!(config.groups.comparison(), NameComparison::CaseInsensitive);
    }

    #[test]
    fn test_first_library_becomes_default() {
        let mut config = MapselConfig::default();
        config.add_library("main".into(), PathBuf::from("/tmp/main")).unwrap();
        config.add_library("other".into(), PathBuf::from("/tmp/other")).unwrap();

        assert_eq!(config.default_library.as_deref(), Some("main"));
        assert!(config.add_library("main".into(), PathBuf::from("/tmp/x")).is_err());
        assert_eq!(config.list_libraries(), vec!["main", "other"]);
    }

    #[test]
    fn test_remove_default_library() {
        let mut config = MapselConfig::default();
        config.add_library("main".into(), PathBuf::from("/tmp/main")).unwrap();

        assert_eq!(config.remove_library("main"), Some(PathBuf::from("/tmp/main")));
        assert!(config.default_library.is_none());
        assert!(config.remove_library("main").is_none());
    }

    #[test]
    fn test_resolve_library() {
        let mut config = MapselConfig::default();
        assert!(config.resolve_library(None).is_err());

        config.add_library("main".into(), PathBuf::from("/tmp/main")).unwrap();
        config.add_library("other".into(), PathBuf::from("/tmp/other")).unwrap();
        assert_eq!(config.resolve_library(None).unwrap().0, "main");
        assert_eq!(
            config.resolve_library(Some("other")).unwrap().1,
            Path::new("/tmp/other")
        );
        assert!(config.resolve_library(Some("missing")).is_err());
        assert!(config.set_default_library("missing".into()).is_err());
    }

    #[test]
    fn test_set_and_get_values() {
        let mut config = MapselConfig::default();
        config.set_value("combine_mode", "any").unwrap();
        config.set_value("groups.case_sensitive", "true").unwrap();
        config.set_value("groups.version", "20240101").unwrap();

        assert_eq!(config.get_value("combine_mode").as_deref(), Some("any"));
        assert_eq!(config.groups.comparison(), NameComparison::CaseSensitive);
        assert_eq!(config.get_value("groups.version").as_deref(), Some("20240101"));

        assert!(config.set_value("quiet", "maybe").is_err());
        assert!(config.set_value("volume", "11").is_err());
        assert!(config.get_value("volume").is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mapsel").join("config.toml");

        let created = MapselConfig::load_from(&path).unwrap();
        assert_eq!(created, MapselConfig::default());
        assert!(path.exists());

        let mut config = MapselConfig::default();
        config.add_library("main".into(), PathBuf::from("/tmp/main")).unwrap();
        config.groups.sort_on_write = true;
        config.combine_mode = CombineMode::Any;
        config.save_to(&path).unwrap();

        assert_eq!(MapselConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "quiet = true\n").unwrap();

        let config = MapselConfig::load_from(&path).unwrap();
        assert!(config.quiet);
        assert_eq!(config.groups, GroupSettings::default());
    }
}
