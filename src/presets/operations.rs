//! Preset CRUD operations
//!
//! This module provides a `PresetManager` for managing saved presets.

use super::error::PresetError;
use super::types::{Preset, PresetStorage, validate_preset_name};
use crate::selection::CombineMode;
use std::fs;
use std::path::{Path, PathBuf};

/// Manager for preset operations
///
/// Encapsulates the storage path and provides methods for preset CRUD operations.
///
/// # Examples
///
/// ```no_run
/// use mapsel::presets::PresetManager;
/// use std::path::PathBuf;
///
/// let manager = PresetManager::new(PathBuf::from("presets.toml"));
/// let presets = manager.list().unwrap();
/// ```
pub struct PresetManager {
    path: PathBuf,
    auto_backup: bool,
}

impl PresetManager {
    /// Create a new `PresetManager` with the specified storage path
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            auto_backup: true,
        }
    }

    /// Create a `PresetManager` with auto-backup disabled
    #[must_use]
    pub const fn without_backup(path: PathBuf) -> Self {
        Self {
            path,
            auto_backup: false,
        }
    }

    /// Load presets from the storage file
    ///
    /// Returns an empty `PresetStorage` if the file doesn't exist.
    fn load(&self) -> Result<PresetStorage, PresetError> {
        if !self.path.exists() {
            return Ok(PresetStorage::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let storage: PresetStorage = toml::from_str(&contents)?;
        Ok(storage)
    }

    /// Save presets to the storage file
    ///
    /// Creates the parent directory if it doesn't exist.
    /// Creates a backup if `auto_backup` is enabled.
    fn save(&self, storage: &PresetStorage) -> Result<(), PresetError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.auto_backup && self.path.exists() {
            let backup_path = self.path.with_extension("toml.backup");
            fs::copy(&self.path, backup_path)?;
        }

        let toml = toml::to_string_pretty(storage)?;
        fs::write(&self.path, toml)?;
        log::debug!(
            "Saved {} presets to {}",
            storage.presets.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Create a new preset
    ///
    /// # Errors
    ///
    /// Returns `PresetError` if:
    /// - The preset name is invalid
    /// - A filter line does not parse
    /// - A preset with the same name already exists
    /// - The storage file cannot be saved
    pub fn create(
        &self,
        name: &str,
        description: String,
        combine_mode: CombineMode,
        filters: Vec<String>,
    ) -> Result<Preset, PresetError> {
        let mut storage = self.load()?;

        let preset = Preset::new(name.to_string(), description, combine_mode, filters);
        storage.add(preset.clone())?;

        self.save(&storage)?;

        Ok(preset)
    }

    /// Get a preset by name
    ///
    /// # Errors
    ///
    /// Returns `PresetError` if the storage file cannot be loaded or the
    /// preset is not found.
    pub fn get(&self, name: &str) -> Result<Preset, PresetError> {
        let storage = self.load()?;
        storage
            .get(name)
            .cloned()
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }

    /// Delete a preset by name
    ///
    /// # Errors
    ///
    /// Returns `PresetError` if the preset is not found or the storage file
    /// cannot be saved.
    pub fn delete(&self, name: &str) -> Result<Preset, PresetError> {
        let mut storage = self.load()?;

        let preset = storage
            .remove(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;

        self.save(&storage)?;

        Ok(preset)
    }

    /// Rename a preset
    ///
    /// # Errors
    ///
    /// Returns `PresetError` if:
    /// - The old preset is not found
    /// - The new name is invalid
    /// - A preset with the new name already exists
    /// - The storage file cannot be saved
    pub fn rename(&self, old_name: &str, new_name: String) -> Result<(), PresetError> {
        let mut storage = self.load()?;

        validate_preset_name(&new_name)
            .map_err(|e| PresetError::InvalidName(new_name.clone(), e))?;

        if storage.contains(&new_name) {
            return Err(PresetError::AlreadyExists(new_name));
        }

        let preset = storage
            .get_mut(old_name)
            .ok_or_else(|| PresetError::NotFound(old_name.to_string()))?;
        preset.name = new_name;

        self.save(&storage)?;

        Ok(())
    }

    /// List all presets, most used first
    ///
    /// # Errors
    ///
    /// Returns `PresetError` if the storage file cannot be loaded.
    pub fn list(&self) -> Result<Vec<Preset>, PresetError> {
        let storage = self.load()?;
        Ok(storage.most_used().into_iter().cloned().collect())
    }

    /// Record preset usage (increment use count, update `last_used` timestamp)
    ///
    /// # Errors
    ///
    /// Returns `PresetError` if the preset is not found or the storage file
    /// cannot be saved.
    pub fn record_use(&self, name: &str) -> Result<(), PresetError> {
        let mut storage = self.load()?;

        let preset = storage
            .get_mut(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;

        preset.record_use();

        self.save(&storage)?;

        Ok(())
    }

    /// Get the storage path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> PresetManager {
        PresetManager::without_backup(dir.path().join("presets.toml"))
    }

    fn lines(filters: &[&str]) -> Vec<String> {
        filters.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_create_and_load_preset() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        manager
            .create("streams", "Stream maps".into(), CombineMode::All, lines(&["bpm 200"]))
            .unwrap();

        let loaded = manager.get("streams").unwrap();
        assert_eq!(loaded.name, "streams");
        assert_eq!(loaded.filters, vec!["bpm 200"]);
    }

    #[test]
    fn test_create_rejects_bad_filter() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        let err = manager
            .create("broken", String::new(), CombineMode::All, lines(&["volume 11"]))
            .unwrap_err();
        assert!(matches!(err, PresetError::InvalidFilter { .. }));
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_preset() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager
            .create("to-delete", String::new(), CombineMode::Any, lines(&["stars 5"]))
            .unwrap();

        assert!(manager.delete("to-delete").is_ok());
        assert!(matches!(manager.get("to-delete"), Err(PresetError::NotFound(_))));
        assert!(manager.delete("to-delete").is_err());
    }

    #[test]
    fn test_rename_preset() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager
            .create("old-name", String::new(), CombineMode::All, lines(&["stars 5"]))
            .unwrap();

        manager.rename("old-name", "new-name".to_string()).unwrap();
        assert!(manager.get("old-name").is_err());
        assert!(manager.get("new-name").is_ok());
        assert!(manager.rename("new-name", "bad name".to_string()).is_err());
    }

    #[test]
    fn test_list_orders_by_use() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager
            .create("rare", String::new(), CombineMode::All, lines(&["stars 5"]))
            .unwrap();
        manager
            .create("common", String::new(), CombineMode::All, lines(&["stars 6"]))
            .unwrap();
        manager.record_use("common").unwrap();
        manager.record_use("common").unwrap();

        let names: Vec<String> = manager.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["common", "rare"]);
        assert_eq!(manager.get("common").unwrap().use_count, 2);
    }

    #[test]
    fn test_backup_is_written() {
        let dir = TempDir::new().unwrap();
        let manager = PresetManager::new(dir.path().join("presets.toml"));
        manager
            .create("one", String::new(), CombineMode::All, lines(&["stars 1"]))
            .unwrap();
        manager
            .create("two", String::new(), CombineMode::All, lines(&["stars 2"]))
            .unwrap();
        assert!(dir.path().join("presets.toml.backup").exists());
    }
}
