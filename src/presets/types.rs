//! Preset data structures and types
//!
//! This module defines the core data structures for saved presets:
//! - `Preset`: A named filter list with its combine mode and usage statistics
//! - `PresetStorage`: Container for all presets

use super::error::PresetError;
use crate::filters::{FilterContext, FilterInstance, Registry};
use crate::selection::CombineMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved filter list
///
/// Filters are stored as the command lines that recreate them (`stars 6`,
/// `!collection Favorites`), so time based filters are re-evaluated against
/// the moment the preset is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    /// Unique preset name
    pub name: String,

    /// Preset description (optional)
    #[serde(default)]
    pub description: String,

    /// How the filters are combined
    #[serde(default)]
    pub combine_mode: CombineMode,

    /// Filter command lines in list order
    pub filters: Vec<String>,

    /// When the preset was created
    pub created: DateTime<Utc>,

    /// When the preset was last used
    pub last_used: DateTime<Utc>,

    /// Number of times the preset has been used
    #[serde(default)]
    pub use_count: u32,
}

impl Preset {
    /// Create a new preset
    #[must_use]
    pub fn new(
        name: String,
        description: String,
        combine_mode: CombineMode,
        filters: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            name,
            description,
            combine_mode,
            filters,
            created: now,
            last_used: now,
            use_count: 0,
        }
    }

    /// Record that this preset was used
    pub fn record_use(&mut self) {
        self.use_count += 1;
        self.last_used = Utc::now();
    }

    /// Parse the stored filter lines
    ///
    /// # Errors
    ///
    /// Returns `PresetError::InvalidFilter` for the first line that does not parse.
    pub fn compile(&self, ctx: &FilterContext) -> Result<Vec<FilterInstance>, PresetError> {
        self.filters
            .iter()
            .map(|line| {
                Registry::parse_command(line, ctx).map_err(|source| PresetError::InvalidFilter {
                    line: line.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Validate the preset
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the preset has no filters,
    /// or a filter line does not parse.
    pub fn validate(&self) -> Result<(), PresetError> {
        validate_preset_name(&self.name)
            .map_err(|e| PresetError::InvalidName(self.name.clone(), e))?;
        if self.filters.is_empty() {
            return Err(PresetError::Empty(self.name.clone()));
        }
        self.compile(&FilterContext::now())?;
        Ok(())
    }
}

/// Storage container for all presets
///
/// This is the root structure that gets serialized to TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PresetStorage {
    /// All saved presets
    #[serde(rename = "preset", default)]
    pub presets: Vec<Preset>,
}

impl PresetStorage {
    /// Create a new empty preset storage
    #[must_use]
    pub const fn new() -> Self {
        Self {
            presets: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Preset> {
        self.presets.iter_mut().find(|p| p.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.presets.iter().any(|p| p.name == name)
    }

    /// Add a preset
    ///
    /// # Errors
    ///
    /// Returns an error if a preset with the same name already exists or the
    /// preset is invalid.
    pub fn add(&mut self, preset: Preset) -> Result<(), PresetError> {
        if self.contains(&preset.name) {
            return Err(PresetError::AlreadyExists(preset.name));
        }
        preset.validate()?;
        self.presets.push(preset);
        Ok(())
    }

    /// Remove a preset by name
    pub fn remove(&mut self, name: &str) -> Option<Preset> {
        let pos = self.presets.iter().position(|p| p.name == name)?;
        Some(self.presets.remove(pos))
    }

    /// Presets sorted by use count (most used first)
    #[must_use]
    pub fn most_used(&self) -> Vec<&Preset> {
        let mut sorted: Vec<&Preset> = self.presets.iter().collect();
        sorted.sort_by(|a, b| b.use_count.cmp(&a.use_count));
        sorted
    }
}

/// Validate a preset name
///
/// Preset names must:
/// - Be 1-64 characters long
/// - Contain only alphanumeric characters, hyphens, and underscores
///
/// # Errors
///
/// Returns an error if the name is empty, too long or contains invalid characters.
pub fn validate_preset_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Preset name cannot be empty".to_string());
    }

    if name.len() > 64 {
        return Err(format!(
            "Preset name too long (max 64 chars): {}",
            name.len()
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!(
            "Preset name '{name}' contains invalid characters (only alphanumeric, '-', and '_' allowed)"
        ));
    }

    Ok(())
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Preset: {}", self.name)?;

        if !self.description.is_empty() {
            writeln!(f, "Description: {}", self.description)?;
        }

        writeln!(f)?;
        writeln!(f, "Combine: {}", self.combine_mode.as_str().to_uppercase())?;
        for (idx, line) in self.filters.iter().enumerate() {
            writeln!(f, "  {}. {line}", idx + 1)?;
        }

        writeln!(f)?;
        writeln!(f, "Created: {}", self.created.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(
            f,
            "Last Used: {}",
            self.last_used.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Use Count: {}", self.use_count)?;

        Ok(())
    }
}
