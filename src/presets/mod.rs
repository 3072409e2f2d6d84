//! Preset management module
//!
//! Presets are named filter lists. They let users save a combination of
//! filters together with its combine mode and recall it later with
//! `mapsel select -F <name>`.
//!
//! # Storage
//!
//! Presets are stored in TOML format at `~/.config/mapsel/presets.toml`.
//!
//! # Examples
//!
//! ```no_run
//! use mapsel::presets::PresetManager;
//! use mapsel::selection::CombineMode;
//! use std::path::PathBuf;
//!
//! let manager = PresetManager::new(PathBuf::from("presets.toml"));
//!
//! manager.create(
//!     "hard-streams",
//!     "Fast stream maps".to_string(),
//!     CombineMode::All,
//!     vec!["bpm 200".to_string(), "stars 6".to_string()],
//! ).unwrap();
//!
//! let preset = manager.get("hard-streams").unwrap();
//! println!("{preset}");
//! ```

pub mod error;
pub mod operations;
pub mod types;

pub use error::PresetError;
pub use operations::PresetManager;
pub use types::{Preset, PresetStorage, validate_preset_name};

use std::path::PathBuf;

/// Get the default preset storage path
///
/// Returns `~/.config/mapsel/presets.toml` (platform-specific)
///
/// # Errors
///
/// Returns `PresetError` if the config directory cannot be determined
pub fn default_preset_path() -> Result<PathBuf, PresetError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        PresetError::Config(config::ConfigError::Message(
            "Could not determine config directory".to_string(),
        ))
    })?;

    Ok(config_dir.join("mapsel").join("presets.toml"))
}
