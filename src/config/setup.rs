//! Interactive setup wizard for first-time configuration
//!
//! Runs when mapsel starts without a config file and is not in quiet mode.

use super::MapselConfig;
use config::ConfigError;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::path::PathBuf;

fn prompt_error(e: dialoguer::Error) -> ConfigError {
    ConfigError::Message(format!("Failed to read input: {e}"))
}

/// Interactive first-time setup - prompts for a library name and location
///
/// 1. Prompts for a library name (default: "default")
/// 2. Prompts for the store location (default: system data directory)
/// 3. Asks whether collection names are case-sensitive
/// 4. Creates and saves the configuration
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
pub fn first_time_setup() -> Result<MapselConfig, ConfigError> {
    println!("Welcome to mapsel! Let's set up your first library.\n");

    let default_data_dir = dirs::data_local_dir()
        .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?
        .join("mapsel");

    let theme = ColorfulTheme::default();
    let name: String = Input::with_theme(&theme)
        .with_prompt("Library name")
        .default("default".to_string())
        .interact_text()
        .map_err(prompt_error)?;

    let default_path = default_data_dir.join(&name);
    let path: String = Input::with_theme(&theme)
        .with_prompt("Library location")
        .default(default_path.to_string_lossy().to_string())
        .interact_text()
        .map_err(prompt_error)?;

    let case_sensitive = Confirm::with_theme(&theme)
        .with_prompt("Treat collection names as case-sensitive?")
        .default(false)
        .interact()
        .map_err(prompt_error)?;

    let mut config = MapselConfig::default();
    config.add_library(name, PathBuf::from(path))?;
    config.groups.case_sensitive = case_sensitive;
    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
