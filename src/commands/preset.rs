//! Preset command - manage saved filter lists

use super::Result;
use crate::cli::PresetCommands;
use crate::output;
use crate::presets::{PresetManager, default_preset_path};
use crate::selection::CombineMode;

/// Execute a preset subcommand
///
/// # Errors
///
/// Returns `MapselError` if preset storage cannot be accessed or the
/// operation is rejected.
pub fn execute(command: &PresetCommands, quiet: bool) -> Result<()> {
    let manager = PresetManager::new(default_preset_path()?);
    match command {
        PresetCommands::List => {
            let presets = manager.list()?;
            if presets.is_empty() {
                if !quiet {
                    println!("No saved presets.");
                    println!("Save one with: mapsel preset save <name> <filter>...");
                }
                return Ok(());
            }
            if !quiet {
                println!("Saved presets:");
            }
            for preset in &presets {
                println!("{}", output::preset_summary(preset, quiet));
            }
        }
        PresetCommands::Show { name } => {
            print!("{}", manager.get(name)?);
        }
        PresetCommands::Save {
            name,
            filters,
            description,
            any,
        } => {
            let mode = if *any { CombineMode::Any } else { CombineMode::All };
            manager.create(
                name,
                description.clone().unwrap_or_default(),
                mode,
                filters.clone(),
            )?;
            if !quiet {
                println!("Saved preset '{name}'");
            }
        }
        PresetCommands::Delete { name } => {
            manager.delete(name)?;
            if !quiet {
                println!("Deleted preset '{name}'");
            }
        }
        PresetCommands::Rename { old_name, new_name } => {
            manager.rename(old_name, new_name.clone())?;
            if !quiet {
                println!("Renamed preset '{old_name}' to '{new_name}'");
            }
        }
    }
    Ok(())
}
