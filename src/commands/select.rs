//! Select command - print the records matching the filters

use super::{Result, prepare_selection};
use crate::cli::SelectionArgs;
use crate::config::MapselConfig;
use crate::output;
use crate::presets::{PresetManager, default_preset_path};
use crate::store::{Library, LibraryWorker};

/// Execute the select command
///
/// # Errors
///
/// Returns `MapselError` if the selection cannot be built or the preset
/// cannot be saved.
pub fn execute(
    worker: &LibraryWorker<Library>,
    config: &MapselConfig,
    args: &SelectionArgs,
    save_preset: Option<&str>,
    preset_desc: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let prepared = prepare_selection(worker, config, args, quiet)?;
    let view = prepared.engine.view();

    let mut current = None;
    for (set, record) in view.records() {
        if !quiet && current != Some(set.id) {
            println!("{}", output::set_heading(set));
            current = Some(set.id);
        }
        println!("{}", output::record_line(set, record, quiet));
    }

    if !quiet {
        println!();
        println!("{}", output::counts_line(prepared.engine.counts()));
    }

    if let Some(name) = save_preset {
        let manager = PresetManager::new(default_preset_path()?);
        manager.create(
            name,
            preset_desc.unwrap_or_default().to_string(),
            prepared.engine.mode(),
            prepared.lines,
        )?;
        if !quiet {
            println!("Saved preset '{name}'");
        }
    }

    Ok(())
}
