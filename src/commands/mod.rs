//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs the operation against a library. The library is owned by a
//! [`LibraryWorker`]; handlers only reach it through [`LibraryWorker::run`].

pub mod export;
pub mod filter;
pub mod groups;
pub mod import;
pub mod keys;
pub mod preset;
pub mod select;

pub use export::execute as export;
pub use filter::execute as filter;
pub use groups::execute as groups;
pub use import::execute as import;
pub use keys::execute as keys;
pub use preset::execute as preset;
pub use select::execute as select;

use crate::cli::SelectionArgs;
use crate::config::MapselConfig;
use crate::filters::{FilterContext, Registry};
use crate::output;
use crate::presets::{PresetManager, default_preset_path};
use crate::selection::{CombineMode, ResolutionWarning, SelectionEngine};
use crate::store::{Library, LibraryWorker};
use crate::MapselError;
use std::path::Path;

type Result<T> = std::result::Result<T, MapselError>;

/// Open a library store on its own worker thread
///
/// # Errors
///
/// Returns `MapselError::Store` if the store cannot be opened or the worker
/// cannot be started.
pub fn open_library(path: &Path) -> Result<LibraryWorker<Library>> {
    let library = Library::open(path)?;
    log::info!("Opened library at {}", path.display());
    Ok(LibraryWorker::spawn(library)?)
}

/// An engine with the command line's filters applied
pub struct PreparedSelection {
    pub engine: SelectionEngine,
    /// Filter commands in the order they were added, preset lines first
    pub lines: Vec<String>,
}

/// Load the library into an engine and apply preset and command line filters
///
/// Unresolved collection names are printed as warnings unless `quiet`.
///
/// # Errors
///
/// Returns `MapselError` if loading fails, the preset does not exist, or a
/// filter command does not parse.
pub fn prepare_selection(
    worker: &LibraryWorker<Library>,
    config: &MapselConfig,
    args: &SelectionArgs,
    quiet: bool,
) -> Result<PreparedSelection> {
    let comparison = config.groups.comparison();
    let sets = worker.run(|library| library.load_sets())??;
    let groups = worker.run(move |library| library.load_group_map(comparison))??;
    let mut engine = SelectionEngine::new(sets, groups);

    let ctx = FilterContext::now();
    let mut mode = config.combine_mode;
    let mut lines = Vec::new();

    if let Some(name) = &args.preset {
        let manager = PresetManager::new(default_preset_path()?);
        let preset = manager.get(name)?;
        mode = preset.combine_mode;
        lines.extend(preset.filters.iter().cloned());
        manager.record_use(name)?;
    }
    lines.extend(args.filters.iter().cloned());
    let mode: CombineMode = args.combine_mode().unwrap_or(mode);

    // Every pass resolves all collection filters again; report each missing name once
    let mut warnings: Vec<ResolutionWarning> = Vec::new();
    let mut note = |w: ResolutionWarning| {
        if !warnings.iter().any(|seen| seen.name == w.name) {
            warnings.push(w);
        }
    };
    engine.set_mode(mode, &mut note);
    for line in &lines {
        let filter = Registry::parse_command(line, &ctx)?;
        engine.add_filter(filter, &mut note)?;
    }

    if !quiet {
        for warning in &warnings {
            eprintln!("{}", output::warning_line(&warning.to_string()));
        }
    }

    Ok(PreparedSelection { engine, lines })
}
