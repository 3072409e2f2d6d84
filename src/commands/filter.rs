//! Filter command - interactive filter editing

use super::{Result, prepare_selection};
use crate::cli::SelectionArgs;
use crate::config::MapselConfig;
use crate::filters::FilterContext;
use crate::session::Session;
use crate::store::{Library, LibraryWorker};
use std::io;

const HELP: &str = "Enter a filter (e.g. 'stars 6'), 'remove N', 'reset', 'mode all|any', \
'list' or 'reload'. An empty line exits.";

/// Execute the filter command
///
/// Starts from the filters given on the command line and reads further
/// commands from stdin until an empty line.
///
/// # Errors
///
/// Returns `MapselError` if the starting selection cannot be built or
/// reading stdin fails.
pub fn execute(
    worker: &LibraryWorker<Library>,
    config: &MapselConfig,
    args: &SelectionArgs,
    quiet: bool,
) -> Result<()> {
    let mut prepared = prepare_selection(worker, config, args, quiet)?;
    let comparison = config.groups.comparison();

    if !quiet {
        println!("{HELP}");
    }

    let mut session = Session::new(&mut prepared.engine, FilterContext::now())
        .with_reload(|| worker.run(move |library| library.load_group_map(comparison))?);
    session.run(io::stdin().lock(), io::stdout().lock())?;

    let commands = session.engine().filters().commands();
    if !quiet && !commands.is_empty() {
        println!("Final filters:");
        for command in commands {
            println!("  {command}");
        }
    }
    Ok(())
}
