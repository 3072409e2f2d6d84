//! Import command - replace a library's contents with a dump

use super::Result;
use crate::groupdb::GroupDatabase;
use crate::library::NameComparison;
use crate::store::{Library, LibraryDump, LibraryWorker};
use std::path::Path;

/// Execute the import command
///
/// With `groups`, the dump's collections are replaced by those read from a
/// collection database file.
///
/// # Errors
///
/// Returns `MapselError` if a file cannot be read or the library cannot be
/// written.
pub fn execute(
    worker: &LibraryWorker<Library>,
    dump: &Path,
    groups: Option<&Path>,
    comparison: NameComparison,
    quiet: bool,
) -> Result<()> {
    let mut dump = LibraryDump::from_path(dump)?;
    if let Some(path) = groups {
        dump.groups = GroupDatabase::open(path, comparison)?.to_groups();
    }

    let summary = worker.run(move |library| library.import_dump(dump))??;
    if !quiet {
        println!(
            "Imported {} records in {} sets, {} collections",
            summary.records, summary.sets, summary.groups
        );
    }
    Ok(())
}
