//! Export command - write the selection to a file or stdout

use super::{Result, prepare_selection};
use crate::cli::SelectionArgs;
use crate::config::MapselConfig;
use crate::export::{self, ExportFormat, GroupExport};
use crate::store::{Library, LibraryWorker};
use crate::MapselError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Execute the export command
///
/// # Errors
///
/// Returns `MapselError` if the selection cannot be built, the arguments do
/// not fit the format, or writing fails.
pub fn execute(
    worker: &LibraryWorker<Library>,
    config: &MapselConfig,
    args: &SelectionArgs,
    format: ExportFormat,
    output: Option<&Path>,
    group_name: Option<&str>,
    quiet: bool,
) -> Result<()> {
    if group_name.is_some() && format != ExportFormat::Groups {
        return Err(MapselError::InvalidInput(
            "--group-name only applies to --format groups".into(),
        ));
    }

    let prepared = prepare_selection(worker, config, args, quiet)?;
    let view = prepared.engine.view();

    match format {
        ExportFormat::Csv | ExportFormat::Json => {
            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout().lock()),
            };
            let count = if format == ExportFormat::Csv {
                export::write_csv(view, writer)?
            } else {
                export::write_json(view, writer)?
            };
            if !quiet && let Some(path) = output {
                println!("Exported {count} records to {}", path.display());
            }
        }
        ExportFormat::Groups => {
            let path = output.ok_or_else(|| {
                MapselError::InvalidInput("--format groups needs an output file (-o PATH)".into())
            })?;
            let target = GroupExport {
                path: path.to_path_buf(),
                comparison: config.groups.comparison(),
                version: config.groups.version,
                sort: config.groups.sort_on_write,
                group_name: group_name.map(String::from),
            };
            let summary = export::merge_into_groups(view, prepared.engine.groups(), &target)?;
            if !quiet {
                println!(
                    "Merged {} collections ({} new entries) into {}",
                    summary.groups,
                    summary.added,
                    path.display()
                );
            }
        }
    }
    Ok(())
}
