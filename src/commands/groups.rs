//! Groups command - list, inspect, import and merge collections

use super::{Result, open_library};
use crate::cli::GroupsCommands;
use crate::config::MapselConfig;
use crate::groupdb::GroupDatabase;
use crate::output;
use std::path::Path;

/// Execute a collection subcommand
///
/// # Errors
///
/// Returns `MapselError` if the library or a collection database cannot be
/// read or written.
pub fn execute(config: &MapselConfig, command: &GroupsCommands, quiet: bool) -> Result<()> {
    let comparison = config.groups.comparison();
    match command {
        GroupsCommands::List { library_args } => {
            let (_, path) = config.resolve_library(library_args.library.as_deref())?;
            let worker = open_library(path)?;
            let groups = worker.run(move |library| library.load_group_map(comparison))??;
            if groups.is_empty() {
                if !quiet {
                    println!("No collections in this library.");
                }
                return Ok(());
            }
            if !quiet {
                println!("Collections:");
            }
            for entry in groups.iter() {
                println!("{}", output::group_entry(entry, quiet));
            }
        }
        GroupsCommands::Show { path, members } => {
            show(path, config, *members, quiet)?;
        }
        GroupsCommands::Import { path, library_args } => {
            let db = GroupDatabase::open(path, comparison)?;
            let groups = db.to_groups();
            let count = groups.len();
            let (name, library_path) = config.resolve_library(library_args.library.as_deref())?;
            let worker = open_library(library_path)?;
            worker.run(move |library| {
                library.replace_groups(&groups)?;
                library.flush()
            })??;
            if !quiet {
                println!("Imported {count} collections into library '{name}'");
            }
        }
        GroupsCommands::Merge { from, into } => {
            let source = GroupDatabase::open(from, comparison)?;
            let mut target = GroupDatabase::open_or_create(into, comparison)?;
            let added = target.merge_from(&source);
            if config.groups.sort_on_write {
                target.sort_by_name();
            }
            target.save(into, config.groups.version)?;
            if !quiet {
                println!(
                    "Merged {} collections ({added} new entries) into {}",
                    source.len(),
                    into.display()
                );
            }
        }
    }
    Ok(())
}

fn show(path: &Path, config: &MapselConfig, members: bool, quiet: bool) -> Result<()> {
    let db = GroupDatabase::open(path, config.groups.comparison())?;
    if !quiet {
        println!(
            "{} (version {}): {} collections, {} entries",
            path.display(),
            db.version(),
            db.len(),
            db.member_count()
        );
    }
    for group in db.groups() {
        println!("{}", output::stored_group(group, quiet));
        if members {
            for hash in group.members() {
                println!("    {hash}");
            }
        }
    }
    Ok(())
}
