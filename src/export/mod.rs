//! Exporting the current selection
//!
//! Three targets are supported:
//!
//! - **CSV** and **JSON**: one row per selected record
//! - **Groups**: the selection merged into a group database file, either as
//!   one named group or as the existing groups restricted to the selection
//!
//! Exports take a [`SelectedView`], so a caller can narrow one set with
//! [`SelectionEngine::with_override`](crate::selection::SelectionEngine::with_override)
//! and export just that.

pub mod error;

pub use error::ExportError;

use crate::groupdb::GroupDatabase;
use crate::library::{GroupMap, NameComparison};
use crate::selection::SelectedView;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Output format of an export
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma separated values, one record per line
    Csv,
    /// A JSON array of records
    Json,
    /// Merge into a binary group database
    Groups,
}

/// One exported record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub set_title: String,
    pub artist: String,
    pub author: String,
    pub version: String,
    pub hash: String,
    pub set_online_id: Option<i32>,
    pub stars: f64,
    pub length: f64,
    pub bpm: f64,
    pub mode: &'static str,
    pub status: &'static str,
}

/// Rows for every selected record, in load order
#[must_use]
pub fn rows(view: SelectedView<'_>) -> Vec<ExportRow> {
    view.records()
        .map(|(set, record)| ExportRow {
            set_title: set.title.clone(),
            artist: set.artist.clone(),
            author: record.metadata.author.clone(),
            version: record.metadata.version.clone(),
            hash: record.hash.clone(),
            set_online_id: record.set_online_id,
            stars: record.star_rating,
            length: record.length,
            bpm: record.bpm,
            mode: record.mode.name(),
            status: record.status.name(),
        })
        .collect()
}

/// Write the selection as CSV with a header row
///
/// # Errors
///
/// Returns `ExportError::Csv` if writing fails.
pub fn write_csv(view: SelectedView<'_>, writer: impl Write) -> Result<usize, ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    let rows = rows(view);
    for row in &rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(rows.len())
}

/// Write the selection as a pretty printed JSON array
///
/// # Errors
///
/// Returns `ExportError::Json` if writing fails.
pub fn write_json(view: SelectedView<'_>, mut writer: impl Write) -> Result<usize, ExportError> {
    let rows = rows(view);
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writeln!(writer)?;
    Ok(rows.len())
}

/// Where and how to merge a selection into a group database
#[derive(Debug, Clone)]
pub struct GroupExport {
    pub path: PathBuf,
    pub comparison: NameComparison,
    /// Version written to the header
    pub version: i32,
    /// Sort groups by name before writing
    pub sort: bool,
    /// Put the whole selection into this group instead of the existing ones
    pub group_name: Option<String>,
}

/// Outcome of a group export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupExportSummary {
    /// Groups merged from the selection
    pub groups: usize,
    /// Members not previously in the file
    pub added: usize,
}

/// Merge the selection into a group database and save it
///
/// The target file is created if it does not exist. An existing file that
/// cannot be read is an error and is left untouched.
///
/// # Errors
///
/// Returns `ExportError::EmptySelection` if nothing is selected and
/// `ExportError::GroupDb` if the file cannot be read or written.
pub fn merge_into_groups(
    view: SelectedView<'_>,
    groups: &GroupMap,
    target: &GroupExport,
) -> Result<GroupExportSummary, ExportError> {
    if view.counts().records == 0 {
        return Err(ExportError::EmptySelection);
    }

    let membership = match &target.group_name {
        Some(name) => vec![(
            name.clone(),
            view.records().map(|(_, r)| r.hash.clone()).collect(),
        )],
        None => view.group_membership(groups),
    };

    let mut db = GroupDatabase::open_or_create(&target.path, target.comparison)?;
    let mut summary = GroupExportSummary::default();
    for (name, members) in membership {
        summary.added += db.merge_group(&name, members);
        summary.groups += 1;
    }
    if target.sort {
        db.sort_by_name();
    }
    db.save(&target.path, target.version)?;

    log::info!(
        "Merged {} groups ({} new members) into {}",
        summary.groups,
        summary.added,
        target.path.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Registry;
    use crate::groupdb::CURRENT_VERSION;
    use crate::library::Group;
    use crate::selection::SelectionEngine;
    use crate::testing::{fixed_context, sample_sets};
    use tempfile::TempDir;

    fn engine(filters: &[&str]) -> SelectionEngine {
        let groups = GroupMap::build(
            vec![
                Group::new("Favorites".into(), vec!["a1".into(), "b2".into()]),
                Group::new("Touhou".into(), vec!["c1".into(), "c2".into()]),
            ],
            NameComparison::CaseInsensitive,
        );
        let mut engine = SelectionEngine::new(sample_sets(), groups);
        for line in filters {
            let filter = Registry::parse_command(line, &fixed_context()).unwrap();
            engine.add_filter(filter, |_| {}).unwrap();
        }
        engine
    }

    fn target(dir: &TempDir, group_name: Option<&str>) -> GroupExport {
        GroupExport {
            path: dir.path().join("collection.db"),
            comparison: NameComparison::CaseInsensitive,
            version: CURRENT_VERSION,
            sort: false,
            group_name: group_name.map(String::from),
        }
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let engine = engine(&["stars 6"]);
        let mut out = Vec::new();
        let count = write_csv(engine.view(), &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("set_title,artist,author,version,hash"));
        assert!(lines[1].contains("a3"));
        assert!(lines[2].contains("FREEDOM DiVE"));
    }

    #[test]
    fn test_json_array() {
        let engine = engine(&["mode taiko"]);
        let mut out = Vec::new();
        assert_eq!(write_json(engine.view(), &mut out).unwrap(), 1);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["hash"], "c1");
        assert_eq!(value[0]["mode"], "taiko");
    }

    #[test]
    fn test_groups_export_restricts_existing_groups() {
        let dir = TempDir::new().unwrap();
        let engine = engine(&["stars 2"]);
        let target = target(&dir, None);

        let summary = merge_into_groups(engine.view(), engine.groups(), &target).unwrap();
        // c2 (1.8 stars) is filtered out
        assert_eq!(summary, GroupExportSummary { groups: 2, added: 3 });

        let db = GroupDatabase::open(&target.path, target.comparison).unwrap();
        assert_eq!(db.get("touhou").unwrap().members(), ["c1"]);
    }

    #[test]
    fn test_groups_export_into_named_group_merges() {
        let dir = TempDir::new().unwrap();
        let mut existing = GroupDatabase::new(NameComparison::CaseInsensitive);
        existing.merge_group("Hard", ["zz"]);
        existing.save(dir.path().join("collection.db"), CURRENT_VERSION).unwrap();

        let engine = engine(&["stars 6"]);
        let summary =
            merge_into_groups(engine.view(), engine.groups(), &target(&dir, Some("hard"))).unwrap();
        assert_eq!(summary, GroupExportSummary { groups: 1, added: 2 });

        let db = GroupDatabase::open(dir.path().join("collection.db"), NameComparison::CaseInsensitive)
            .unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.get("Hard").unwrap().members(), ["zz", "a3", "b2"]);
    }

    #[test]
    fn test_empty_selection_is_refused() {
        let dir = TempDir::new().unwrap();
        let engine = engine(&["bpm 999"]);
        let err = merge_into_groups(engine.view(), engine.groups(), &target(&dir, None)).unwrap_err();
        assert!(matches!(err, ExportError::EmptySelection));
        assert!(!dir.path().join("collection.db").exists());
    }

    #[test]
    fn test_corrupt_target_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collection.db");
        std::fs::write(&path, [9, 9]).unwrap();
        let engine = engine(&[]);
        let err = merge_into_groups(engine.view(), engine.groups(), &target(&dir, None)).unwrap_err();
        assert!(matches!(err, ExportError::GroupDb(_)));
        assert_eq!(std::fs::read(&path).unwrap(), vec![9, 9]);
    }

    #[test]
    fn test_single_set_override_export() {
        let mut engine = engine(&[]);
        let set = engine.sets()[1].clone();
        let count = engine
            .with_override(set.id, vec![set.records[1].id], |view| {
                rows(view).into_iter().filter(|r| r.set_title == set.title).count()
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(rows(engine.view()).len(), 7);
    }
}
