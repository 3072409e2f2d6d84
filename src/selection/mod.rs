//! Selection engine
//!
//! Owns the loaded record sets, the group map and the active filter list,
//! and recomputes which records are selected whenever the filters or the
//! combine mode change.
//!
//! A pass runs in two steps:
//!
//! 1. Collection filters are resolved against the group map and replaced
//!    by one membership filter (see [`resolve`]). This happens on every
//!    pass, so the membership always reflects the current group map.
//! 2. Every record is tested against the list, combined with
//!    [`CombineMode`]. An empty list selects everything in either mode.
//!
//! Record sets are never mutated; the result lives in the engine's
//! [`Selection`] table.

pub mod error;
pub mod resolve;
pub mod table;

pub use error::SelectionError;
pub use resolve::ResolutionWarning;
pub use table::{Selection, SelectionCounts, SelectionOverride};

use crate::filters::{FilterError, FilterInstance, FilterList};
use crate::library::{GroupMap, Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How the active filters are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Every filter must include the record
    #[default]
    All,
    /// At least one filter must include the record
    Any,
}

impl CombineMode {
    /// Evaluate a filter list against one record
    #[must_use]
    pub fn matches(self, filters: &[FilterInstance], record: &Record) -> bool {
        if filters.is_empty() {
            return true;
        }
        match self {
            Self::All => filters.iter().all(|f| f.includes(record)),
            Self::Any => filters.iter().any(|f| f.includes(record)),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "and" => Ok(Self::All),
            "any" | "or" => Ok(Self::Any),
            other => Err(format!("Unknown combine mode '{other}' (expected all or any)")),
        }
    }
}

/// Read-only view of the loaded sets and their selection
#[derive(Debug, Clone, Copy)]
pub struct SelectedView<'a> {
    sets: &'a [RecordSet],
    selection: &'a Selection,
}

impl<'a> SelectedView<'a> {
    #[must_use]
    pub const fn new(sets: &'a [RecordSet], selection: &'a Selection) -> Self {
        Self { sets, selection }
    }

    /// Sets with at least one selected record
    pub fn sets(self) -> impl Iterator<Item = &'a RecordSet> + 'a {
        let selection = self.selection;
        self.sets.iter().filter(move |set| selection.is_selected(set.id))
    }

    /// Selected records paired with their set, in load order
    pub fn records(self) -> impl Iterator<Item = (&'a RecordSet, &'a Record)> + 'a {
        let selection = self.selection;
        self.sets
            .iter()
            .flat_map(move |set| selection.selected_records(set).map(move |r| (set, r)))
    }

    #[must_use]
    pub fn counts(&self) -> SelectionCounts {
        self.selection.counts()
    }

    /// Each group's members restricted to the selection
    ///
    /// Groups are listed in ordinal order; groups left without members are
    /// skipped.
    #[must_use]
    pub fn group_membership(&self, groups: &GroupMap) -> Vec<(String, Vec<String>)> {
        let selected: HashSet<&str> = self.records().map(|(_, r)| r.hash.as_str()).collect();
        groups
            .iter()
            .filter_map(|entry| {
                let members: Vec<String> = entry
                    .hashes
                    .iter()
                    .filter(|h| selected.contains(h.as_str()))
                    .cloned()
                    .collect();
                (!members.is_empty()).then(|| (entry.name.clone(), members))
            })
            .collect()
    }
}

/// Recomputes the selected records from the active filters
#[derive(Debug)]
pub struct SelectionEngine {
    sets: Vec<RecordSet>,
    groups: GroupMap,
    filters: FilterList,
    mode: CombineMode,
    selection: Selection,
    counts: SelectionCounts,
}

impl SelectionEngine {
    /// Create an engine with everything selected
    ///
    /// Empty record sets are dropped; they cannot be selected.
    #[must_use]
    pub fn new(sets: Vec<RecordSet>, groups: GroupMap) -> Self {
        let sets: Vec<RecordSet> = sets
            .into_iter()
            .filter(|set| {
                if set.is_empty() {
                    log::warn!("Skipping empty record set '{}'", set.title);
                }
                !set.is_empty()
            })
            .collect();
        let selection = Selection::all(&sets);
        let counts = selection.counts();
        Self {
            sets,
            groups,
            filters: FilterList::new(),
            mode: CombineMode::default(),
            selection,
            counts,
        }
    }

    #[must_use]
    pub fn sets(&self) -> &[RecordSet] {
        &self.sets
    }

    #[must_use]
    pub const fn groups(&self) -> &GroupMap {
        &self.groups
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterList {
        &self.filters
    }

    #[must_use]
    pub const fn mode(&self) -> CombineMode {
        self.mode
    }

    #[must_use]
    pub const fn counts(&self) -> SelectionCounts {
        self.counts
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn view(&self) -> SelectedView<'_> {
        SelectedView::new(&self.sets, &self.selection)
    }

    /// Add a filter and recompute
    ///
    /// # Errors
    ///
    /// Returns `FilterError::ConflictingGroupNegation` if the filter cannot
    /// join the list; the selection is left untouched.
    pub fn add_filter(
        &mut self,
        filter: FilterInstance,
        on_warning: impl FnMut(ResolutionWarning),
    ) -> Result<SelectionCounts, FilterError> {
        self.filters.push(filter)?;
        Ok(self.recompute(on_warning))
    }

    /// Remove the filter at a 1-based ordinal and recompute
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidOrdinal` if no filter has that ordinal.
    pub fn remove_filter(
        &mut self,
        ordinal: usize,
        on_warning: impl FnMut(ResolutionWarning),
    ) -> Result<FilterInstance, FilterError> {
        let removed = self.filters.remove(ordinal)?;
        self.recompute(on_warning);
        Ok(removed)
    }

    pub fn reset_filters(&mut self) -> SelectionCounts {
        self.filters.reset();
        self.recompute(|_| {})
    }

    pub fn set_mode(
        &mut self,
        mode: CombineMode,
        on_warning: impl FnMut(ResolutionWarning),
    ) -> SelectionCounts {
        self.mode = mode;
        self.recompute(on_warning)
    }

    /// Replace the group map and recompute
    ///
    /// Active collection filters are resolved again against the new groups.
    pub fn set_groups(
        &mut self,
        groups: GroupMap,
        on_warning: impl FnMut(ResolutionWarning),
    ) -> SelectionCounts {
        self.groups = groups;
        self.recompute(on_warning)
    }

    /// Resolve collection filters and run a full selection pass
    pub fn recompute(&mut self, mut on_warning: impl FnMut(ResolutionWarning)) -> SelectionCounts {
        if self.filters.has_group_filters() {
            let resolved =
                resolve::resolve_groups(self.filters.as_slice(), &self.groups, &mut on_warning);
            self.filters.replace(resolved);
        }

        let filters = self.filters.as_slice();
        self.selection.clear();
        for set in &self.sets {
            let selected: Vec<Uuid> = set
                .records
                .iter()
                .filter(|record| self.mode.matches(filters, record))
                .map(|record| record.id)
                .collect();
            self.selection.set(set.id, selected);
        }

        self.counts = self.selection.counts();
        log::debug!(
            "Selected {} records in {} sets ({} filters, mode {})",
            self.counts.records,
            self.counts.sets,
            filters.len(),
            self.mode
        );
        self.counts
    }

    /// Run `f` against a view where one set's selection is replaced
    ///
    /// The computed selection is restored afterwards, even if `f` panics.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` if the set is not loaded or a record id does
    /// not belong to it.
    pub fn with_override<R>(
        &mut self,
        set_id: Uuid,
        records: Vec<Uuid>,
        f: impl FnOnce(SelectedView<'_>) -> R,
    ) -> Result<R, SelectionError> {
        let set = self
            .sets
            .iter()
            .find(|set| set.id == set_id)
            .ok_or(SelectionError::UnknownSet(set_id))?;
        let guard = self.selection.scoped_override(set, records)?;
        Ok(f(SelectedView::new(&self.sets, &guard)))
    }

    /// Group membership restricted to the current selection
    #[must_use]
    pub fn group_membership(&self) -> Vec<(String, Vec<String>)> {
        self.view().group_membership(&self.groups)
    }
}
