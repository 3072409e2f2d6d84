//! Engine-owned selection side table
//!
//! The table maps each record set to the ids of its currently selected
//! records. Record sets themselves are never mutated. Temporary narrowing of
//! one set (e.g. exporting a single set from a detail view) goes through
//! [`Selection::scoped_override`], whose guard puts the computed selection
//! back when it is dropped.

use super::error::SelectionError;
use crate::library::{Record, RecordSet};
use std::collections::HashMap;
use std::ops::Deref;
use uuid::Uuid;

/// Aggregate counts of one selection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCounts {
    pub records: usize,
    pub sets: usize,
}

/// Selected record ids per record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashMap<Uuid, Vec<Uuid>>,
}

impl Selection {
    /// Every record of every set selected
    #[must_use]
    pub fn all(sets: &[RecordSet]) -> Self {
        let selected = sets
            .iter()
            .map(|set| (set.id, set.records.iter().map(|r| r.id).collect()))
            .collect();
        Self { selected }
    }

    pub(crate) fn set(&mut self, set_id: Uuid, records: Vec<Uuid>) {
        self.selected.insert(set_id, records);
    }

    pub(crate) fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected record ids of a set, empty if nothing is selected
    #[must_use]
    pub fn selected(&self, set_id: Uuid) -> &[Uuid] {
        self.selected.get(&set_id).map_or(&[], Vec::as_slice)
    }

    /// A set counts as selected if at least one of its records is
    #[must_use]
    pub fn is_selected(&self, set_id: Uuid) -> bool {
        !self.selected(set_id).is_empty()
    }

    /// Selected records of a set, in the set's own order
    pub fn selected_records<'a>(&'a self, set: &'a RecordSet) -> impl Iterator<Item = &'a Record> {
        let ids = self.selected(set.id);
        set.records.iter().filter(move |r| ids.contains(&r.id))
    }

    #[must_use]
    pub fn counts(&self) -> SelectionCounts {
        self.selected
            .values()
            .filter(|ids| !ids.is_empty())
            .fold(SelectionCounts::default(), |acc, ids| SelectionCounts {
                records: acc.records + ids.len(),
                sets: acc.sets + 1,
            })
    }

    /// Temporarily replace the selection of one set
    ///
    /// The previous selection is restored when the returned guard is dropped,
    /// including during unwinding.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` if the set is unknown or a record id does not
    /// belong to the set.
    pub fn scoped_override<'a>(
        &'a mut self,
        set: &RecordSet,
        records: Vec<Uuid>,
    ) -> Result<SelectionOverride<'a>, SelectionError> {
        if !self.selected.contains_key(&set.id) {
            return Err(SelectionError::UnknownSet(set.id));
        }
        if let Some(&record) = records.iter().find(|id| set.record(**id).is_none()) {
            return Err(SelectionError::RecordNotInSet {
                set: set.id,
                record,
            });
        }

        let previous = self.selected.insert(set.id, records);
        Ok(SelectionOverride {
            selection: self,
            set_id: set.id,
            previous,
        })
    }
}

/// Guard restoring a set's computed selection on drop
#[derive(Debug)]
pub struct SelectionOverride<'a> {
    selection: &'a mut Selection,
    set_id: Uuid,
    previous: Option<Vec<Uuid>>,
}

impl Deref for SelectionOverride<'_> {
    type Target = Selection;

    fn deref(&self) -> &Self::Target {
        self.selection
    }
}

impl Drop for SelectionOverride<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                self.selection.selected.insert(self.set_id, previous);
            }
            None => {
                self.selection.selected.remove(&self.set_id);
            }
        }
    }
}
