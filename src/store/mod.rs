//! Record store for mapsel
//!
//! Persists the imported library using sled as the embedded database backend.
//!
//! Uses three sled trees:
//! - `meta`: schema version
//! - `sets`: load sequence number -> record set
//! - `groups`: 1-based ordinal -> group
//!
//! The store is only touched at startup (to load the library) and on import.
//! Interactive sessions hand it to a [`LibraryWorker`] so all reads and
//! writes happen on a single thread.

use crate::library::{Group, GroupMap, NameComparison, RecordSet};
use sled::{Db, Tree};
use std::path::Path;

pub mod dump;
pub mod error;
pub mod types;
pub mod worker;

pub use dump::LibraryDump;
pub use error::StoreError;
pub use types::{GroupKey, SetKey};
pub use worker::LibraryWorker;

/// Version of the on-disk layout
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_KEY: &[u8] = b"schema_version";

/// Result of importing a dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub sets: usize,
    pub records: usize,
    pub groups: usize,
}

/// Store wrapper that encapsulates all database operations
pub struct Library {
    db: Db,
    meta: Tree,
    sets: Tree,
    groups: Tree,
}

impl Library {
    /// Opens or creates a library at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use mapsel::store::Library;
    /// let library = Library::open("my_library").unwrap();
    /// println!("{} sets", library.count_sets());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened, and
    /// `StoreError::SchemaMismatch` if it was written with another layout.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let meta = db.open_tree("meta")?;
        let sets = db.open_tree(SetKey::TREE)?;
        let groups = db.open_tree(GroupKey::TREE)?;

        match meta.get(SCHEMA_KEY)? {
            Some(raw) => {
                let found: u32 = types::decode(&raw)?;
                if found != SCHEMA_VERSION {
                    return Err(StoreError::SchemaMismatch {
                        found,
                        expected: SCHEMA_VERSION,
                    });
                }
            }
            None => {
                meta.insert(SCHEMA_KEY, types::encode(&SCHEMA_VERSION)?)?;
            }
        }

        Ok(Self {
            db,
            meta,
            sets,
            groups,
        })
    }

    /// Append a record set, returning its sequence key
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if id generation, encoding or the write fails.
    pub fn insert_set(&self, set: &RecordSet) -> Result<SetKey, StoreError> {
        let key = SetKey(self.db.generate_id()?);
        self.sets.insert(key.to_bytes(), types::encode(set)?)?;
        Ok(key)
    }

    /// Append a group after the existing ones
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if reading the last key, encoding or the write fails.
    pub fn insert_group(&self, group: &Group) -> Result<GroupKey, StoreError> {
        let next = match self.groups.last()? {
            Some((key, _)) => GroupKey::from_bytes(&key)?.0 + 1,
            None => 1,
        };
        let key = GroupKey(next);
        self.groups.insert(key.to_bytes(), types::encode(group)?)?;
        Ok(key)
    }

    /// Replace all groups, numbering them from 1 in the given order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if clearing, encoding or a write fails.
    pub fn replace_groups(&self, groups: &[Group]) -> Result<(), StoreError> {
        self.groups.clear()?;
        for (ordinal, group) in (1u32..).zip(groups) {
            self.groups
                .insert(GroupKey(ordinal).to_bytes(), types::encode(group)?)?;
        }
        Ok(())
    }

    /// Load all record sets in insertion order
    ///
    /// Empty sets are skipped; a set without records cannot be selected.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if iteration or decoding fails.
    pub fn load_sets(&self) -> Result<Vec<RecordSet>, StoreError> {
        let mut sets = Vec::with_capacity(self.sets.len());
        for result in &self.sets {
            let (key, value) = result?;
            let set: RecordSet = types::decode(&value)?;
            if set.is_empty() {
                log::warn!(
                    "Skipping empty record set '{}' (key {})",
                    set.title,
                    SetKey::from_bytes(&key)?.0
                );
                continue;
            }
            sets.push(set);
        }
        Ok(sets)
    }

    /// Load all groups in ordinal order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if iteration or decoding fails.
    pub fn load_groups(&self) -> Result<Vec<Group>, StoreError> {
        self.groups
            .iter()
            .map(|result| {
                let (_, value) = result?;
                types::decode(&value)
            })
            .collect()
    }

    /// Load the groups keyed for resolution
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if loading the groups fails.
    pub fn load_group_map(&self, comparison: NameComparison) -> Result<GroupMap, StoreError> {
        Ok(GroupMap::build(self.load_groups()?, comparison))
    }

    #[must_use]
    pub fn count_sets(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn count_groups(&self) -> usize {
        self.groups.len()
    }

    /// Count records across all sets
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if iteration or decoding fails.
    pub fn count_records(&self) -> Result<usize, StoreError> {
        self.sets.iter().try_fold(0, |acc, result| {
            let (_, value) = result?;
            let set: RecordSet = types::decode(&value)?;
            Ok(acc + set.len())
        })
    }

    /// Replace the whole library with the contents of a dump
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if clearing or any write fails.
    pub fn import_dump(&self, dump: LibraryDump) -> Result<ImportSummary, StoreError> {
        self.clear()?;

        let mut summary = ImportSummary::default();
        for dump_set in dump.sets {
            let set = dump_set.into_set();
            if set.is_empty() {
                log::warn!("Not importing empty record set '{}'", set.title);
                continue;
            }
            summary.records += set.len();
            summary.sets += 1;
            self.insert_set(&set)?;
        }

        self.replace_groups(&dump.groups)?;
        summary.groups = dump.groups.len();
        self.flush()?;

        log::info!(
            "Imported {} records in {} sets and {} groups",
            summary.records,
            summary.sets,
            summary.groups
        );
        Ok(summary)
    }

    /// Remove all sets and groups, keeping the schema marker
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a clear operation fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.sets.clear()?;
        self.groups.clear()?;
        Ok(())
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Schema version recorded in the store
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the marker cannot be read.
    pub fn schema_version(&self) -> Result<Option<u32>, StoreError> {
        self.meta
            .get(SCHEMA_KEY)?
            .map(|raw| types::decode(&raw))
            .transpose()
    }
}
