//! Group database codec
//!
//! Reads, merges and writes the game's binary collection file: a versioned
//! list of named groups, each holding record content hashes. See [`codec`]
//! for the byte layout.
//!
//! Group names are unique under the database's [`NameComparison`]; merging
//! `"favorites"` into a case-insensitive database that already holds
//! `"Favorites"` extends the existing group. Groups and members keep the
//! order in which they were first seen, so writing is deterministic.
//!
//! # Examples
//!
//! ```
//! use mapsel::groupdb::{CURRENT_VERSION, GroupDatabase};
//! use mapsel::library::NameComparison;
//!
//! let mut db = GroupDatabase::new(NameComparison::CaseInsensitive);
//! db.merge_group("Favorites", ["a", "b"]);
//! db.merge_group("favorites", ["b", "c"]);
//! assert_eq!(db.len(), 1);
//!
//! let mut bytes = Vec::new();
//! db.write_to(&mut bytes, CURRENT_VERSION).unwrap();
//! let parsed = GroupDatabase::read_from(bytes.as_slice(), NameComparison::CaseInsensitive).unwrap();
//! assert_eq!(parsed.get("FAVORITES").unwrap().members(), ["a", "b", "c"]);
//! ```

pub mod codec;
pub mod error;

pub use error::GroupDbError;

use crate::library::{Group, NameComparison};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Version written by this program
pub const CURRENT_VERSION: i32 = 20_150_203;

/// One named group of member hashes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGroup {
    name: String,
    members: Vec<String>,
    lookup: HashSet<String>,
}

impl StoredGroup {
    fn new(name: String) -> Self {
        Self {
            name,
            members: Vec::new(),
            lookup: HashSet::new(),
        }
    }

    /// Display name, the first spelling merged
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in first-seen order
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.lookup.contains(hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn insert(&mut self, hash: String) -> bool {
        if self.lookup.contains(&hash) {
            return false;
        }
        self.lookup.insert(hash.clone());
        self.members.push(hash);
        true
    }
}

/// In-memory group database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDatabase {
    version: i32,
    comparison: NameComparison,
    groups: Vec<StoredGroup>,
    index: HashMap<String, usize>,
}

impl GroupDatabase {
    /// Empty database at [`CURRENT_VERSION`]
    #[must_use]
    pub fn new(comparison: NameComparison) -> Self {
        Self {
            version: CURRENT_VERSION,
            comparison,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Version read from the file, or [`CURRENT_VERSION`] for a new database
    #[must_use]
    pub const fn version(&self) -> i32 {
        self.version
    }

    #[must_use]
    pub const fn comparison(&self) -> NameComparison {
        self.comparison
    }

    /// Merge members into a group, creating it if needed
    ///
    /// Returns the number of members that were not present before.
    pub fn merge_group<I, S>(&mut self, name: &str, members: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = self.comparison.key(name).into_owned();
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.groups.push(StoredGroup::new(name.to_string()));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[idx];
        let mut added = 0;
        for member in members {
            if group.insert(member.into()) {
                added += 1;
            }
        }
        added
    }

    /// Groups in first-seen order
    #[must_use]
    pub fn groups(&self) -> &[StoredGroup] {
        &self.groups
    }

    /// Look up a group under the database's name comparison
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StoredGroup> {
        self.index
            .get(&*self.comparison.key(name))
            .map(|&idx| &self.groups[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total member count across all groups
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(StoredGroup::len).sum()
    }

    /// Merge every group of another database, returning the members added
    pub fn merge_from(&mut self, other: &Self) -> usize {
        other
            .groups
            .iter()
            .map(|group| self.merge_group(&group.name, group.members.iter().cloned()))
            .sum()
    }

    /// The groups as library groups, in file order
    #[must_use]
    pub fn to_groups(&self) -> Vec<Group> {
        self.groups
            .iter()
            .map(|group| Group::new(group.name.clone(), group.members.clone()))
            .collect()
    }

    /// Order groups by name under the database's comparison
    pub fn sort_by_name(&mut self) {
        let comparison = self.comparison;
        self.groups
            .sort_by(|a, b| comparison.key(&a.name).cmp(&comparison.key(&b.name)));
        self.index = self
            .groups
            .iter()
            .enumerate()
            .map(|(idx, group)| (comparison.key(&group.name).into_owned(), idx))
            .collect();
    }

    /// Parse a database, merging every group read
    ///
    /// Groups whose names collide under `comparison` are coalesced.
    ///
    /// # Errors
    ///
    /// Returns `GroupDbError` if the stream fails or the data is malformed.
    pub fn read_from(reader: impl Read, comparison: NameComparison) -> Result<Self, GroupDbError> {
        let mut reader = reader;
        let mut db = Self::new(comparison);
        db.version = codec::read_i32(&mut reader)?;

        let group_count = codec::read_count(&mut reader, "group")?;
        for _ in 0..group_count {
            let name = codec::read_string(&mut reader)?;
            let member_count = codec::read_count(&mut reader, "member")?;
            let mut members = Vec::new();
            for _ in 0..member_count {
                members.push(codec::read_string(&mut reader)?);
            }
            db.merge_group(&name, members);
        }

        log::debug!(
            "Read group database version {} with {} groups",
            db.version,
            db.len()
        );
        Ok(db)
    }

    /// Serialize with the given version in the header
    ///
    /// # Errors
    ///
    /// Returns `GroupDbError` if a count does not fit the format or the
    /// stream fails.
    pub fn write_to(&self, writer: impl Write, version: i32) -> Result<(), GroupDbError> {
        let mut writer = writer;
        codec::write_i32(&mut writer, version)?;
        codec::write_count(&mut writer, "group", self.groups.len())?;
        for group in &self.groups {
            codec::write_string(&mut writer, &group.name)?;
            codec::write_count(&mut writer, "member", group.members.len())?;
            for member in &group.members {
                codec::write_string(&mut writer, member)?;
            }
        }
        writer.flush().map_err(GroupDbError::WriteStream)
    }

    /// Open an existing database file
    ///
    /// # Errors
    ///
    /// Returns `GroupDbError::Open` if the file cannot be opened (including
    /// when it does not exist) and a parse error if it is malformed.
    pub fn open(path: impl AsRef<Path>, comparison: NameComparison) -> Result<Self, GroupDbError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GroupDbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_from(BufReader::new(file), comparison)
    }

    /// Open a database file, starting fresh only if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `GroupDbError` if the file exists but cannot be opened or parsed.
    pub fn open_or_create(
        path: impl AsRef<Path>,
        comparison: NameComparison,
    ) -> Result<Self, GroupDbError> {
        let path = path.as_ref();
        match Self::open(path, comparison) {
            Err(GroupDbError::Open { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No group database at {}, starting a new one",
                    path.display()
                );
                Ok(Self::new(comparison))
            }
            other => other,
        }
    }

    /// Write the database to `path`
    ///
    /// The data goes to a temporary sibling first and is renamed over the
    /// target, so a failed write never leaves a half-written file. An
    /// existing file is copied to `<path>.backup` first.
    ///
    /// # Errors
    ///
    /// Returns `GroupDbError::Write` if any file operation fails.
    pub fn save(&self, path: impl AsRef<Path>, version: i32) -> Result<(), GroupDbError> {
        let path = path.as_ref();
        let write_err = |source| GroupDbError::Write {
            path: path.to_path_buf(),
            source,
        };

        if path.exists() {
            fs::copy(path, sibling(path, "backup")).map_err(write_err)?;
        }

        let temp = sibling(path, "tmp");
        let file = File::create(&temp).map_err(write_err)?;
        let result = self
            .write_to(BufWriter::new(&file), version)
            .and_then(|()| file.sync_all().map_err(GroupDbError::WriteStream));
        if let Err(err) = result {
            let _ = fs::remove_file(&temp);
            return Err(match err {
                GroupDbError::WriteStream(source) => write_err(source),
                other => other,
            });
        }
        drop(file);
        fs::rename(&temp, path).map_err(write_err)?;

        log::info!(
            "Wrote {} groups ({} members) to {}",
            self.len(),
            self.member_count(),
            path.display()
        );
        Ok(())
    }
}

/// `<path>.<suffix>` next to `path`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn round_trip(db: &GroupDatabase) -> GroupDatabase {
        let mut bytes = Vec::new();
        db.write_to(&mut bytes, CURRENT_VERSION).unwrap();
        GroupDatabase::read_from(bytes.as_slice(), db.comparison()).unwrap()
    }

    #[test]
    fn test_round_trip_any_size() {
        for group_count in 0..5 {
            let mut db = GroupDatabase::new(NameComparison::CaseSensitive);
            for g in 0..group_count {
                let members: Vec<String> = (0..g * 3).map(|m| format!("{g:02}{m:030}")).collect();
                db.merge_group(&format!("Group {g}"), members);
            }
            assert_eq!(round_trip(&db), db, "{group_count} groups");
        }
    }

    #[test]
    fn test_empty_database_layout() {
        let db = GroupDatabase::new(NameComparison::default());
        let mut bytes = Vec::new();
        db.write_to(&mut bytes, CURRENT_VERSION).unwrap();
        let mut expected = CURRENT_VERSION.to_le_bytes().to_vec();
        expected.extend_from_slice(&0i32.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_byte_layout() {
        let mut db = GroupDatabase::new(NameComparison::default());
        db.merge_group("Fav", ["ab"]);
        let mut bytes = Vec::new();
        db.write_to(&mut bytes, 7).unwrap();
        assert_eq!(
            bytes,
            vec![7, 0, 0, 0, 1, 0, 0, 0, 3, b'F', b'a', b'v', 1, 0, 0, 0, 2, b'a', b'b']
        );
    }

    #[test]
    fn test_writes_current_version_not_read_version() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&20_140_101i32.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        let db = GroupDatabase::read_from(bytes.as_slice(), NameComparison::default()).unwrap();
        assert_eq!(db.version(), 20_140_101);

        let mut out = Vec::new();
        db.write_to(&mut out, CURRENT_VERSION).unwrap();
        assert_eq!(&out[..4], &CURRENT_VERSION.to_le_bytes());
    }

    #[test]
    fn test_merge_case_insensitive_coalesces() {
        let mut db = GroupDatabase::new(NameComparison::CaseInsensitive);
        assert_eq!(db.merge_group("Favorites", ["a", "b"]), 2);
        assert_eq!(db.merge_group("favorites", ["b", "c"]), 1);
        assert_eq!(db.len(), 1);
        let group = db.get("favorites").unwrap();
        assert_eq!(group.name(), "Favorites");
        assert_eq!(group.members(), ["a", "b", "c"]);
    }

    #[test]
    fn test_merge_case_sensitive_keeps_both() {
        let mut db = GroupDatabase::new(NameComparison::CaseSensitive);
        db.merge_group("Favorites", ["a", "b"]);
        db.merge_group("favorites", ["b", "c"]);
        assert_eq!(db.len(), 2);
        assert_eq!(db.get("Favorites").unwrap().members(), ["a", "b"]);
        assert_eq!(db.get("favorites").unwrap().members(), ["b", "c"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut db = GroupDatabase::new(NameComparison::default());
        db.merge_group("Practice", ["x", "y"]);
        let before = db.clone();
        assert_eq!(db.merge_group("Practice", ["y", "x"]), 0);
        assert_eq!(db, before);
    }

    #[test]
    fn test_read_coalesces_colliding_names() {
        let mut writer = GroupDatabase::new(NameComparison::CaseSensitive);
        writer.merge_group("Stream", ["a"]);
        writer.merge_group("STREAM", ["b"]);
        let mut bytes = Vec::new();
        writer.write_to(&mut bytes, CURRENT_VERSION).unwrap();

        let db = GroupDatabase::read_from(bytes.as_slice(), NameComparison::CaseInsensitive).unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.get("stream").unwrap().members(), ["a", "b"]);
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let mut db = GroupDatabase::new(NameComparison::default());
        db.merge_group("Favorites", ["abc"]);
        let mut bytes = Vec::new();
        db.write_to(&mut bytes, CURRENT_VERSION).unwrap();
        bytes.pop();
        assert!(matches!(
            GroupDatabase::read_from(bytes.as_slice(), NameComparison::default()),
            Err(GroupDbError::Truncated)
        ));
        assert!(matches!(
            GroupDatabase::read_from(&[1u8, 0][..], NameComparison::default()),
            Err(GroupDbError::Truncated)
        ));
    }

    #[test]
    fn test_sort_by_name() {
        let mut db = GroupDatabase::new(NameComparison::CaseInsensitive);
        db.merge_group("beta", ["1"]);
        db.merge_group("Alpha", ["2"]);
        db.sort_by_name();
        let names: Vec<&str> = db.groups().iter().map(StoredGroup::name).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
        assert_eq!(db.get("BETA").unwrap().members(), ["1"]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collection.db");
        assert!(matches!(
            GroupDatabase::open(&path, NameComparison::default()),
            Err(GroupDbError::Open { .. })
        ));
        let db = GroupDatabase::open_or_create(&path, NameComparison::default()).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn test_open_or_create_does_not_hide_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collection.db");
        fs::write(&path, [1, 2, 3]).unwrap();
        assert!(matches!(
            GroupDatabase::open_or_create(&path, NameComparison::default()),
            Err(GroupDbError::Truncated)
        ));
    }

    #[test]
    fn test_save_and_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collection.db");
        let mut db = GroupDatabase::new(NameComparison::default());
        db.merge_group("Favorites", ["a"]);
        db.save(&path, CURRENT_VERSION).unwrap();
        assert!(!sibling(&path, "backup").exists());
        assert!(!sibling(&path, "tmp").exists());

        db.merge_group("Practice", ["b"]);
        db.save(&path, CURRENT_VERSION).unwrap();
        let backup = GroupDatabase::open(sibling(&path, "backup"), NameComparison::default()).unwrap();
        assert_eq!(backup.len(), 1);
        let saved = GroupDatabase::open(&path, NameComparison::default()).unwrap();
        assert_eq!(saved, db);
    }

    #[test]
    fn test_merge_from_other_database() {
        let mut target = GroupDatabase::new(NameComparison::CaseInsensitive);
        target.merge_group("Favorites", ["a"]);
        let mut source = GroupDatabase::new(NameComparison::CaseInsensitive);
        source.merge_group("FAVORITES", ["a", "b"]);
        source.merge_group("Practice", ["c"]);

        assert_eq!(target.merge_from(&source), 2);
        assert_eq!(target.len(), 2);
        assert_eq!(target.get("favorites").unwrap().members(), ["a", "b"]);
        assert_eq!(target.groups()[0].name(), "Favorites");
    }

    #[test]
    fn test_to_groups_keeps_order() {
        let mut db = GroupDatabase::new(NameComparison::CaseSensitive);
        db.merge_group("Zeta", ["z"]);
        db.merge_group("Alpha", ["a1", "a2"]);
        let groups = db.to_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Zeta");
        assert_eq!(groups[1].hashes, vec!["a1", "a2"]);
    }
}
