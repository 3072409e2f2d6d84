//! Session view of all groups with 1-based ordinal indices
//!
//! A `GroupMap` is built once when the library is loaded. Names are unique
//! under the configured `NameComparison`; groups whose names collide are
//! coalesced into the first one seen.

use super::Group;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// How group names are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameComparison {
    /// Ordinal comparison, "Favorites" and "favorites" are different groups
    CaseSensitive,
    /// "Favorites" and "favorites" are the same group
    #[default]
    CaseInsensitive,
}

impl NameComparison {
    #[must_use]
    pub const fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::CaseSensitive
        } else {
            Self::CaseInsensitive
        }
    }

    /// Normalized lookup key for a name
    #[must_use]
    pub fn key<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::CaseSensitive => Cow::Borrowed(name),
            Self::CaseInsensitive => Cow::Owned(name.to_lowercase()),
        }
    }

    #[must_use]
    pub fn names_equal(self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

/// A group with its load-order ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    /// 1-based position in load order
    pub ordinal: usize,
    pub hashes: Vec<String>,
}

/// Resolved view of all groups for one session
#[derive(Debug, Clone, Default)]
pub struct GroupMap {
    comparison: NameComparison,
    entries: Vec<GroupEntry>,
    index: HashMap<String, usize>,
}

impl GroupMap {
    #[must_use]
    pub fn new(comparison: NameComparison) -> Self {
        Self {
            comparison,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build the map from the store's groups, preserving their order
    #[must_use]
    pub fn build(groups: impl IntoIterator<Item = Group>, comparison: NameComparison) -> Self {
        let mut map = Self::new(comparison);
        for group in groups {
            map.insert(group);
        }
        map
    }

    fn insert(&mut self, group: Group) {
        let key = self.comparison.key(&group.name).into_owned();
        if let Some(&idx) = self.index.get(&key) {
            log::debug!(
                "Coalescing group '{}' into '{}'",
                group.name,
                self.entries[idx].name
            );
            let entry = &mut self.entries[idx];
            let mut known: HashSet<String> = entry.hashes.iter().cloned().collect();
            entry
                .hashes
                .extend(group.hashes.into_iter().filter(|h| known.insert(h.clone())));
            return;
        }

        let mut seen = HashSet::new();
        let hashes = group
            .hashes
            .into_iter()
            .filter(|h| seen.insert(h.clone()))
            .collect();
        self.index.insert(key, self.entries.len());
        self.entries.push(GroupEntry {
            name: group.name,
            ordinal: self.entries.len() + 1,
            hashes,
        });
    }

    #[must_use]
    pub const fn comparison(&self) -> NameComparison {
        self.comparison
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&GroupEntry> {
        self.index
            .get(&*self.comparison.key(name))
            .map(|&idx| &self.entries[idx])
    }

    #[must_use]
    pub fn by_ordinal(&self, ordinal: usize) -> Option<&GroupEntry> {
        ordinal
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, hashes: &[&str]) -> Group {
        Group::new(name.into(), hashes.iter().map(|h| (*h).to_string()).collect())
    }

    #[test]
    fn test_ordinals_follow_load_order() {
        let map = GroupMap::build(
            vec![group("Favorites", &["a"]), group("Practice", &["b"])],
            NameComparison::CaseInsensitive,
        );
        assert_eq!(map.by_ordinal(1).unwrap().name, "Favorites");
        assert_eq!(map.by_ordinal(2).unwrap().name, "Practice");
        assert!(map.by_ordinal(0).is_none());
        assert!(map.by_ordinal(3).is_none());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let map = GroupMap::build(vec![group("Favorites", &["a"])], NameComparison::CaseInsensitive);
        assert!(map.by_name("FAVORITES").is_some());
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let map = GroupMap::build(vec![group("Favorites", &["a"])], NameComparison::CaseSensitive);
        assert!(map.by_name("Favorites").is_some());
        assert!(map.by_name("favorites").is_none());
    }

    #[test]
    fn test_colliding_names_coalesce() {
        let map = GroupMap::build(
            vec![group("Favorites", &["a", "b"]), group("favorites", &["b", "c"])],
            NameComparison::CaseInsensitive,
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.by_ordinal(1).unwrap().hashes, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_hashes_within_group_are_dropped() {
        let map = GroupMap::build(vec![group("x", &["a", "a", "b"])], NameComparison::CaseSensitive);
        assert_eq!(map.by_name("x").unwrap().hashes, vec!["a", "b"]);
    }
}
