//! Library data model
//!
//! Records (single beatmap difficulties) live inside record sets (beatmap sets).
//! Groups are user-curated named collections of records, referenced by content hash.
//!
//! The types here are plain owned values: they are loaded once from the
//! record store and are immutable for the rest of the session.

pub mod groups;

pub use groups::{GroupEntry, GroupMap, NameComparison};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Game mode of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Osu,
    Taiko,
    Catch,
    Mania,
}

impl Mode {
    /// All modes in ruleset id order
    pub const ALL: [Self; 4] = [Self::Osu, Self::Taiko, Self::Catch, Self::Mania];

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Osu => 0,
            Self::Taiko => 1,
            Self::Catch => 2,
            Self::Mania => 3,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Osu => "osu",
            Self::Taiko => "taiko",
            Self::Catch => "catch",
            Self::Mania => "mania",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Online ranking status of a record
///
/// The numeric codes follow the values used by the game client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    LocallyModified,
    None,
    Graveyard,
    Wip,
    Pending,
    Ranked,
    Approved,
    Qualified,
    Loved,
}

impl Status {
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::LocallyModified => -4,
            Self::None => -3,
            Self::Graveyard => -2,
            Self::Wip => -1,
            Self::Pending => 0,
            Self::Ranked => 1,
            Self::Approved => 2,
            Self::Qualified => 3,
            Self::Loved => 4,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LocallyModified => "locally modified",
            Self::None => "none",
            Self::Graveyard => "graveyard",
            Self::Wip => "wip",
            Self::Pending => "pending",
            Self::Ranked => "ranked",
            Self::Approved => "approved",
            Self::Qualified => "qualified",
            Self::Loved => "loved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-record metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub title: String,
    pub artist: String,
    /// Mapper who created the difficulty
    pub author: String,
    /// Difficulty name
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub source: String,
    /// Space separated free-text tags
    #[serde(default)]
    pub tags: String,
}

/// A single difficulty inside a record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    /// MD5 content hash, unique within the owning set
    pub hash: String,
    #[serde(default)]
    pub online_id: Option<i32>,
    /// Online id of the owning set, copied at load time
    #[serde(default)]
    pub set_online_id: Option<i32>,
    pub metadata: RecordMetadata,
    pub star_rating: f64,
    /// Length in seconds
    pub length: f64,
    pub bpm: f64,
    pub mode: Mode,
    pub status: Status,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub date_ranked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
}

impl Record {
    /// Iterate over the record's whitespace separated tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.metadata.tags.split_whitespace()
    }
}

/// An ordered list of records sharing one song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub id: Uuid,
    #[serde(default)]
    pub online_id: Option<i32>,
    pub title: String,
    pub artist: String,
    pub records: Vec<Record>,
}

impl RecordSet {
    #[must_use]
    pub fn new(id: Uuid, online_id: Option<i32>, title: String, artist: String) -> Self {
        Self {
            id,
            online_id,
            title,
            artist,
            records: Vec::new(),
        }
    }

    /// Add a record, stamping the set's online id onto it
    ///
    /// Returns `false` without inserting if a record with the same hash
    /// is already part of the set.
    pub fn push(&mut self, mut record: Record) -> bool {
        if self.records.iter().any(|r| r.hash == record.hash) {
            return false;
        }
        record.set_online_id = self.online_id;
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn record(&self, id: Uuid) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// A named group of record hashes as delivered by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub hashes: Vec<String>,
}

impl Group {
    #[must_use]
    pub const fn new(name: String, hashes: Vec<String>) -> Self {
        Self { name, hashes }
    }
}
