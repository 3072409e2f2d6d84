//! JSON library dumps
//!
//! A dump is how records get into the store: an external exporter writes the
//! game's library as JSON and `mapsel import` loads it. Record ids are
//! assigned on import; the dump only carries content hashes.
//!
//! ```json
//! {
//!   "sets": [
//!     {
//!       "online_id": 39804,
//!       "title": "FREEDOM DiVE",
//!       "artist": "xi",
//!       "records": [
//!         {
//!           "hash": "da8aae79c8f3306b5d65ec951874a7fb",
//!           "metadata": { "title": "FREEDOM DiVE", "artist": "xi", "author": "Nakagawa-Kanon", "version": "FOUR DIMENSIONS" },
//!           "star_rating": 7.1, "length": 257, "bpm": 222.22,
//!           "mode": "osu", "status": "ranked",
//!           "date_added": "2021-03-04T18:22:00Z"
//!         }
//!       ]
//!     }
//!   ],
//!   "groups": [{ "name": "Favorites", "hashes": ["da8aae79c8f3306b5d65ec951874a7fb"] }]
//! }
//! ```

use super::error::StoreError;
use crate::library::{Group, Mode, Record, RecordMetadata, RecordSet, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use uuid::Uuid;

/// A complete library as exported by an external tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryDump {
    #[serde(default)]
    pub sets: Vec<DumpSet>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpSet {
    #[serde(default)]
    pub online_id: Option<i32>,
    pub title: String,
    pub artist: String,
    pub records: Vec<DumpRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpRecord {
    pub hash: String,
    #[serde(default)]
    pub online_id: Option<i32>,
    #[serde(default)]
    pub metadata: RecordMetadata,
    #[serde(default)]
    pub star_rating: f64,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub bpm: f64,
    pub mode: Mode,
    pub status: Status,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub date_ranked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
}

impl DumpRecord {
    fn into_record(self) -> Record {
        Record {
            id: Uuid::new_v4(),
            hash: self.hash,
            online_id: self.online_id,
            set_online_id: None,
            metadata: self.metadata,
            star_rating: self.star_rating,
            length: self.length,
            bpm: self.bpm,
            mode: self.mode,
            status: self.status,
            date_added: self.date_added,
            date_ranked: self.date_ranked,
            last_played: self.last_played,
        }
    }
}

impl DumpSet {
    /// Convert to a record set with fresh ids
    ///
    /// Records repeating a hash already in the set are dropped with a warning.
    #[must_use]
    pub fn into_set(self) -> RecordSet {
        let mut set = RecordSet::new(Uuid::new_v4(), self.online_id, self.title, self.artist);
        for record in self.records {
            let hash = record.hash.clone();
            if !set.push(record.into_record()) {
                log::warn!("Dropping duplicate record {hash} in set '{}'", set.title);
            }
        }
        set
    }
}

impl LibraryDump {
    /// Parse a dump from any reader
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DumpError` if the input is not a valid dump.
    pub fn from_reader(reader: impl Read) -> Result<Self, StoreError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a dump file
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IoError` if the file cannot be opened and
    /// `StoreError::DumpError` if it is not a valid dump.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}
