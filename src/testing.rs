//! Testing utilities for mapsel
//!
//! This module provides fixtures for writing tests: a `RecordBuilder` for
//! single records, a small sample library, a fixed filter context so time
//! based filters are deterministic, and a `TestLibrary` wrapper for
//! temporary stores.
//!
//! Only available when compiled with `cfg(test)`.

use crate::filters::FilterContext;
use crate::library::{Mode, Record, RecordMetadata, RecordSet, Status};
use crate::store::Library;
use chrono::{DateTime, TimeDelta, Utc};
use tempfile::TempDir;
use uuid::Uuid;

/// The instant every test treats as "now" (2024-06-01 12:00:00 UTC)
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(1_717_243_200)
}

/// Filter context pinned to [`fixed_now`]
#[must_use]
pub fn fixed_context() -> FilterContext {
    FilterContext::at(fixed_now())
}

fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - TimeDelta::days(days)
}

/// Builder for records with sensible defaults
///
/// Defaults to an osu! mode ranked record added a year before [`fixed_now`],
/// never played and without ranked date.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(hash: &str) -> Self {
        Self {
            record: Record {
                id: Uuid::new_v4(),
                hash: hash.to_string(),
                online_id: None,
                set_online_id: None,
                metadata: RecordMetadata::default(),
                star_rating: 0.0,
                length: 0.0,
                bpm: 0.0,
                mode: Mode::Osu,
                status: Status::Ranked,
                date_added: days_ago(365),
                date_ranked: None,
                last_played: None,
            },
        }
    }

    pub fn stars(mut self, stars: f64) -> Self {
        self.record.star_rating = stars;
        self
    }

    pub fn length(mut self, seconds: f64) -> Self {
        self.record.length = seconds;
        self
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.record.bpm = bpm;
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.record.metadata.author = author.to_string();
        self
    }

    pub fn artist(mut self, artist: &str) -> Self {
        self.record.metadata.artist = artist.to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.record.metadata.version = version.to_string();
        self
    }

    pub fn online_id(mut self, id: i32) -> Self {
        self.record.online_id = Some(id);
        self
    }

    pub fn set_online_id(mut self, id: i32) -> Self {
        self.record.set_online_id = Some(id);
        self
    }

    pub fn tags(mut self, tags: &str) -> Self {
        self.record.metadata.tags = tags.to_string();
        self
    }

    pub fn added_days_ago(mut self, days: i64) -> Self {
        self.record.date_added = days_ago(days);
        self
    }

    pub fn ranked_days_ago(mut self, days: i64) -> Self {
        self.record.date_ranked = Some(days_ago(days));
        self
    }

    pub fn played_days_ago(mut self, days: i64) -> Self {
        self.record.last_played = Some(days_ago(days));
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.record.mode = mode;
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.record.status = status;
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

fn set(online_id: i32, title: &str, artist: &str, records: Vec<Record>) -> RecordSet {
    let mut set = RecordSet::new(
        Uuid::new_v4(),
        Some(online_id),
        title.to_string(),
        artist.to_string(),
    );
    for record in records {
        set.push(record);
    }
    set
}

/// Three record sets with seven records in total
///
/// Record hashes, in load order: `a1 a2 a3 b1 b2 c1 c2`.
#[must_use]
pub fn sample_sets() -> Vec<RecordSet> {
    vec![
        set(
            100,
            "Flower Dance",
            "DJ Okawari",
            vec![
                RecordBuilder::new("a1").stars(2.5).bpm(130.0).length(215.0).version("Easy").author("Sotarks").build(),
                RecordBuilder::new("a2").stars(4.2).bpm(130.0).length(215.0).version("Hard").author("Sotarks").build(),
                RecordBuilder::new("a3").stars(6.1).bpm(130.0).length(215.0).version("Extra").author("Sotarks").tags("piano jazz").build(),
            ],
        ),
        set(
            200,
            "FREEDOM DiVE",
            "xi",
            vec![
                RecordBuilder::new("b1").stars(5.5).bpm(222.0).length(257.0).version("FOUR DIMENSIONS").author("Nakagawa-Kanon").tags("stream deathstream").played_days_ago(2).build(),
                RecordBuilder::new("b2").stars(7.4).bpm(222.0).length(257.0).version("Another").author("Nakagawa-Kanon").tags("stream").build(),
            ],
        ),
        set(
            300,
            "Bad Apple!!",
            "Alstroemeria Records",
            vec![
                RecordBuilder::new("c1").stars(3.0).bpm(138.0).length(219.0).mode(Mode::Taiko).version("Oni").author("ztrot").tags("touhou").added_days_ago(3).build(),
                RecordBuilder::new("c2").stars(1.8).bpm(138.0).length(219.0).mode(Mode::Mania).status(Status::Loved).version("4K").author("ztrot").tags("touhou").build(),
            ],
        ),
    ]
}

/// Wrapper for a temporary record store that cleans up on drop
pub struct TestLibrary {
    // Field order matters: the store must close before the directory goes away
    library: Library,
    _dir: TempDir,
}

impl TestLibrary {
    /// Open an empty store in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let library =
            Library::open(dir.path().join("library")).expect("Failed to open test library");
        Self { library, _dir: dir }
    }

    /// Open a store already filled with [`sample_sets`]
    pub fn with_samples() -> Self {
        let test = Self::new();
        for set in sample_sets() {
            test.library.insert_set(&set).expect("Failed to insert sample set");
        }
        test
    }

    #[must_use]
    pub const fn library(&self) -> &Library {
        &self.library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_sets_shape() {
        let sets = sample_sets();
        let hashes: Vec<&str> = sets
            .iter()
            .flat_map(|s| s.records.iter().map(|r| r.hash.as_str()))
            .collect();
        assert_eq!(hashes, vec!["a1", "a2", "a3", "b1", "b2", "c1", "c2"]);
        assert_eq!(sets[1].records[0].set_online_id, Some(200));
    }

    #[test]
    fn test_days_ago_is_relative_to_fixed_now() {
        let record = RecordBuilder::new("x").played_days_ago(2).build();
        assert_eq!(record.last_played, Some(fixed_now() - TimeDelta::days(2)));
    }

    #[test]
    fn test_library_starts_empty() {
        let test = TestLibrary::new();
        assert_eq!(test.library().count_sets(), 0);
    }
}
