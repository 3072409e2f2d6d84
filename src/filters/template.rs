//! Filter template registry
//!
//! The registry is a fixed list of filter kinds. Its order is the order shown
//! to users and is part of the public surface, so new kinds are appended.
//!
//! Each template parses the argument text of a filter command into a
//! [`Criterion`]. Parsing failures are returned as
//! [`FilterError::Validation`] and never reach the selection engine.

use super::error::FilterError;
use super::instance::{Criterion, FilterContext, FilterInstance, GroupRequest};
use super::parse;
use crate::library::{Mode, Record, Status};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashSet;
use std::fmt;

/// Kind of argument a template expects, used as a hint in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Length,
    Duration,
    TextList,
    IdList,
    Keyword,
    GroupList,
}

impl InputKind {
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Number => "<number>",
            Self::Length => "<seconds|m:ss>",
            Self::Duration => "<duration, e.g. 30d, 2w, 12h>",
            Self::TextList => "<text>[, <text>...]",
            Self::IdList => "<id>[, <id>...]",
            Self::Keyword => "<keyword>[, <keyword>...]",
            Self::GroupList => "<name|#n|*>[, ...]",
        }
    }
}

type Build = fn(&str, &FilterContext) -> Result<Criterion, FilterError>;

/// A registered filter kind
pub struct FilterTemplate {
    /// Short key used in filter commands
    pub key: &'static str,
    /// Human label
    pub label: &'static str,
    /// Phrase used when the filter is not negated
    pub normal: &'static str,
    /// Phrase used when the filter is negated
    pub negated: &'static str,
    /// Longer help text
    pub detail: &'static str,
    pub input: InputKind,
    build: Build,
}

impl fmt::Debug for FilterTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTemplate")
            .field("key", &self.key)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl FilterTemplate {
    /// Key of the group membership template
    pub const GROUP_KEY: &'static str = "collection";

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.key == Self::GROUP_KEY
    }

    /// Build a filter instance from argument text
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Validation` if the text is empty or cannot be
    /// converted to the values this template needs.
    pub fn instantiate(
        &'static self,
        text: &str,
        negated: bool,
        ctx: &FilterContext,
    ) -> Result<FilterInstance, FilterError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FilterError::validation(
                self.key,
                format!("Filter '{}' needs a value: {} {}", self.key, self.key, self.input.hint()),
            ));
        }

        let criterion = (self.build)(text, ctx)?;
        Ok(FilterInstance::new(self, text.to_string(), negated, criterion))
    }

    /// One-line usage string
    #[must_use]
    pub fn usage(&self) -> String {
        format!("[!]{} {}", self.key, self.input.hint())
    }
}

/// Registry of all filter kinds
#[derive(Debug, Clone, Copy)]
pub struct Registry;

impl Registry {
    /// All templates in display order
    #[must_use]
    pub fn templates() -> &'static [FilterTemplate] {
        &TEMPLATES
    }

    /// Find a template by its short key (case-insensitive)
    #[must_use]
    pub fn lookup(key: &str) -> Option<&'static FilterTemplate> {
        TEMPLATES.iter().find(|t| t.key.eq_ignore_ascii_case(key))
    }

    /// The collection template, used for filters synthesized during resolution
    #[must_use]
    pub fn group_template() -> &'static FilterTemplate {
        &TEMPLATES[GROUP_TEMPLATE]
    }

    /// Parse a filter command of the form `[!]<key> <args>`
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownKey` for an unregistered key and
    /// `FilterError::Validation` for malformed arguments.
    pub fn parse_command(line: &str, ctx: &FilterContext) -> Result<FilterInstance, FilterError> {
        let line = line.trim();
        let (negated, rest) = match line.strip_prefix('!') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, line),
        };
        let (key, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

        let template = Self::lookup(key).ok_or_else(|| FilterError::UnknownKey(key.to_string()))?;
        template.instantiate(args, negated, ctx)
    }
}

const GROUP_TEMPLATE: usize = 12;

static TEMPLATES: [FilterTemplate; 13] = [
    FilterTemplate {
        key: "stars",
        label: "Star rating",
        normal: "Star rating at least",
        negated: "Star rating below",
        detail: "Difficulty star rating, e.g. `stars 6.3`",
        input: InputKind::Number,
        build: build_stars,
    },
    FilterTemplate {
        key: "length",
        label: "Length",
        normal: "Length at least",
        negated: "Length below",
        detail: "Drain length in seconds or m:ss, e.g. `length 90`",
        input: InputKind::Length,
        build: build_length,
    },
    FilterTemplate {
        key: "bpm",
        label: "BPM",
        normal: "BPM at least",
        negated: "BPM below",
        detail: "Tempo in beats per minute, e.g. `bpm 180`",
        input: InputKind::Number,
        build: build_bpm,
    },
    FilterTemplate {
        key: "author",
        label: "Mapper",
        normal: "Mapped by",
        negated: "Not mapped by",
        detail: "Comma separated mapper names, case-insensitive",
        input: InputKind::TextList,
        build: build_author,
    },
    FilterTemplate {
        key: "artist",
        label: "Artist",
        normal: "Artist is",
        negated: "Artist is not",
        detail: "Comma separated artist names, case-insensitive",
        input: InputKind::TextList,
        build: build_artist,
    },
    FilterTemplate {
        key: "id",
        label: "Set id",
        normal: "Set id is",
        negated: "Set id is not",
        detail: "Comma separated online beatmap set ids",
        input: InputKind::IdList,
        build: build_id,
    },
    FilterTemplate {
        key: "tag",
        label: "Tag",
        normal: "Tagged with",
        negated: "Not tagged with",
        detail: "Matches if any given text occurs in the tags, case-insensitive",
        input: InputKind::TextList,
        build: build_tag,
    },
    FilterTemplate {
        key: "since",
        label: "Date added",
        normal: "Added within",
        negated: "Not added within",
        detail: "Added to the library within the given duration",
        input: InputKind::Duration,
        build: build_since,
    },
    FilterTemplate {
        key: "ranked",
        label: "Date ranked",
        normal: "Ranked within",
        negated: "Not ranked within",
        detail: "Ranked within the given duration; unranked maps never match",
        input: InputKind::Duration,
        build: build_ranked,
    },
    FilterTemplate {
        key: "played",
        label: "Last played",
        normal: "Played within",
        negated: "Not played within",
        detail: "Played within the given duration; unplayed maps never match",
        input: InputKind::Duration,
        build: build_played,
    },
    FilterTemplate {
        key: "mode",
        label: "Mode",
        normal: "Mode is",
        negated: "Mode is not",
        detail: "osu, taiko, catch or mania",
        input: InputKind::Keyword,
        build: build_mode,
    },
    FilterTemplate {
        key: "status",
        label: "Status",
        normal: "Status is",
        negated: "Status is not",
        detail: "Online status, prefixes allowed, e.g. `status rank, loved`",
        input: InputKind::Keyword,
        build: build_status,
    },
    FilterTemplate {
        key: FilterTemplate::GROUP_KEY,
        label: "Collection",
        normal: "In collection",
        negated: "Not in collection",
        detail: "Collection names or `#n` ordinals; `*` means any collection",
        input: InputKind::GroupList,
        build: build_collection,
    },
];

const MODE_KEYWORDS: [(&str, Mode); 8] = [
    ("osu", Mode::Osu),
    ("standard", Mode::Osu),
    ("std", Mode::Osu),
    ("taiko", Mode::Taiko),
    ("catch", Mode::Catch),
    ("fruits", Mode::Catch),
    ("ctb", Mode::Catch),
    ("mania", Mode::Mania),
];

const STATUS_KEYWORDS: [(&str, Status); 12] = [
    ("locally modified", Status::LocallyModified),
    ("modified", Status::LocallyModified),
    ("none", Status::None),
    ("unknown", Status::None),
    ("graveyard", Status::Graveyard),
    ("wip", Status::Wip),
    ("work in progress", Status::Wip),
    ("pending", Status::Pending),
    ("ranked", Status::Ranked),
    ("approved", Status::Approved),
    ("qualified", Status::Qualified),
    ("loved", Status::Loved),
];

fn build_stars(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let min = parse::number("stars", "star rating", text)?;
    Ok(Criterion::predicate(move |r| r.star_rating >= min))
}

fn build_length(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let min = parse::length("length", text)?;
    Ok(Criterion::predicate(move |r| r.length >= min))
}

fn build_bpm(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let min = parse::number("bpm", "BPM", text)?;
    Ok(Criterion::predicate(move |r| r.bpm >= min))
}

fn lowercase_set(key: &str, text: &str) -> Result<HashSet<String>, FilterError> {
    Ok(parse::list(key, text)?
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect())
}

fn build_author(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let names = lowercase_set("author", text)?;
    Ok(Criterion::predicate(move |r| {
        names.contains(&r.metadata.author.to_lowercase())
    }))
}

fn build_artist(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let names = lowercase_set("artist", text)?;
    Ok(Criterion::predicate(move |r| {
        names.contains(&r.metadata.artist.to_lowercase())
    }))
}

fn build_id(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let ids: HashSet<i32> = parse::id_list("id", text)?.into_iter().collect();
    Ok(Criterion::predicate(move |r| {
        r.set_online_id.is_some_and(|id| ids.contains(&id))
    }))
}

fn build_tag(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let wanted: Vec<String> = parse::list("tag", text)?
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect();
    Ok(Criterion::predicate(move |r| {
        let tags = r.metadata.tags.to_lowercase();
        wanted.iter().any(|t| tags.contains(t.as_str()))
    }))
}

fn cutoff(key: &str, text: &str, ctx: &FilterContext) -> Result<DateTime<Utc>, FilterError> {
    let window: TimeDelta = parse::duration(key, text)?;
    ctx.now
        .checked_sub_signed(window)
        .ok_or_else(|| FilterError::validation(key, format!("Duration out of range: '{text}'")))
}

/// Predicate for "less than `window` has elapsed since the event"
fn within(
    key: &str,
    text: &str,
    ctx: &FilterContext,
    event: fn(&Record) -> Option<DateTime<Utc>>,
) -> Result<Criterion, FilterError> {
    let cutoff = cutoff(key, text, ctx)?;
    Ok(Criterion::predicate(move |r| {
        event(r).is_some_and(|at| at > cutoff)
    }))
}

fn build_since(text: &str, ctx: &FilterContext) -> Result<Criterion, FilterError> {
    within("since", text, ctx, |r| Some(r.date_added))
}

fn build_ranked(text: &str, ctx: &FilterContext) -> Result<Criterion, FilterError> {
    within("ranked", text, ctx, |r| r.date_ranked)
}

fn build_played(text: &str, ctx: &FilterContext) -> Result<Criterion, FilterError> {
    within("played", text, ctx, |r| r.last_played)
}

fn build_mode(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let modes = parse::keywords("mode", "mode", text, &MODE_KEYWORDS)?;
    Ok(Criterion::predicate(move |r| modes.contains(&r.mode)))
}

fn build_status(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let statuses = parse::keywords("status", "status", text, &STATUS_KEYWORDS)?;
    Ok(Criterion::predicate(move |r| statuses.contains(&r.status)))
}

fn build_collection(text: &str, _: &FilterContext) -> Result<Criterion, FilterError> {
    let requests = parse::list(FilterTemplate::GROUP_KEY, text)?
        .iter()
        .map(|item| GroupRequest::parse(item))
        .collect();
    Ok(Criterion::GroupPlaceholder(requests))
}
