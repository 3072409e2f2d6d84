//! Compiled filter instances
//!
//! A `FilterInstance` is immutable once built. It carries either a real
//! predicate over a single record or, for collection filters, the raw group
//! names that the selection engine still has to resolve.

use super::template::FilterTemplate;
use crate::library::Record;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Shared predicate over a single record
pub type Predicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Values captured when a filter is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    /// Reference instant for the time based filters
    pub now: DateTime<Utc>,
}

impl FilterContext {
    #[must_use]
    pub fn now() -> Self {
        Self { now: Utc::now() }
    }

    #[must_use]
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for FilterContext {
    fn default() -> Self {
        Self::now()
    }
}

/// One requested group in a collection filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRequest {
    /// Member of any group
    Any,
    /// A group name or a `#<ordinal>` reference
    Named(String),
}

impl GroupRequest {
    /// Text used to request membership in any group
    pub const ANY_SENTINEL: &'static str = "*";

    #[must_use]
    pub fn parse(item: &str) -> Self {
        if item == Self::ANY_SENTINEL {
            Self::Any
        } else {
            Self::Named(item.to_string())
        }
    }
}

impl fmt::Display for GroupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(Self::ANY_SENTINEL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// What a filter tests
#[derive(Clone)]
pub enum Criterion {
    /// A predicate over a single record
    Predicate(Predicate),
    /// Unresolved group membership, never evaluated directly
    GroupPlaceholder(Vec<GroupRequest>),
    /// Resolved group membership that keeps its requests for the next pass
    Membership {
        requests: Vec<GroupRequest>,
        predicate: Predicate,
    },
}

impl Criterion {
    pub fn predicate(f: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    pub fn membership(
        requests: Vec<GroupRequest>,
        f: impl Fn(&Record) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Membership {
            requests,
            predicate: Arc::new(f),
        }
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::GroupPlaceholder(requests) => {
                f.debug_tuple("GroupPlaceholder").field(requests).finish()
            }
            Self::Membership { requests, .. } => f
                .debug_struct("Membership")
                .field("requests", requests)
                .finish_non_exhaustive(),
        }
    }
}

/// A compiled, possibly negated inclusion test
#[derive(Debug, Clone)]
pub struct FilterInstance {
    input: String,
    negated: bool,
    template: &'static FilterTemplate,
    criterion: Criterion,
}

impl FilterInstance {
    #[must_use]
    pub const fn new(
        template: &'static FilterTemplate,
        input: String,
        negated: bool,
        criterion: Criterion,
    ) -> Self {
        Self {
            input,
            negated,
            template,
            criterion,
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn negated(&self) -> bool {
        self.negated
    }

    #[must_use]
    pub const fn template(&self) -> &'static FilterTemplate {
        self.template
    }

    #[must_use]
    pub const fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    /// Group requests of a collection filter, resolved or not
    #[must_use]
    pub fn group_requests(&self) -> Option<&[GroupRequest]> {
        match &self.criterion {
            Criterion::GroupPlaceholder(requests) | Criterion::Membership { requests, .. } => {
                Some(requests.as_slice())
            }
            Criterion::Predicate(_) => None,
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.criterion, Criterion::GroupPlaceholder(_))
    }

    /// Whether this filter tests group membership, resolved or not
    #[must_use]
    pub fn is_group_filter(&self) -> bool {
        self.template.is_group()
    }

    /// Apply the filter to a record, negation applied outside the predicate
    ///
    /// Placeholders match everything; the selection engine replaces them
    /// before any pass runs.
    #[must_use]
    pub fn includes(&self, record: &Record) -> bool {
        let matched = match &self.criterion {
            Criterion::Predicate(predicate) | Criterion::Membership { predicate, .. } => {
                predicate(record)
            }
            Criterion::GroupPlaceholder(_) => true,
        };
        matched != self.negated
    }

    /// Human readable description using the template's phrasing
    #[must_use]
    pub fn describe(&self) -> String {
        let phrase = if self.negated {
            self.template.negated
        } else {
            self.template.normal
        };
        format!("{phrase} {}", self.input)
    }

    /// The command line that recreates this filter
    #[must_use]
    pub fn command(&self) -> String {
        let bang = if self.negated { "!" } else { "" };
        format!("{bang}{} {}", self.template.key, self.input)
    }
}

impl fmt::Display for FilterInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
