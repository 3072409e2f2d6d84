//! Filter-specific error types
//!
//! Errors produced while turning user text into a filter. They are always
//! recoverable: the caller reports the message and discards the attempted
//! filter, leaving the active filter list untouched.

use thiserror::Error;

/// Errors that can occur while building or managing filters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The argument text could not be converted for this filter kind
    #[error("{reason}")]
    Validation {
        /// Short key of the filter that rejected the input
        key: String,
        /// Human-readable reason
        reason: String,
    },

    /// No filter is registered under this short key
    #[error("Unknown filter '{0}'")]
    UnknownKey(String),

    /// A filter ordinal outside the current list
    #[error("No filter #{ordinal} (there are {len} active filters)")]
    InvalidOrdinal { ordinal: usize, len: usize },

    /// A collection filter whose negation differs from an already active one
    #[error("Collection filters must all be negated or all be plain")]
    ConflictingGroupNegation,
}

impl FilterError {
    pub(crate) fn validation(key: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
