//! Group database error types
//!
//! Opening and parsing failures are kept apart so callers can tell "no file
//! yet" (handled by [`super::GroupDatabase::open_or_create`]) from "file
//! exists but is unreadable", which is always an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Group database errors
#[derive(Debug, Error)]
pub enum GroupDbError {
    /// The file could not be opened
    #[error("Could not open group database {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from the underlying stream failed
    #[error("Could not read group database: {0}")]
    Read(#[source] io::Error),

    /// The data ended in the middle of a value
    #[error("Could not parse group database: unexpected end of data")]
    Truncated,

    /// A string length prefix does not fit in 32 bits
    #[error("Could not parse group database: string length prefix is too long")]
    InvalidLength,

    /// A group or member count is negative
    #[error("Could not parse group database: invalid {what} count {count}")]
    InvalidCount { what: &'static str, count: i32 },

    /// A string is not valid UTF-8
    #[error("Could not parse group database: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A count or string is too large for the format
    #[error("Cannot write group database: {what} too large ({len})")]
    TooLarge { what: &'static str, len: usize },

    /// Writing to the underlying stream failed
    #[error("Could not write group database: {0}")]
    WriteStream(#[source] io::Error),

    /// Writing the file failed
    #[error("Could not write group database {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GroupDbError {
    /// Map a stream error, treating EOF as truncation
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Read(err)
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
