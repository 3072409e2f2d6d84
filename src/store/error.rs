//! Record store error types
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`** / **`EncodeError`**: bincode failures on stored values
//! - **`DumpError`**: A library dump could not be parsed
//! - **`SchemaMismatch`**: The store was written by an incompatible version
//! - **`WorkerGone`**: The library worker thread stopped

use thiserror::Error;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// The library dump is not valid JSON or has the wrong shape
    #[error("Invalid library dump: {0}")]
    DumpError(#[from] serde_json::Error),

    /// Reading a dump failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The store was created with a different schema version
    #[error("Library schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },

    /// A stored key has an unexpected length
    #[error("Corrupt key in tree '{tree}'")]
    CorruptKey { tree: &'static str },

    /// The worker thread panicked or was shut down
    #[error("Library worker is no longer running")]
    WorkerGone,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
