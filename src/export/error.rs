//! Export error types

use crate::groupdb::GroupDbError;
use thiserror::Error;

/// Errors that can occur while exporting a selection
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The group database could not be read or written
    #[error(transparent)]
    GroupDb(#[from] GroupDbError),

    /// Nothing is selected
    #[error("Nothing to export: the selection is empty")]
    EmptySelection,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
