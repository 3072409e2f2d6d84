//! Error types for preset operations
//!
//! This module defines all possible errors that can occur during preset operations,
//! including validation errors, I/O errors, and serialization errors.

use crate::filters::FilterError;
use std::io;
use thiserror::Error;

/// Errors that can occur during preset operations
#[derive(Debug, Error)]
pub enum PresetError {
    /// Preset not found
    #[error("Preset '{0}' not found")]
    NotFound(String),

    /// Preset already exists
    #[error("Preset '{0}' already exists")]
    AlreadyExists(String),

    /// Invalid preset name
    #[error("Invalid preset name '{0}': {1}")]
    InvalidName(String, String),

    /// A stored filter line no longer parses
    #[error("Invalid filter '{line}' in preset: {source}")]
    InvalidFilter {
        line: String,
        #[source]
        source: FilterError,
    },

    /// A preset without any filter
    #[error("Preset '{0}' has no filters")]
    Empty(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<toml::de::Error> for PresetError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for PresetError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
