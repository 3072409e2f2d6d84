//! Mapsel - rule based selection over a rhythm game beatmap library
//!
//! This library loads a library of beatmap sets from an embedded store,
//! narrows it with short text filters (`stars 6`, `!status graveyard`,
//! `collection Favorites`) and writes the result out, including into the
//! game's binary collection database.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod filters;
pub mod groupdb;
pub mod library;
pub mod output;
pub mod presets;
pub mod selection;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum MapselError {
    /// Record store error
    #[error("Library error: {0}")]
    Store(#[from] store::StoreError),
    /// A filter command was rejected
    #[error("Filter error: {0}")]
    Filter(#[from] filters::FilterError),
    /// Selection override error
    #[error("Selection error: {0}")]
    Selection(#[from] selection::SelectionError),
    /// Group database could not be read or written
    #[error(transparent)]
    GroupDb(#[from] groupdb::GroupDbError),
    /// Preset error
    #[error("Preset error: {0}")]
    Preset(#[from] presets::PresetError),
    /// Export error
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
