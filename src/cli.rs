//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for mapsel using the `clap` crate.
//!
//! # Commands
//!
//! - **import**: Load a library dump (and optionally a collection database) into a library
//! - **select**: Print the records matching a list of filters
//! - **filter**: Edit filters interactively, one command per line
//! - **export**: Write the selection as CSV, JSON or into a collection database
//! - **groups**: Inspect and merge collections
//! - **preset**: Manage saved filter lists
//! - **keys**: List the available filter kinds
//! - **library**: Manage configured libraries (add, remove, list, set-default)
//! - **config**: Read and change settings
//!
//! # Examples
//!
//! ```
//! use mapsel::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["mapsel", "select", "--any", "stars 6", "!status graveyard"]);
//! assert!(matches!(cli.command, Commands::Select { .. }));
//! ```

use crate::export::ExportFormat;
use crate::selection::CombineMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., groups.case_sensitive=true)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., combine_mode)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// Library management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LibraryCommands {
    /// Add a new library
    Add {
        /// Name of the library
        name: String,

        /// Path to the library store directory
        path: PathBuf,
    },

    /// List all libraries
    #[command(visible_alias = "ls")]
    List,

    /// Remove a library from configuration
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the library to remove
        name: String,

        /// Also delete the store from disk
        #[arg(short = 'd', long = "delete-files")]
        delete_files: bool,
    },

    /// Set the default library
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the library to set as default
        name: String,
    },
}

/// Collection subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum GroupsCommands {
    /// List the collections of a library
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        library_args: LibraryArgs,
    },

    /// Show the collections stored in a collection database file
    Show {
        /// Collection database file
        path: PathBuf,

        /// Also print the member hashes
        #[arg(short = 'm', long = "members")]
        members: bool,
    },

    /// Replace a library's collections with those of a collection database file
    Import {
        /// Collection database file
        path: PathBuf,

        #[command(flatten)]
        library_args: LibraryArgs,
    },

    /// Merge one collection database file into another
    Merge {
        /// File to read collections from
        from: PathBuf,

        /// File to merge into (created if missing)
        into: PathBuf,
    },
}

/// Preset management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PresetCommands {
    /// List all saved presets
    #[command(visible_alias = "ls")]
    List,

    /// Show detailed information about a preset
    Show {
        /// Name of the preset to show
        name: String,
    },

    /// Save a filter list as a preset
    Save {
        /// Name of the preset
        name: String,

        /// Filter commands, e.g. "stars 6"
        #[arg(value_name = "FILTER", required = true)]
        filters: Vec<String>,

        /// Preset description
        #[arg(short = 'd', long = "description")]
        description: Option<String>,

        /// Match records included by any filter instead of all
        #[arg(long = "any")]
        any: bool,
    },

    /// Delete a preset
    #[command(visible_alias = "rm")]
    Delete {
        /// Name of the preset to delete
        name: String,
    },

    /// Rename a preset
    #[command(visible_alias = "mv")]
    Rename {
        old_name: String,
        new_name: String,
    },
}

/// Shared arguments for commands that work with a library
#[derive(Args, Debug, Clone, Default)]
pub struct LibraryArgs {
    /// Library name to use (overrides default)
    #[arg(long = "library", short = 'l', value_name = "NAME")]
    pub library: Option<String>,
}

/// Shared arguments for commands that build a selection
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Filter commands, e.g. "stars 6" "!status graveyard"
    #[arg(value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Match records included by any filter instead of all
    #[arg(long = "any", conflicts_with = "all")]
    pub any: bool,

    /// Match records included by every filter (overrides config)
    #[arg(long = "all", conflicts_with = "any")]
    pub all: bool,

    /// Start from a saved preset
    #[arg(short = 'F', long = "preset", value_name = "NAME")]
    pub preset: Option<String>,

    #[command(flatten)]
    pub library_args: LibraryArgs,
}

impl SelectionArgs {
    /// The combine mode requested on the command line, if any
    #[must_use]
    pub const fn combine_mode(&self) -> Option<CombineMode> {
        if self.any {
            Some(CombineMode::Any)
        } else if self.all {
            Some(CombineMode::All)
        } else {
            None
        }
    }
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mapsel")]
#[command(about = "Rule based selection over a beatmap library", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Import a library dump, replacing the library's contents
    #[command(visible_alias = "i")]
    Import {
        /// JSON dump of sets and collections
        dump: PathBuf,

        /// Take collections from this collection database instead of the dump
        #[arg(short = 'g', long = "groups", value_name = "FILE")]
        groups: Option<PathBuf>,

        #[command(flatten)]
        library_args: LibraryArgs,
    },

    /// Print the records matching the filters
    #[command(visible_alias = "s")]
    Select {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Save the filters as a preset
        #[arg(long = "save-preset", value_name = "NAME")]
        save_preset: Option<String>,

        /// Description for the saved preset
        #[arg(long = "preset-desc", value_name = "DESC", requires = "save_preset")]
        preset_desc: Option<String>,
    },

    /// Edit filters interactively
    #[command(visible_alias = "f")]
    Filter {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Export the records matching the filters
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout for csv and json if omitted)
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: Option<PathBuf>,

        /// Put the whole selection into this collection (groups format only)
        #[arg(long = "group-name", value_name = "NAME")]
        group_name: Option<String>,
    },

    /// Collection management
    #[command(visible_alias = "g")]
    Groups {
        #[command(subcommand)]
        command: GroupsCommands,
    },

    /// Saved filter lists
    #[command(visible_alias = "p")]
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// List the available filter kinds
    Keys,

    /// Library management
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// Helper method to get the library name override from commands
    #[must_use]
    pub fn get_library(&self) -> Option<&str> {
        match self {
            Self::Import { library_args, .. }
            | Self::Groups {
                command:
                    GroupsCommands::List { library_args } | GroupsCommands::Import { library_args, .. },
            } => library_args.library.as_deref(),
            Self::Select { selection, .. }
            | Self::Filter { selection }
            | Self::Export { selection, .. } => selection.library_args.library.as_deref(),
            _ => None,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
