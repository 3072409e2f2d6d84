//! Mapsel CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Load a library dump into the default library
//! mapsel import library.json
//!
//! # Print hard stream maps that are not in the "Done" collection
//! mapsel select "stars 6" "bpm 200" "!collection Done"
//!
//! # Refine filters interactively
//! mapsel filter "stars 6"
//!
//! # Put the selection into the game's collection file
//! mapsel export --format groups -o collection.db --group-name "Hard streams" "stars 6" "bpm 200"
//!
//! # Quiet mode (only output results)
//! mapsel -q select "status loved"
//! ```
//!
//! # Configuration
//!
//! On first run, mapsel will prompt for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/mapsel/config.toml` on Linux).

use env_logger::Builder as LoggerBuilder;
use log::LevelFilter;
use mapsel::{
    MapselError,
    cli::{Cli, Commands, ConfigCommands, LibraryCommands},
    commands,
    config::{self, MapselConfig},
};
use std::env;

type Result<T> = std::result::Result<T, MapselError>;

fn init_env_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = LoggerBuilder::new();
    builder.filter(None, level);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Handle library management subcommands
///
/// # Errors
///
/// Returns `MapselError` if the configuration cannot be changed or saved.
fn handle_library_command(mut config: MapselConfig, command: &LibraryCommands, quiet: bool) -> Result<()> {
    match command {
        LibraryCommands::Add { name, path } => {
            let resolved_path = if path.components().count() == 1 {
                let data_dir = dirs::data_local_dir().ok_or_else(|| {
                    MapselError::InvalidInput("Could not determine data directory".into())
                })?;
                data_dir.join("mapsel").join(path)
            } else {
                path.clone()
            };

            config.add_library(name.clone(), resolved_path.clone())?;
            std::fs::create_dir_all(&resolved_path)?;
            config.save()?;

            if !quiet {
                println!("Library '{name}' added at {}", resolved_path.display());
                if config.default_library.as_deref() == Some(name.as_str()) {
                    println!("Set '{name}' as default library");
                }
            }
        }
        LibraryCommands::List => {
            if config.libraries.is_empty() {
                if !quiet {
                    println!("No libraries configured.");
                    println!("Add one with: mapsel library add <name> <path>");
                }
                return Ok(());
            }

            if !quiet {
                println!("Configured libraries:");
            }
            let default = config.default_library.as_deref();
            for name in config.list_libraries() {
                if quiet {
                    println!("{name}");
                    continue;
                }
                let marker = if default == Some(name.as_str()) { " (default)" } else { "" };
                let path = config.libraries[name].display();
                println!("  {name}{marker}: {path}");
            }
        }
        LibraryCommands::Remove { name, delete_files } => {
            let path = config.remove_library(name).ok_or_else(|| {
                MapselError::InvalidInput(format!("Library '{name}' not found in configuration"))
            })?;
            config.save()?;

            if *delete_files && path.exists() {
                std::fs::remove_dir_all(&path)?;
            }
            if !quiet {
                println!("Library '{name}' removed");
                if *delete_files {
                    println!("Deleted {}", path.display());
                }
            }
        }
        LibraryCommands::SetDefault { name } => {
            config.set_default_library(name.clone())?;
            config.save()?;
            if !quiet {
                println!("Default library set to '{name}'");
            }
        }
    }
    Ok(())
}

/// Handle configuration subcommands
///
/// # Errors
///
/// Returns `MapselError` for a malformed setting, an unknown key or a failed save.
fn handle_config_command(mut config: MapselConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                MapselError::InvalidInput("Invalid format. Use: mapsel config set key=value".into())
            })?;
            let (key, value) = (key.trim(), value.trim());

            config.set_value(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {value}");
            }
        }
        ConfigCommands::Get { key } => {
            let value = config.get_value(key).ok_or_else(|| {
                MapselError::InvalidInput(format!(
                    "Unknown configuration key: '{key}'. Available keys: {}",
                    config::KEYS.join(", ")
                ))
            })?;
            println!("{value}");
        }
    }
    Ok(())
}

/// Main entry point for the mapsel application
///
/// Initializes logging, loads configuration, parses command-line arguments
/// and dispatches to the appropriate command handler.
///
/// # Errors
///
/// Returns `MapselError` if configuration loading fails, the library cannot be
/// opened, or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_env_logger(cli.verbose);

    let config = MapselConfig::load_or_setup(cli.quiet)?;
    let quiet = cli.quiet || config.quiet;

    match &cli.command {
        Commands::Library { command } => return handle_library_command(config, command, quiet),
        Commands::Config { command } => return handle_config_command(config, command, quiet),
        Commands::Preset { command } => return commands::preset(command, quiet),
        Commands::Groups { command } => return commands::groups(&config, command, quiet),
        Commands::Keys => {
            commands::keys(quiet);
            return Ok(());
        }
        _ => {}
    }

    let (_, path) = config.resolve_library(cli.command.get_library())?;
    let worker = commands::open_library(path)?;

    match &cli.command {
        Commands::Import {
            dump,
            groups,
            ..
        } => commands::import(
            &worker,
            dump,
            groups.as_deref(),
            config.groups.comparison(),
            quiet,
        )?,
        Commands::Select {
            selection,
            save_preset,
            preset_desc,
        } => commands::select(
            &worker,
            &config,
            selection,
            save_preset.as_deref(),
            preset_desc.as_deref(),
            quiet,
        )?,
        Commands::Filter { selection } => commands::filter(&worker, &config, selection, quiet)?,
        Commands::Export {
            selection,
            format,
            output,
            group_name,
        } => commands::export(
            &worker,
            &config,
            selection,
            *format,
            output.as_deref(),
            group_name.as_deref(),
            quiet,
        )?,
        Commands::Library { .. }
        | Commands::Config { .. }
        | Commands::Preset { .. }
        | Commands::Groups { .. }
        | Commands::Keys => unreachable!(),
    }

    Ok(())
}
