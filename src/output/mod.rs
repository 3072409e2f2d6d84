//! Output formatting for CLI display
//!
//! Helpers shared by the command handlers and the interactive session.

use crate::filters::FilterTemplate;
use crate::groupdb::StoredGroup;
use crate::library::{GroupEntry, Record, RecordSet};
use crate::presets::Preset;
use crate::selection::SelectionCounts;
use colored::Colorize;

/// Summary line for a selection
#[must_use]
pub fn counts_line(counts: SelectionCounts) -> String {
    format!(
        "{} records in {} sets selected",
        counts.records.to_string().bold(),
        counts.sets.to_string().bold()
    )
}

/// One active filter with its ordinal
#[must_use]
pub fn filter_line(ordinal: usize, description: &str) -> String {
    format!("  {} {description}", format!("{ordinal}.").cyan())
}

#[must_use]
pub fn warning_line(message: &str) -> String {
    format!("{} {message}", "warning:".yellow().bold())
}

#[must_use]
pub fn error_line(message: &str) -> String {
    format!("{} {message}", "error:".red().bold())
}

/// A selected record, or just its hash in quiet mode
#[must_use]
pub fn record_line(set: &RecordSet, record: &Record, quiet: bool) -> String {
    if quiet {
        return record.hash.clone();
    }
    format!(
        "  {} - {} [{}] {} {}",
        set.artist,
        set.title,
        record.metadata.version.green(),
        format!("{:.2}*", record.star_rating).yellow(),
        record.hash.dimmed()
    )
}

/// Heading for a set in a listing
#[must_use]
pub fn set_heading(set: &RecordSet) -> String {
    let id = set
        .online_id
        .map_or_else(String::new, |id| format!(" ({id})"));
    format!("{} - {}{id}", set.artist, set.title).bold().to_string()
}

/// A library group with its ordinal and size
#[must_use]
pub fn group_entry(entry: &GroupEntry, quiet: bool) -> String {
    if quiet {
        return entry.name.clone();
    }
    format!(
        "  {} {} ({} records)",
        format!("#{}", entry.ordinal).cyan(),
        entry.name,
        entry.hashes.len()
    )
}

/// A group from a collection database file
#[must_use]
pub fn stored_group(group: &StoredGroup, quiet: bool) -> String {
    if quiet {
        group.name().to_string()
    } else {
        format!("  {} ({} records)", group.name(), group.len())
    }
}

/// A filter kind with usage and description
#[must_use]
pub fn template_line(template: &FilterTemplate) -> String {
    format!("  {} {}", format!("{:<28}", template.usage()).cyan(), template.detail)
}

/// One line summary of a preset
#[must_use]
pub fn preset_summary(preset: &Preset, quiet: bool) -> String {
    if quiet {
        return preset.name.clone();
    }
    let description = if preset.description.is_empty() {
        String::new()
    } else {
        format!(" - {}", preset.description)
    };
    format!(
        "  {}{description} ({} filters, used {} times)",
        preset.name.green(),
        preset.filters.len(),
        preset.use_count
    )
}
