//! Interactive filter editing
//!
//! A session reads one command per line and applies it to a
//! [`SelectionEngine`]:
//!
//! - `<filter>`: any filter command, e.g. `stars 6` or `!collection #2`
//! - `remove N`: drop the filter with ordinal `N`
//! - `reset`: drop every filter
//! - `mode all|any`: change how filters combine (`mode taiko` is still a filter)
//! - `list`: show the active filters
//! - `reload`: re-read the groups from the library
//! - an empty line ends the session

use crate::filters::{FilterContext, FilterError, FilterInstance, Registry};
use crate::library::GroupMap;
use crate::output;
use crate::selection::{CombineMode, ResolutionWarning, SelectionCounts, SelectionEngine};
use crate::store::StoreError;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors reported for a single session line
///
/// None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Could not reload groups: {0}")]
    Reload(#[from] StoreError),

    #[error("Invalid filter number '{0}'")]
    InvalidOrdinal(String),

    #[error("Reloading is not available in this session")]
    ReloadUnavailable,
}

/// A parsed session line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add(String),
    Remove(String),
    Reset,
    Mode(CombineMode),
    List,
    Reload,
    Exit,
}

impl SessionCommand {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word {
            "" => Self::Exit,
            "reset" if rest.is_empty() => Self::Reset,
            "list" if rest.is_empty() => Self::List,
            "reload" if rest.is_empty() => Self::Reload,
            "remove" if !rest.is_empty() => Self::Remove(rest.to_string()),
            "mode" => match rest.parse::<CombineMode>() {
                Ok(mode) => Self::Mode(mode),
                Err(_) => Self::Add(line.to_string()),
            },
            _ => Self::Add(line.to_string()),
        }
    }
}

/// Result of one applied command
#[derive(Debug, Clone)]
pub enum Reply {
    /// The selection was recomputed
    Updated {
        counts: SelectionCounts,
        warnings: Vec<ResolutionWarning>,
    },
    /// A filter was removed and the selection recomputed
    Removed {
        filter: FilterInstance,
        counts: SelectionCounts,
        warnings: Vec<ResolutionWarning>,
    },
    /// Descriptions of the active filters, in order
    Listing(Vec<String>),
    /// Groups were reloaded and active collection filters resolved again
    Reloaded {
        groups: usize,
        counts: SelectionCounts,
        warnings: Vec<ResolutionWarning>,
    },
    Exit,
}

type ReloadFn<'a> = Box<dyn FnMut() -> Result<GroupMap, StoreError> + 'a>;

/// A filter editing session over an engine
pub struct Session<'a> {
    engine: &'a mut SelectionEngine,
    ctx: FilterContext,
    reload: Option<ReloadFn<'a>>,
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a mut SelectionEngine, ctx: FilterContext) -> Self {
        Self {
            engine,
            ctx,
            reload: None,
        }
    }

    /// Enable `reload` with a source for fresh groups
    #[must_use]
    pub fn with_reload(
        mut self,
        reload: impl FnMut() -> Result<GroupMap, StoreError> + 'a,
    ) -> Self {
        self.reload = Some(Box::new(reload));
        self
    }

    #[must_use]
    pub fn engine(&self) -> &SelectionEngine {
        self.engine
    }

    /// Apply one line
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the line cannot be applied. The engine is
    /// unchanged in that case.
    pub fn execute(&mut self, line: &str) -> Result<Reply, SessionError> {
        let mut warnings = Vec::new();
        let reply = match SessionCommand::parse(line) {
            SessionCommand::Add(command) => {
                let filter = Registry::parse_command(&command, &self.ctx)?;
                let counts = self.engine.add_filter(filter, |w| warnings.push(w))?;
                Reply::Updated { counts, warnings }
            }
            SessionCommand::Remove(arg) => {
                let ordinal = arg
                    .parse::<usize>()
                    .map_err(|_| SessionError::InvalidOrdinal(arg))?;
                let filter = self.engine.remove_filter(ordinal, |w| warnings.push(w))?;
                Reply::Removed {
                    filter,
                    counts: self.engine.counts(),
                    warnings,
                }
            }
            SessionCommand::Reset => Reply::Updated {
                counts: self.engine.reset_filters(),
                warnings,
            },
            SessionCommand::Mode(mode) => {
                let counts = self.engine.set_mode(mode, |w| warnings.push(w));
                Reply::Updated { counts, warnings }
            }
            SessionCommand::List => Reply::Listing(self.engine.filters().describe()),
            SessionCommand::Reload => {
                let reload = self.reload.as_mut().ok_or(SessionError::ReloadUnavailable)?;
                let groups = reload()?;
                let count = groups.len();
                let counts = self.engine.set_groups(groups, |w| warnings.push(w));
                log::info!("Reloaded {count} groups");
                Reply::Reloaded {
                    groups: count,
                    counts,
                    warnings,
                }
            }
            SessionCommand::Exit => Reply::Exit,
        };
        Ok(reply)
    }

    /// Read commands until an empty line or end of input
    ///
    /// Line errors are printed and the session continues.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input or writing output fails.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "{}", output::counts_line(self.engine.counts()))?;
        for line in input.lines() {
            match self.execute(&line?) {
                Ok(Reply::Exit) => break,
                Ok(reply) => write_reply(&mut out, &reply)?,
                Err(e) => writeln!(out, "{}", output::error_line(&e.to_string()))?,
            }
            out.flush()?;
        }
        Ok(())
    }
}

fn write_reply(out: &mut impl Write, reply: &Reply) -> io::Result<()> {
    match reply {
        Reply::Updated { counts, warnings } => {
            for warning in warnings {
                writeln!(out, "{}", output::warning_line(&warning.to_string()))?;
            }
            writeln!(out, "{}", output::counts_line(*counts))
        }
        Reply::Removed {
            filter,
            counts,
            warnings,
        } => {
            writeln!(out, "Removed: {filter}")?;
            for warning in warnings {
                writeln!(out, "{}", output::warning_line(&warning.to_string()))?;
            }
            writeln!(out, "{}", output::counts_line(*counts))
        }
        Reply::Listing(lines) => {
            if lines.is_empty() {
                writeln!(out, "No active filters")?;
            }
            for (idx, line) in lines.iter().enumerate() {
                writeln!(out, "{}", output::filter_line(idx + 1, line))?;
            }
            Ok(())
        }
        Reply::Reloaded {
            groups,
            counts,
            warnings,
        } => {
            writeln!(out, "Reloaded {groups} collections")?;
            for warning in warnings {
                writeln!(out, "{}", output::warning_line(&warning.to_string()))?;
            }
            writeln!(out, "{}", output::counts_line(*counts))
        }
        Reply::Exit => Ok(()),
    }
}
