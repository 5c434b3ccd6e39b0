//! Interactive action menu.
//!
//! Each turn re-reads the catalog, prints it, reads one line and either
//! exits, complains, or runs the chosen action. Bad input and failed actions
//! are reported and the menu comes back; only an empty or unreadable
//! action directory ends the session with an error.

use crate::catalog::{ActionEntry, Catalog};
use crate::dispatch::runner::ActionRunner;
use crate::error::{ActionError, GateError};
use crate::journal::{self, JournalEvent, SessionJournal};
use anyhow::Result;
use colored::Colorize;
use std::fmt;
use std::io::{BufRead, Write};

/// A parsed menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Exit,
    /// 0-based index into the rendered entries
    Action(usize),
}

/// Recoverable problems, reported to the operator and then forgotten.
#[derive(Debug)]
pub enum Notice {
    InvalidInput(String),
    OutOfRange { selection: i64, max: usize },
    ActionFailed { name: String, error: ActionError },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidInput(_) => write!(f, "Invalid input. Please enter a number."),
            Notice::OutOfRange { max, .. } => {
                write!(f, "Invalid selection. Please choose between 0 and {}.", max)
            }
            Notice::ActionFailed { name, error } => {
                write!(f, "Action '{}' failed: {}", name, error)
            }
        }
    }
}

/// Parse one input line against a menu of `count` entries.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, Notice> {
    let trimmed = input.trim();
    let selection: i64 = trimmed
        .parse()
        .map_err(|_| Notice::InvalidInput(trimmed.to_string()))?;

    if selection == 0 {
        return Ok(Selection::Exit);
    }
    if selection < 1 || selection as u64 > count as u64 {
        return Err(Notice::OutOfRange {
            selection,
            max: count,
        });
    }
    Ok(Selection::Action(selection as usize - 1))
}

/// Counters for one menu session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub executed: usize,
    pub failed: usize,
}

/// The menu loop.
pub struct Dispatcher {
    catalog: Catalog,
    runner: ActionRunner,
    journal: Option<SessionJournal>,
}

impl Dispatcher {
    pub fn new(catalog: Catalog, runner: ActionRunner) -> Self {
        Self {
            catalog,
            runner,
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: Option<SessionJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Hand the journal back once the loop is done.
    pub fn into_journal(self) -> Option<SessionJournal> {
        self.journal
    }

    /// Run until the operator picks `0` or input ends.
    ///
    /// Fails only with [`GateError::NoActionsAvailable`] (or an I/O error on
    /// the operator's terminal).
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<DispatchSummary> {
        let mut summary = DispatchSummary::default();

        loop {
            let entries = self.load_entries()?;
            render_menu(out, &entries)?;

            write!(out, "Select an action (0-{}): ", entries.len())?;
            out.flush()?;

            let Some(line) = read_line(&mut input)? else {
                writeln!(out)?;
                writeln!(out, "  {} End of input, exiting", "ℹ".blue())?;
                break;
            };

            let index = match parse_selection(&line, entries.len()) {
                Ok(Selection::Exit) => {
                    writeln!(out, "  {} Exiting", "ℹ".blue())?;
                    break;
                }
                Ok(Selection::Action(index)) => index,
                Err(notice) => {
                    report(out, &notice)?;
                    continue;
                }
            };

            let entry = &entries[index];
            writeln!(out, "  {} Executing: {}", "▶".green(), entry.name.bold())?;
            writeln!(out)?;
            out.flush()?;

            let result = self.runner.run(entry);
            summary.executed += 1;
            writeln!(out)?;

            let event = match result {
                Ok(()) => {
                    writeln!(out, "  {} Action completed successfully", "✓".green())?;
                    JournalEvent::ActionFinished {
                        name: entry.name.clone(),
                        success: true,
                        exit_code: Some(0),
                        error: None,
                    }
                }
                Err(error) => {
                    summary.failed += 1;
                    tracing::info!(action = %entry.name, "action failed: {}", error);
                    let event = JournalEvent::ActionFinished {
                        name: entry.name.clone(),
                        success: false,
                        exit_code: error.exit_code(),
                        error: Some(error.to_string()),
                    };
                    report(
                        out,
                        &Notice::ActionFailed {
                            name: entry.name.clone(),
                            error,
                        },
                    )?;
                    event
                }
            };
            journal::record(&mut self.journal, event);

            writeln!(out)?;
            write!(out, "Press Enter to continue...")?;
            out.flush()?;
            // EOF here just falls through; the next prompt sees it again and exits.
            read_line(&mut input)?;
        }

        Ok(summary)
    }

    fn load_entries(&self) -> Result<Vec<ActionEntry>, GateError> {
        let no_actions = || GateError::NoActionsAvailable {
            dir: self.catalog.dir().to_path_buf(),
        };
        match self.catalog.list() {
            Ok(entries) if !entries.is_empty() => Ok(entries),
            Ok(_) => Err(no_actions()),
            Err(e) => {
                tracing::debug!(dir = %self.catalog.dir().display(), "catalog unreadable: {}", e);
                Err(no_actions())
            }
        }
    }
}

/// Read one line, lossily decoded. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).to_string()))
}

fn render_menu<W: Write>(out: &mut W, entries: &[ActionEntry]) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "==========================================".dimmed())?;
    writeln!(out, "  {}", "Available Actions".bold())?;
    writeln!(out, "{}", "==========================================".dimmed())?;
    writeln!(out)?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "{:2}) {:<30} {}", i + 1, entry.name, entry.description)?;
    }
    writeln!(out)?;
    writeln!(out, "{:2}) Exit", 0)?;
    writeln!(out)
}

fn report<W: Write>(out: &mut W, notice: &Notice) -> std::io::Result<()> {
    writeln!(out, "  {} {}", "✗".red(), notice)
}
