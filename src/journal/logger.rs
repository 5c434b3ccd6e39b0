//! Session journal writer: append-only JSONL.
//!
//! Writes to `~/.licensegate/logs/{session_id}.jsonl`, one JSON object per
//! line, flushed after every write. A journal that cannot be written is
//! reported through tracing and otherwise ignored.

use crate::journal::types::{JournalEntry, JournalEvent};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct SessionJournal {
    session_id: String,
    log_path: PathBuf,
    file: File,
    entry_count: usize,
}

impl SessionJournal {
    /// Open `{dir}/{session_id}.jsonl`, creating the directory as needed.
    pub fn new(session_id: &str, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create journal directory: {}", dir.display()))?;
        Self::with_path(session_id, dir.join(format!("{}.jsonl", session_id)))
    }

    /// Open a journal at an exact path.
    pub fn with_path(session_id: &str, path: impl AsRef<Path>) -> Result<Self> {
        let log_path = path.as_ref().to_path_buf();
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open journal: {}", log_path.display()))?;

        Ok(Self {
            session_id: session_id.to_string(),
            log_path,
            file,
            entry_count: 0,
        })
    }

    /// Append one event.
    pub fn log(&mut self, event: JournalEvent) -> Result<()> {
        let entry = JournalEntry {
            timestamp: Utc::now(),
            session_id: self.session_id.clone(),
            event,
        };
        let json = serde_json::to_string(&entry).context("Failed to serialize journal entry")?;
        writeln!(self.file, "{}", json).context("Failed to write journal entry")?;
        self.file.flush().context("Failed to flush journal")?;
        self.entry_count += 1;
        Ok(())
    }

    /// Append one event; failures are logged, never returned.
    pub fn record(&mut self, event: JournalEvent) {
        if let Err(e) = self.log(event) {
            tracing::warn!("Failed to write session journal: {:#}", e);
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Default journal directory (~/.licensegate/logs/).
    pub fn default_directory() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".licensegate").join("logs"))
    }
}

/// Record into an optional journal.
pub fn record(journal: &mut Option<SessionJournal>, event: JournalEvent) {
    if let Some(journal) = journal.as_mut() {
        journal.record(event);
    }
}
