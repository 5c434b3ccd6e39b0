//! Directory scanning for action scripts.
//!
//! Non-recursive. Only regular files (symlinks are followed) whose name ends
//! in a recognized suffix are listed, sorted by file name so the menu
//! numbering is stable between renders.

use crate::catalog::types::{ActionEntry, DEFAULT_SCRIPT_SUFFIX, DESCRIPTION_MARKER};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A directory of action scripts plus the suffixes that make a file eligible.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    suffixes: Vec<String>,
}

impl Catalog {
    pub fn new(dir: impl AsRef<Path>, suffixes: Vec<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            suffixes,
        }
    }

    /// Catalog recognizing only `.sh` scripts.
    pub fn with_default_suffix(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, vec![DEFAULT_SCRIPT_SUFFIX.to_string()])
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List eligible scripts in file-name order.
    pub fn list(&self) -> io::Result<Vec<ActionEntry>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();
            if !path.metadata().map(|m| m.is_file()).unwrap_or(false) {
                continue;
            }
            let file_name = dir_entry.file_name().to_string_lossy().to_string();
            let Some(name) = self.strip_suffix(&file_name) else {
                continue;
            };
            entries.push(ActionEntry {
                description: read_description(&path),
                name: name.to_string(),
                path,
            });
        }
        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }

    /// Cheap probe: is there at least one eligible script?
    /// A missing or unreadable directory counts as "no".
    pub fn has_actions(&self) -> bool {
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return false;
        };
        read_dir.filter_map(Result::ok).any(|entry| {
            let file_name = entry.file_name().to_string_lossy().to_string();
            self.strip_suffix(&file_name).is_some()
                && entry.path().metadata().map(|m| m.is_file()).unwrap_or(false)
        })
    }

    /// Name without the first matching suffix; `None` if ineligible.
    fn strip_suffix<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.suffixes
            .iter()
            .find_map(|suffix| file_name.strip_suffix(suffix.as_str()))
            .filter(|name| !name.is_empty())
    }
}

/// List `.sh` actions in `dir`.
pub fn list_actions(dir: impl AsRef<Path>) -> io::Result<Vec<ActionEntry>> {
    Catalog::with_default_suffix(dir).list()
}

/// Whether `dir` holds any `.sh` action. Never errors.
pub fn has_actions(dir: impl AsRef<Path>) -> bool {
    Catalog::with_default_suffix(dir).has_actions()
}

/// First `# Description:` line of the script, trimmed. Empty if there is none
/// or the file cannot be read.
pub fn read_description(path: &Path) -> String {
    let Ok(file) = File::open(path) else {
        return String::new();
    };
    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .find_map(|line| line.strip_prefix(DESCRIPTION_MARKER).map(|d| d.trim().to_string()))
        .unwrap_or_default()
}
