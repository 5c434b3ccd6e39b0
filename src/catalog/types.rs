//! Types for the action catalog.

use std::path::PathBuf;

/// Marker line prefix that carries a script's menu description.
pub const DESCRIPTION_MARKER: &str = "# Description:";

/// Script suffix recognized when none is configured.
pub const DEFAULT_SCRIPT_SUFFIX: &str = ".sh";

/// One runnable action, rebuilt from disk on every menu render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    /// Full path to the script
    pub path: PathBuf,
    /// File name without its script suffix
    pub name: String,
    /// Text after the description marker, or empty
    pub description: String,
}
