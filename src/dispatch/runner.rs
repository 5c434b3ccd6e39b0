//! Runs one action script as a child process.
//!
//! The child inherits stdin/stdout/stderr and the parent's environment, plus
//! the variables of the authorization grant. The parent's own environment
//! is never modified.

use crate::authority::Grant;
use crate::catalog::ActionEntry;
use crate::error::ActionError;
use std::path::Path;
use std::process::Command;

/// Interpreter used when none is configured.
pub const DEFAULT_INTERPRETER: &str = "bash";

/// Spawns action scripts with a fixed interpreter and environment overlay.
#[derive(Debug, Clone)]
pub struct ActionRunner {
    interpreter: String,
    env: Vec<(String, String)>,
}

impl ActionRunner {
    /// Runner whose children see the grant's identity and license variables.
    pub fn for_grant(interpreter: impl Into<String>, grant: &Grant) -> Self {
        let env = grant
            .env_vars()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self::with_env(interpreter, env)
    }

    pub fn with_env(interpreter: impl Into<String>, env: Vec<(String, String)>) -> Self {
        Self {
            interpreter: interpreter.into(),
            env,
        }
    }

    /// Run `entry` to completion. Blocks for as long as the script runs.
    pub fn run(&self, entry: &ActionEntry) -> Result<(), ActionError> {
        // The catalog is re-read every render, so the file may be gone by now.
        if !entry.path.is_file() {
            return Err(ActionError::NotFound(entry.path.clone()));
        }

        ensure_executable(&entry.path);

        tracing::info!(action = %entry.name, interpreter = %self.interpreter, "executing action");
        let status = Command::new(&self.interpreter)
            .arg(&entry.path)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .map_err(|source| ActionError::Spawn {
                path: entry.path.clone(),
                source,
            })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(ActionError::Exited(code)),
            None => Err(ActionError::Terminated),
        }
    }
}

/// Best-effort `chmod 0755`; failure only gets logged.
#[cfg(unix)]
fn ensure_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)) {
        tracing::warn!(path = %path.display(), "Could not mark action executable: {}", e);
    }
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) {}
