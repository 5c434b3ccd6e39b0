//! Error taxonomy for the gate and the dispatcher.
//!
//! `GateError` is fatal: the run prints it and exits 1. `ActionError` is
//! scoped to a single dispatched action and never ends the session.

use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort the whole run.
#[derive(Debug, Error)]
pub enum GateError {
    /// The authority could not be reached or the exchange was cut short.
    #[error("Could not reach the license authority at {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The authority answered with something that is not a verdict.
    #[error("Failed to parse authority response (status {status}): {body}")]
    Protocol { status: u16, body: String },

    /// The authority refused this license/identity pair.
    #[error("{message} (status: {status})")]
    Denied { message: String, status: u16 },

    /// Every IP-echo endpoint failed.
    #[error("All IP detection services failed (tried {})", .tried.join(", "))]
    IpDetection { tried: Vec<String> },

    #[error("No action scripts available in {}", .dir.display())]
    NoActionsAvailable { dir: PathBuf },

    #[error("Installation step '{step}' failed")]
    InstallStep {
        step: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Why a single dispatched action did not complete successfully.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The script disappeared between listing and execution.
    #[error("script not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to start {}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("exit status {0}")]
    Exited(i32),

    /// The child ended without an exit code (killed by a signal).
    #[error("terminated by signal")]
    Terminated,
}

impl ActionError {
    /// Exit code reported to the journal; `None` when the child never produced one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ActionError::Exited(code) => Some(*code),
            _ => None,
        }
    }
}
