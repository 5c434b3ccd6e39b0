//! Types for the session journal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,

    /// Session identifier (UUID, generated when the run starts)
    pub session_id: String,

    #[serde(flatten)]
    pub event: JournalEvent,
}

/// What happened. License keys are stored masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    /// The gate passed.
    Authorized {
        license: String,
        public_ip: String,
        machine_id: String,
    },
    /// The gate (or identity collection before it) failed.
    GateFailed {
        license: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        public_ip: Option<String>,
        reason: String,
    },
    /// A dispatched action finished, successfully or not.
    ActionFinished {
        name: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// The installation fallback finished.
    InstallFinished {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}
