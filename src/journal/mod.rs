pub mod logger;
pub mod types;

pub use logger::{record, SessionJournal};
pub use types::{JournalEntry, JournalEvent};
