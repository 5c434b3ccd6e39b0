pub mod scanner;
pub mod types;

pub use scanner::{has_actions, list_actions, read_description, Catalog};
pub use types::{ActionEntry, DEFAULT_SCRIPT_SUFFIX, DESCRIPTION_MARKER};
