//! Post-authorization action dispatch.

pub mod menu;
pub mod runner;

pub use menu::{parse_selection, DispatchSummary, Dispatcher, Notice, Selection};
pub use runner::{ActionRunner, DEFAULT_INTERPRETER};
