//! licensegate: license-gated action runner library.
//!
//! Exposes the gate's components for integration testing and programmatic
//! use. The binary entrypoint is in `main.rs`.

pub mod authority;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod install;
pub mod journal;
pub mod utils;
