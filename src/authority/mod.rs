//! Remote license authority: wire types and the gate client.

pub mod client;
pub mod protocol;

pub use client::{AuthorityClient, Grant, AUTHORITY_TIMEOUT};
pub use protocol::{AuthorizationRequest, AuthorizationVerdict};
