//! Ordered fallback resolution.
//!
//! Both halves of the identity are "try these sources in order, take the
//! first one that yields something". Each source is a `Resolver`; the chain
//! stops at the first non-empty value and never touches the rest.

use async_trait::async_trait;

/// A single source for an identity value.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Where the value comes from (URL, file path, ...), for diagnostics.
    fn source(&self) -> String;

    /// Attempt to produce a value. `None` means "try the next source".
    async fn resolve(&self) -> Option<String>;
}

/// Boxed resolver as stored in a chain.
pub type BoxedResolver = Box<dyn Resolver>;

/// Try each resolver in order and return the first non-empty, trimmed value.
pub async fn first_resolved(resolvers: &[BoxedResolver]) -> Option<String> {
    for resolver in resolvers {
        match resolver.resolve().await {
            Some(value) if !value.trim().is_empty() => {
                tracing::debug!(source = %resolver.source(), "resolved");
                return Some(value.trim().to_string());
            }
            _ => tracing::debug!(source = %resolver.source(), "no value, trying next source"),
        }
    }
    None
}
