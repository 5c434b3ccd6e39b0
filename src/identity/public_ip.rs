//! Public IP detection through third-party "what is my IP" services.

use crate::identity::resolver::{BoxedResolver, Resolver};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// One IP-echo service. A plain GET whose body is the caller's address.
pub struct EchoResolver {
    client: reqwest::Client,
    url: String,
}

impl EchoResolver {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Resolver for EchoResolver {
    fn source(&self) -> String {
        self.url.clone()
    }

    async fn resolve(&self) -> Option<String> {
        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %self.url, "IP echo request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %self.url, %status, "IP echo returned non-success status");
            return None;
        }

        // No format check here; the authority judges whether the address means anything.
        let body = response.text().await.ok()?;
        let ip = body.trim();
        if ip.is_empty() {
            None
        } else {
            Some(ip.to_string())
        }
    }
}

/// Build one resolver per endpoint, all sharing a client with the given per-request timeout.
pub fn echo_resolvers(endpoints: &[String], timeout: Duration) -> Result<Vec<BoxedResolver>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client for IP detection")?;

    Ok(endpoints
        .iter()
        .map(|url| Box::new(EchoResolver::new(client.clone(), url.clone())) as BoxedResolver)
        .collect())
}
