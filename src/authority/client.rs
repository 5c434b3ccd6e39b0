//! Authority client: the single authorization gate of a run.
//!
//! One POST per run. Anything other than HTTP 200 with `allowed: true`
//! is a refusal, and a refusal stops the run before any action executes.

use crate::authority::protocol::{
    check_url, AuthorizationRequest, AuthorizationVerdict, API_KEY_HEADER,
};
use crate::error::GateError;
use crate::identity::Identity;
use anyhow::{Context, Result};
use std::time::Duration;

/// Default upper bound for the whole authorization exchange.
pub const AUTHORITY_TIMEOUT: Duration = Duration::from_secs(30);

/// What a successful gate hands to the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub license_key: String,
    pub identity: Identity,
    /// The authority's message on success (usually "OK").
    pub message: String,
}

impl Grant {
    /// Variables every dispatched action inherits.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("LICENSE_KEY", self.license_key.clone()),
            ("PUBLIC_IP", self.identity.public_ip.clone()),
            ("MACHINE_ID", self.identity.machine_id.clone()),
        ]
    }
}

/// Client for the remote license authority.
pub struct AuthorityClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl AuthorityClient {
    /// Create a client for `base_url` using the default timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, AUTHORITY_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the license authority")?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http,
        })
    }

    pub fn check_url(&self) -> String {
        check_url(&self.base_url)
    }

    /// Ask the authority whether `license_key` may run on `identity`.
    pub async fn validate(
        &self,
        license_key: &str,
        identity: &Identity,
    ) -> Result<Grant, GateError> {
        let url = self.check_url();
        let request = AuthorizationRequest::new(license_key, identity);

        let transport = |source: reqwest::Error| GateError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        let verdict: AuthorizationVerdict = serde_json::from_str(&body)
            .map_err(|_| GateError::Protocol { status, body: body.clone() })?;

        if !verdict.grants(status) {
            tracing::info!(status, message = %verdict.message, "authorization denied");
            return Err(GateError::Denied {
                message: verdict.message,
                status,
            });
        }

        tracing::info!(status, "authorization granted");
        Ok(Grant {
            license_key: license_key.to_string(),
            identity: identity.clone(),
            message: verdict.message,
        })
    }
}
