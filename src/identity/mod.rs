//! Caller identity: public IP plus a stable machine identifier.
//!
//! The public IP is a hard precondition: if no echo service answers, the run
//! stops before any authorization request is made. The machine id never
//! fails; it degrades to the host name and finally to `"unknown"`.

pub mod machine_id;
pub mod public_ip;
pub mod resolver;

use crate::error::GateError;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub use machine_id::UNKNOWN_MACHINE_ID;
pub use resolver::{first_resolved, BoxedResolver, Resolver};

/// Who is asking: resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub public_ip: String,
    pub machine_id: String,
}

/// Runs the two resolver chains.
pub struct IdentityCollector {
    ip_resolvers: Vec<BoxedResolver>,
    machine_id_resolvers: Vec<BoxedResolver>,
}

impl IdentityCollector {
    /// Echo endpoints and identity files in priority order; the host name is
    /// appended as the last machine id source.
    pub fn new(
        ip_endpoints: &[String],
        identity_files: &[PathBuf],
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            ip_resolvers: public_ip::echo_resolvers(ip_endpoints, timeout)?,
            machine_id_resolvers: machine_id::machine_id_resolvers(identity_files),
        })
    }

    /// Assemble a collector from arbitrary chains (tests, custom sources).
    pub fn from_resolvers(
        ip_resolvers: Vec<BoxedResolver>,
        machine_id_resolvers: Vec<BoxedResolver>,
    ) -> Self {
        Self {
            ip_resolvers,
            machine_id_resolvers,
        }
    }

    pub async fn public_ip(&self) -> Result<String, GateError> {
        first_resolved(&self.ip_resolvers)
            .await
            .ok_or_else(|| GateError::IpDetection {
                tried: self.ip_resolvers.iter().map(|r| r.source()).collect(),
            })
    }

    pub async fn machine_id(&self) -> String {
        first_resolved(&self.machine_id_resolvers)
            .await
            .unwrap_or_else(|| UNKNOWN_MACHINE_ID.to_string())
    }

    /// Resolve the full identity. Only public IP detection can fail.
    pub async fn collect(&self) -> Result<Identity, GateError> {
        let public_ip = self.public_ip().await?;
        let machine_id = self.machine_id().await;
        tracing::info!(%public_ip, "identity collected");
        Ok(Identity {
            public_ip,
            machine_id,
        })
    }
}
