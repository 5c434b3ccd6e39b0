//! Local machine identifier sources.

use crate::identity::resolver::{BoxedResolver, Resolver};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Last-resort machine id when no file and no host name is available.
pub const UNKNOWN_MACHINE_ID: &str = "unknown";

/// A platform identity file such as `/etc/machine-id`.
pub struct IdentityFileResolver {
    path: PathBuf,
}

impl IdentityFileResolver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Resolver for IdentityFileResolver {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    async fn resolve(&self) -> Option<String> {
        let content = tokio::fs::read_to_string(&self.path).await.ok()?;
        let id = content.trim();
        (!id.is_empty()).then(|| id.to_string())
    }
}

/// The host's network name.
pub struct HostNameResolver;

#[async_trait]
impl Resolver for HostNameResolver {
    fn source(&self) -> String {
        "hostname".to_string()
    }

    async fn resolve(&self) -> Option<String> {
        sysinfo::System::host_name()
    }
}

/// Identity files in order, then the host name.
pub fn machine_id_resolvers(identity_files: &[PathBuf]) -> Vec<BoxedResolver> {
    let mut resolvers: Vec<BoxedResolver> = identity_files
        .iter()
        .map(|path| Box::new(IdentityFileResolver::new(path)) as BoxedResolver)
        .collect();
    resolvers.push(Box::new(HostNameResolver));
    resolvers
}
