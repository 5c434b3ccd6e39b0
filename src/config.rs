//! Run configuration.
//!
//! Built-in defaults, then an optional YAML file, then command-line flags
//! and environment variables (applied by the CLI through [`Overrides`]).
//!
//! # Example config file:
//! ```yaml
//! authority_url: https://licenses.internal/v1
//! actions_dir: /srv/actions
//! ip_endpoints:
//!   - https://api.ipify.org
//! script_suffixes: [".sh", ".bash"]
//! journal: false
//! ```

use crate::catalog::DEFAULT_SCRIPT_SUFFIX;
use crate::dispatch::DEFAULT_INTERPRETER;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_AUTHORITY_URL: &str = "https://api.example.com/v1";
pub const DEFAULT_ACTIONS_DIR: &str = "/opt/installer/scripts";

/// Installer key baked in at build time via `LICENSEGATE_API_KEY`.
pub fn default_api_key() -> String {
    option_env!("LICENSEGATE_API_KEY")
        .unwrap_or("changeme-installer-key-here")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Base URL of the license authority; `/auth/check` is appended
    pub authority_url: String,
    /// Sent as `X-API-KEY`
    pub api_key: String,
    pub actions_dir: PathBuf,
    /// IP-echo services, tried in order
    pub ip_endpoints: Vec<String>,
    /// Machine id files, tried in order before the host name
    pub identity_files: Vec<PathBuf>,
    pub script_suffixes: Vec<String>,
    /// Program each action script is handed to
    pub interpreter: String,
    pub ip_timeout_secs: u64,
    pub authority_timeout_secs: u64,
    pub journal: bool,
    /// Defaults to ~/.licensegate/logs
    pub journal_dir: Option<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            api_key: default_api_key(),
            actions_dir: PathBuf::from(DEFAULT_ACTIONS_DIR),
            ip_endpoints: vec![
                "https://ifconfig.me".to_string(),
                "https://ipinfo.io/ip".to_string(),
                "https://api.ipify.org".to_string(),
            ],
            identity_files: vec![
                PathBuf::from("/etc/machine-id"),
                PathBuf::from("/var/lib/dbus/machine-id"),
            ],
            script_suffixes: vec![DEFAULT_SCRIPT_SUFFIX.to_string()],
            interpreter: DEFAULT_INTERPRETER.to_string(),
            ip_timeout_secs: 5,
            authority_timeout_secs: 30,
            journal: true,
            journal_dir: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub authority_url: Option<String>,
    pub api_key: Option<String>,
    pub actions_dir: Option<PathBuf>,
    pub no_journal: bool,
}

impl GateConfig {
    /// Load from `explicit` if given (it must exist), else from the default
    /// path if that file exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                Self::from_yaml_str(&content)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// ~/.licensegate/config.yaml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".licensegate").join("config.yaml"))
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.authority_url {
            self.authority_url = url.clone();
        }
        if let Some(key) = &overrides.api_key {
            self.api_key = key.clone();
        }
        if let Some(dir) = &overrides.actions_dir {
            self.actions_dir = dir.clone();
        }
        if overrides.no_journal {
            self.journal = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.authority_url.trim().is_empty() {
            bail!("authority_url must not be empty");
        }
        if self.interpreter.trim().is_empty() {
            bail!("interpreter must not be empty");
        }
        if self.script_suffixes.iter().all(|s| s.is_empty()) {
            bail!("script_suffixes must contain at least one non-empty suffix");
        }
        if self.ip_timeout_secs == 0 || self.authority_timeout_secs == 0 {
            bail!("timeouts must be at least one second");
        }
        Ok(())
    }

    pub fn ip_timeout(&self) -> Duration {
        Duration::from_secs(self.ip_timeout_secs)
    }

    pub fn authority_timeout(&self) -> Duration {
        Duration::from_secs(self.authority_timeout_secs)
    }
}
