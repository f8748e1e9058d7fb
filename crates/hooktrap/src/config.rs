//! Configuration types for the relay.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Listener addresses for the two HTTP surfaces.
///
/// The ingest listener is public (webhook senders are not users of
/// the system); the API listener carries the authenticated dashboard
/// surface and defaults to loopback.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default = "default_ingest_addr")]
    pub ingest: SocketAddr,
    #[serde(default = "default_api_addr")]
    pub api: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            ingest: default_ingest_addr(),
            api: default_api_addr(),
        }
    }
}

fn default_ingest_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default ingest addr")
}

fn default_api_addr() -> SocketAddr {
    "127.0.0.1:9090".parse().expect("valid default api addr")
}

/// Free-tier caps applied to owners without elevated entitlement.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Captured requests retained per endpoint on the free tier.
    #[serde(default = "default_free_request_limit")]
    pub free_request_limit: usize,
    /// Endpoints per owner on the free tier.
    #[serde(default = "default_free_endpoint_limit")]
    pub free_endpoint_limit: usize,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_request_limit: default_free_request_limit(),
            free_endpoint_limit: default_free_endpoint_limit(),
        }
    }
}

fn default_free_request_limit() -> usize {
    5
}

fn default_free_endpoint_limit() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplayConfig {
    /// Upper bound on a single replay attempt, connect included.
    #[serde(default = "default_replay_timeout_secs")]
    pub timeout_secs: u64,
    /// Let replays reach localhost and private ranges. Development
    /// and test escape hatch only; the SSRF guard stays on otherwise.
    #[serde(default)]
    pub allow_private_targets: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_replay_timeout_secs(),
            allow_private_targets: false,
        }
    }
}

fn default_replay_timeout_secs() -> u64 {
    30
}

/// Static principal/entitlement tables.
///
/// This is the injected stand-in for the product's account and
/// billing collaborators: bearer tokens resolve to owner ids, and
/// elevated owners are exempt from free-tier caps.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AuthConfig {
    /// Bearer token -> owner id.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
    /// Owners holding elevated entitlement.
    #[serde(default)]
    pub elevated_owners: Vec<String>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {path:?}: {e}"))?;
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {path:?}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen.ingest == self.listen.api {
            anyhow::bail!(
                "ingest and api listeners must not share an address ({})",
                self.listen.ingest
            );
        }
        if self.replay.timeout_secs == 0 {
            anyhow::bail!("replay.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
