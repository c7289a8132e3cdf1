//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use turing_contract::DEFAULT_CONTRACT_ADDRESS;
use turing_types::Address;
use turing_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for a client session.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the wallet provider. Unset means no provider.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Address of the deployed Turing contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: Address,

    /// Chain the wallet must be on. Unset accepts any chain.
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interval between transaction receipt polls.
    #[serde(default = "default_poll_interval_ms")]
    pub confirmation_poll_interval_ms: u64,

    /// Upper bound on waiting for a confirmation. Unset waits indefinitely.
    #[serde(default)]
    pub confirmation_timeout_secs: Option<u64>,

    /// Voting flag assumed before the first confirmed toggle.
    #[serde(default = "default_true")]
    pub initial_voting_enabled: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,turing_client=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_contract_address() -> Address {
    DEFAULT_CONTRACT_ADDRESS
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> bool {
        turing_utils::init_logging(self.log_format, &self.log_level)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_address: default_contract_address(),
            chain_id: None,
            request_timeout_secs: default_request_timeout_secs(),
            confirmation_poll_interval_ms: default_poll_interval_ms(),
            confirmation_timeout_secs: None,
            initial_voting_enabled: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
