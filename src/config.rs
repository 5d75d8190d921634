//! Call configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. a JSON file ([`CallConfig::load`])
//! 3. `SUI_CALL_*` environment variables ([`CallConfig::apply_env`])

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};
use sui_call_codec::CodecOptions;
use sui_call_types::address::normalize_address_strict;
use sui_call_types::env_utils::{env_bool_or, env_string, env_var};
use sui_call_types::{Network, RetryConfig};

pub const ENV_NETWORK: &str = "SUI_CALL_NETWORK";
pub const ENV_LOOKUP_DEBOUNCE_MS: &str = "SUI_CALL_LOOKUP_DEBOUNCE_MS";
pub const ENV_VERIFY_OBJECTS: &str = "SUI_CALL_VERIFY_OBJECTS";
pub const ENV_SIMULATION_RETRIES: &str = "SUI_CALL_SIMULATION_RETRIES";
pub const ENV_FALLBACK_SENDER: &str = "SUI_CALL_FALLBACK_SENDER";

/// Upper bound on simulation retries after the first attempt.
pub const MAX_SIMULATION_RETRIES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallConfig {
    pub network: Network,
    /// Quiet period before an object lookup is sent.
    pub lookup_debounce_ms: u64,
    /// Whether object arguments are checked against the object directory.
    pub verify_objects: bool,
    /// Simulation retries on transient failures. Clamped to
    /// [`MAX_SIMULATION_RETRIES`].
    pub simulation_retries: usize,
    /// u64 values above this get a "likely a token amount" warning.
    pub large_amount_warning: u64,
    /// Overrides the network's default fallback simulation sender.
    pub fallback_sender: Option<String>,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            lookup_debounce_ms: 300,
            verify_objects: true,
            simulation_retries: MAX_SIMULATION_RETRIES,
            large_amount_warning: sui_call_codec::LARGE_AMOUNT_WARNING,
            fallback_sender: None,
        }
    }
}

impl CallConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CallConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// File (if given) then environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.apply_env())
    }

    /// Overlay any `SUI_CALL_*` variables that are set and parse.
    pub fn apply_env(mut self) -> Self {
        if let Some(network) = env_var::<Network>(ENV_NETWORK) {
            self.network = network;
        }
        if let Some(ms) = env_var(ENV_LOOKUP_DEBOUNCE_MS) {
            self.lookup_debounce_ms = ms;
        }
        self.verify_objects = env_bool_or(ENV_VERIFY_OBJECTS, self.verify_objects);
        if let Some(retries) = env_var(ENV_SIMULATION_RETRIES) {
            self.simulation_retries = retries;
        }
        if let Some(sender) = env_string(ENV_FALLBACK_SENDER) {
            self.fallback_sender = Some(sender);
        }
        self
    }

    pub fn lookup_debounce(&self) -> Duration {
        Duration::from_millis(self.lookup_debounce_ms)
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            large_amount_warning: self.large_amount_warning,
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            retries: self.simulation_retries.min(MAX_SIMULATION_RETRIES),
            ..RetryConfig::default()
        }
    }

    /// Sender used for the last simulation attempt.
    pub fn fallback_sender(&self) -> Result<AccountAddress> {
        let raw = self
            .fallback_sender
            .as_deref()
            .unwrap_or_else(|| self.network.fallback_sender());
        let normalized = normalize_address_strict(raw)
            .with_context(|| format!("Invalid fallback sender '{}'", raw))?;
        AccountAddress::from_hex_literal(&normalized)
            .with_context(|| format!("Invalid fallback sender '{}'", raw))
    }
}
