//! Toolkit configuration with sensible defaults.
//!
//! A [`SdkConfig`] value is threaded explicitly into every codec call
//! that depends on the network or word table, so several networks and
//! locales can be used side by side in one process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BitmarkError, Locale, Network, Result};

/// Default connection timeout handed to the transport layer, in seconds.
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u32 = 30;

/// Largest accepted connection timeout, in seconds.
pub const MAX_CONNECTION_TIMEOUT_SECS: u32 = 300;

/// Client configuration.
///
/// Loaded from a JSON file or built in code. Every field has a default,
/// so a partial file only needs to name the values it overrides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Network that decoded seeds and account numbers must belong to.
    pub network: Network,

    /// Word table used when rendering new recovery phrases.
    pub locale: Locale,

    /// API token passed through to the transport layer. Not used by
    /// any codec.
    pub api_token: Option<String>,

    /// Connection timeout passed through to the transport layer.
    pub connection_timeout_secs: u32,

    /// `tracing` filter directive applied by binaries embedding the
    /// toolkit (e.g. `"info"` or `"bitmark_account=debug"`).
    pub log_filter: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            network: Network::Test,
            locale: Locale::English,
            api_token: None,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            log_filter: "info".into(),
        }
    }
}

impl SdkConfig {
    /// Creates a default configuration bound to `network`.
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`BitmarkError::ConfigError`] if any value is outside its
    /// acceptable range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CONNECTION_TIMEOUT_SECS).contains(&self.connection_timeout_secs) {
            return Err(BitmarkError::ConfigError {
                reason: format!(
                    "connection_timeout_secs must be in 1..={MAX_CONNECTION_TIMEOUT_SECS}, got {}",
                    self.connection_timeout_secs
                ),
            });
        }

        if let Some(token) = &self.api_token {
            if token.trim().is_empty() {
                return Err(BitmarkError::ConfigError {
                    reason: "api_token must not be empty when set".into(),
                });
            }
        }

        if self.log_filter.trim().is_empty() {
            return Err(BitmarkError::ConfigError {
                reason: "log_filter must not be empty".into(),
            });
        }

        Ok(())
    }

    /// Parses and validates a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::ConfigError`] if the JSON is malformed.
    /// - Any error from [`SdkConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| BitmarkError::ConfigError {
            reason: format!("failed to parse config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// - [`BitmarkError::ConfigError`] if the file cannot be read or
    ///   parsed.
    /// - Any error from [`SdkConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BitmarkError::ConfigError {
            reason: format!("failed to read config file {}: {e}", path.display()),
        })?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), network = %config.network, "loaded config");
        Ok(config)
    }
}
