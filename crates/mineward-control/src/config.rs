//! Control service configuration.

use std::time::Duration;

use mineward_auth::IdentityDirectory;
use mineward_core::InstanceId;
use serde::Deserialize;
use thiserror::Error;

use crate::probe::McsrvstatProbe;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    /// The configured instance id is not usable.
    #[error("invalid instance id: {0}")]
    InvalidInstanceId(#[from] mineward_core::IdError),

    /// A numeric setting could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidNumber {
        /// The environment variable that held the value.
        key: &'static str,
        /// The value that failed to parse.
        value: String,
    },

    /// The operator role mapping could not be parsed.
    #[error("invalid operator role mapping: {0}")]
    InvalidRoles(String),
}

/// Configuration for the control service.
///
/// Loaded once at process start; everything here is injected into the
/// services explicitly, with no ambient access afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// The single managed instance.
    pub instance_id: InstanceId,

    /// Base URL of the compute provider's instance control API.
    pub provider_url: String,

    /// Base URL of the console relay.
    pub console_url: String,

    /// Base URL of the external status service.
    #[serde(default = "ControlConfig::default_probe_url")]
    pub probe_url: String,

    /// Well-known port the game server listens on.
    #[serde(default = "ControlConfig::default_game_port")]
    pub game_port: u16,

    /// Overall timeout for provider and console requests, in seconds.
    #[serde(default = "ControlConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Connect timeout for provider and console requests, in seconds.
    #[serde(default = "ControlConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Platform-identity to role assignments for operators.
    #[serde(default)]
    pub operator_roles: IdentityDirectory,
}

impl ControlConfig {
    fn default_probe_url() -> String {
        McsrvstatProbe::DEFAULT_BASE_URL.to_string()
    }

    const fn default_game_port() -> u16 {
        25565
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the connect timeout as a `Duration`.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Load the configuration from `MINEWARD_*` environment variables.
    ///
    /// Only `MINEWARD_INSTANCE_ID` is required; everything else falls back
    /// to the same defaults the serde form uses.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a missing instance id or any value
    /// that fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let instance_id: InstanceId = std::env::var("MINEWARD_INSTANCE_ID")
            .map_err(|_| ConfigError::MissingVar("MINEWARD_INSTANCE_ID"))?
            .parse()?;

        let operator_roles = match std::env::var("MINEWARD_OPERATOR_ROLES") {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| ConfigError::InvalidRoles(e.to_string()))?,
            Err(_) => IdentityDirectory::default(),
        };

        Ok(Self {
            instance_id,
            provider_url: env_or("MINEWARD_PROVIDER_URL", "http://localhost:8081"),
            console_url: env_or("MINEWARD_CONSOLE_URL", "http://localhost:8082"),
            probe_url: env_or("MINEWARD_PROBE_URL", McsrvstatProbe::DEFAULT_BASE_URL),
            game_port: env_parse("MINEWARD_GAME_PORT")?.unwrap_or(Self::default_game_port()),
            request_timeout_seconds: env_parse("MINEWARD_REQUEST_TIMEOUT_SECONDS")?
                .unwrap_or(Self::default_request_timeout()),
            connect_timeout_seconds: env_parse("MINEWARD_CONNECT_TIMEOUT_SECONDS")?
                .unwrap_or(Self::default_connect_timeout()),
            operator_roles,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(None),
    }
}
