//! Network endpoint of the hosted game server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reachable `host:port` pair for the hosted application.
///
/// The host is whatever address the provider allocated (usually a public
/// IPv4 address, but a DNS name is accepted); the port is the well-known
/// game port the instance serves on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from a host and port.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::EmptyHost` if the host is empty.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, EndpointError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        Ok(Self { host, port })
    }

    /// The host portion of the endpoint.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port portion of the endpoint.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.rsplit_once(':').ok_or(EndpointError::MissingPort)?;
        let port: u16 = port
            .parse()
            .map_err(|_| EndpointError::InvalidPort(port.to_string()))?;
        Self::new(host, port)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

/// Errors that can occur when parsing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// The host portion was empty.
    #[error("endpoint host is empty")]
    EmptyHost,

    /// The `host:port` separator was missing.
    #[error("endpoint is missing a port")]
    MissingPort,

    /// The port portion was not a valid port number.
    #[error("invalid port: {0}")]
    InvalidPort(String),
}
