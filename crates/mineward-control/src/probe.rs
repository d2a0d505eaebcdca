//! Best-effort liveness probe against an external status service.
//!
//! The probe asks a third-party HTTP service whether the game server at a
//! given endpoint is reachable and what it reports about itself. Probe
//! results are advisory: the status aggregator absorbs every failure here
//! into a degraded placeholder, so nothing in this module is load-bearing
//! for the non-error contract of a status query.

use std::time::Duration;

use async_trait::async_trait;
use mineward_core::Endpoint;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{ApplicationStatus, NamedVersion, Player, Players, TextBlock};

/// Errors that can occur while probing the game server.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The HTTP request could not be completed.
    #[error("probe request failed: {0}")]
    Request(String),

    /// The status service answered with a non-success status code.
    #[error("status service returned status {0}")]
    Status(u16),

    /// The status document could not be parsed.
    #[error("malformed status document: {0}")]
    Malformed(String),
}

/// Trait for the external liveness probe capability.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Query the application status of the game server at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] on timeout, transport failure, non-success
    /// response, or a document that cannot be parsed.
    async fn probe(&self, endpoint: &Endpoint) -> Result<ApplicationStatus, ProbeError>;

    /// Derive the icon URL for `endpoint`.
    ///
    /// Used on both the success path and the degraded placeholder, so the
    /// two stay consistent.
    fn icon_url(&self, endpoint: &Endpoint) -> String;
}

/// HTTP client for an mcsrvstat-style status service.
#[derive(Debug, Clone)]
pub struct McsrvstatProbe {
    client: reqwest::Client,
    base_url: String,
}

impl McsrvstatProbe {
    /// The public status service this probe defaults to.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.mcsrvstat.us";

    /// Create a probe against the default public status service.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Create a probe against a specific status service.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the base URL of the status service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for McsrvstatProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw status document as served by the status service.
///
/// Only the fields this system consumes are modeled; the service sends more.
#[derive(Debug, Deserialize)]
struct RawStatusDocument {
    online: bool,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    software: Option<String>,
    #[serde(default)]
    gamemode: Option<String>,
    #[serde(default)]
    map: Option<RawTextBlock>,
    #[serde(default)]
    motd: Option<RawTextBlock>,
    #[serde(default)]
    players: Option<RawPlayers>,
    #[serde(default)]
    plugins: Option<Vec<RawNamedVersion>>,
    #[serde(default)]
    mods: Option<Vec<RawNamedVersion>>,
}

#[derive(Debug, Deserialize)]
struct RawTextBlock {
    #[serde(default)]
    raw: Vec<String>,
    #[serde(default)]
    clean: Vec<String>,
    #[serde(default)]
    html: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlayers {
    #[serde(default)]
    online: u32,
    #[serde(default)]
    max: u32,
    #[serde(default)]
    list: Option<Vec<RawPlayer>>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    name: String,
    #[serde(default)]
    uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNamedVersion {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

impl From<RawTextBlock> for TextBlock {
    fn from(raw: RawTextBlock) -> Self {
        Self {
            raw: raw.raw,
            clean: raw.clean,
            html: raw.html,
        }
    }
}

impl RawStatusDocument {
    fn into_status(self, icon_url: String) -> ApplicationStatus {
        ApplicationStatus {
            online: self.online,
            ip: self.ip,
            port: self.port,
            hostname: self.hostname,
            version: self.version,
            software: self.software,
            gamemode: self.gamemode,
            map: self.map.map(TextBlock::from),
            motd: self.motd.map(TextBlock::from).unwrap_or_default(),
            players: self.players.map_or_else(Players::default, |p| Players {
                online: p.online,
                max: p.max,
                list: p
                    .list
                    .unwrap_or_default()
                    .into_iter()
                    .map(|player| Player {
                        name: player.name,
                        uuid: player.uuid,
                    })
                    .collect(),
            }),
            plugins: self
                .plugins
                .unwrap_or_default()
                .into_iter()
                .map(|p| NamedVersion {
                    name: p.name,
                    version: p.version,
                })
                .collect(),
            mods: self
                .mods
                .unwrap_or_default()
                .into_iter()
                .map(|m| NamedVersion {
                    name: m.name,
                    version: m.version,
                })
                .collect(),
            icon_url,
        }
    }
}

#[async_trait]
impl StatusProbe for McsrvstatProbe {
    async fn probe(&self, endpoint: &Endpoint) -> Result<ApplicationStatus, ProbeError> {
        let url = format!("{}/3/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        let document: RawStatusDocument = response
            .json()
            .await
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;

        Ok(document.into_status(self.icon_url(endpoint)))
    }

    fn icon_url(&self, endpoint: &Endpoint) -> String {
        format!("{}/icon/{}", self.base_url, endpoint)
    }
}

/// An in-memory probe fake for tests.
///
/// Replies with a configured status, or fails every probe when none is
/// configured.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct StaticProbe {
    status: Option<ApplicationStatus>,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticProbe {
    /// A probe that fails every query.
    #[must_use]
    pub fn failing() -> Self {
        Self { status: None }
    }

    /// A probe that replies with the given status.
    #[must_use]
    pub fn replying(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl StatusProbe for StaticProbe {
    async fn probe(&self, _endpoint: &Endpoint) -> Result<ApplicationStatus, ProbeError> {
        self.status
            .clone()
            .ok_or_else(|| ProbeError::Request("simulated probe outage".to_string()))
    }

    fn icon_url(&self, endpoint: &Endpoint) -> String {
        format!("https://status.example/icon/{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint() -> Endpoint {
        Endpoint::new("203.0.113.5", 25565).unwrap()
    }

    #[tokio::test]
    async fn parses_online_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/203.0.113.5:25565"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "online": true,
                "ip": "203.0.113.5",
                "port": 25565,
                "version": "1.21",
                "motd": {
                    "raw": ["§aA Minecraft Server"],
                    "clean": ["A Minecraft Server"],
                    "html": ["<span style=\"color: #55FF55\">A Minecraft Server</span>"]
                },
                "players": {
                    "online": 2,
                    "max": 20,
                    "list": [
                        {"name": "steve", "uuid": "069a79f4-44e9-4726-a5be-fca90e38aaf5"},
                        {"name": "alex"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let probe = McsrvstatProbe::with_base_url(server.uri());
        let status = probe.probe(&endpoint()).await.unwrap();

        assert!(status.online);
        assert_eq!(status.ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(status.version.as_deref(), Some("1.21"));
        assert_eq!(status.motd.clean, vec!["A Minecraft Server"]);
        assert_eq!(status.players.online, 2);
        assert_eq!(status.players.max, 20);
        assert_eq!(status.players.list.len(), 2);
        assert_eq!(status.players.list[1].name, "alex");
        assert_eq!(status.players.list[1].uuid, None);
        assert_eq!(
            status.icon_url,
            format!("{}/icon/203.0.113.5:25565", server.uri())
        );
    }

    #[tokio::test]
    async fn offline_document_parses_with_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/203.0.113.5:25565"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"online": false})))
            .mount(&server)
            .await;

        let probe = McsrvstatProbe::with_base_url(server.uri());
        let status = probe.probe(&endpoint()).await.unwrap();

        assert!(!status.online);
        assert!(status.motd.raw.is_empty());
        assert_eq!(status.players.online, 0);
    }

    #[tokio::test]
    async fn non_success_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/203.0.113.5:25565"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe = McsrvstatProbe::with_base_url(server.uri());
        let err = probe.probe(&endpoint()).await.unwrap_err();
        assert!(matches!(err, ProbeError::Status(503)));
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/203.0.113.5:25565"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let probe = McsrvstatProbe::with_base_url(server.uri());
        let err = probe.probe(&endpoint()).await.unwrap_err();
        assert!(matches!(err, ProbeError::Malformed(_)));
    }

    #[test]
    fn icon_url_is_derived_from_endpoint() {
        let probe = McsrvstatProbe::with_base_url("https://api.mcsrvstat.us");
        assert_eq!(
            probe.icon_url(&endpoint()),
            "https://api.mcsrvstat.us/icon/203.0.113.5:25565"
        );
    }
}
