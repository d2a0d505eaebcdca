//! Status snapshot types for the managed server.
//!
//! These types define what callers get back from connection and status
//! queries. Every snapshot is built fresh from the provider and probe on each
//! call; nothing here is cached.

use chrono::{DateTime, Utc};
use mineward_core::Endpoint;
use serde::{Deserialize, Serialize};

use crate::state::LifecycleState;

/// Connectivity snapshot of the managed instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Where players can reach the game server. Present only when the
    /// instance is running and the provider has allocated an address.
    pub endpoint: Option<Endpoint>,
    /// Normalized instance lifecycle state.
    pub state: LifecycleState,
}

impl Connection {
    /// A connection snapshot with no reachable endpoint.
    #[must_use]
    pub const fn unreachable(state: LifecycleState) -> Self {
        Self {
            endpoint: None,
            state,
        }
    }
}

/// A text block rendered three ways by the status service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Raw lines with formatting codes.
    #[serde(default)]
    pub raw: Vec<String>,
    /// Lines with formatting codes stripped.
    #[serde(default)]
    pub clean: Vec<String>,
    /// Lines rendered as HTML.
    #[serde(default)]
    pub html: Vec<String>,
}

/// Player counts and roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    /// Players currently online.
    pub online: u32,
    /// Server player capacity.
    pub max: u32,
    /// Roster of online players, when the server exposes it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<Player>,
}

/// A single online player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// In-game name.
    pub name: String,
    /// Stable player identifier, when the server exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// A named component with a version, such as a plugin or mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedVersion {
    /// Component name.
    pub name: String,
    /// Component version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Application-level status of the hosted game server, as reported by the
/// external liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    /// Whether the game server answered the probe.
    pub online: bool,
    /// Address the probe resolved, when online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Port the probe resolved, when online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Hostname the probe resolved, when one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Game server version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Server software, when the server exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    /// Game mode, when the server exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamemode: Option<String>,
    /// Current world/map name, when the server exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<TextBlock>,
    /// Message of the day.
    #[serde(default)]
    pub motd: TextBlock,
    /// Player counts and roster.
    #[serde(default)]
    pub players: Players,
    /// Installed plugins, when the server exposes them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<NamedVersion>,
    /// Installed mods, when the server exposes them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mods: Vec<NamedVersion>,
    /// URL of the server's icon image.
    pub icon_url: String,
}

impl ApplicationStatus {
    /// The degraded placeholder substituted when the liveness probe fails.
    ///
    /// Well-formed and unmistakably offline: no address, empty motd, zero
    /// players. The icon URL is derived the same way as on the success path
    /// so clients render a stable image either way.
    #[must_use]
    pub fn offline(icon_url: impl Into<String>) -> Self {
        Self {
            online: false,
            ip: None,
            port: None,
            hostname: None,
            version: None,
            software: None,
            gamemode: None,
            map: None,
            motd: TextBlock::default(),
            players: Players::default(),
            plugins: Vec::new(),
            mods: Vec::new(),
            icon_url: icon_url.into(),
        }
    }
}

/// Unified status snapshot: infrastructure connectivity plus best-effort
/// application status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Connectivity snapshot from the provider.
    pub connection: Connection,
    /// Application status. Present only when the instance is running with an
    /// allocated endpoint; the probe failing degrades this to the offline
    /// placeholder rather than removing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationStatus>,
    /// When this snapshot was taken.
    pub checked_at: DateTime<Utc>,
}

/// Result of a fire-and-report lifecycle action.
///
/// The operator-facing wrappers report success or failure without leaking
/// internal error detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether the action was accepted.
    pub success: bool,
}

impl ActionOutcome {
    /// An accepted action.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }

    /// A rejected or failed action.
    #[must_use]
    pub const fn failed() -> Self {
        Self { success: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_placeholder_is_well_formed() {
        let status = ApplicationStatus::offline("https://status.example/icon/203.0.113.5:25565");
        assert!(!status.online);
        assert!(status.ip.is_none());
        assert!(status.motd.raw.is_empty());
        assert!(status.motd.clean.is_empty());
        assert_eq!(status.players.online, 0);
        assert_eq!(status.players.max, 0);
        assert!(status.players.list.is_empty());
        assert_eq!(
            status.icon_url,
            "https://status.example/icon/203.0.113.5:25565"
        );
    }

    #[test]
    fn unreachable_connection_has_no_endpoint() {
        let connection = Connection::unreachable(LifecycleState::Stopped);
        assert!(connection.endpoint.is_none());
        assert_eq!(connection.state, LifecycleState::Stopped);
    }

    #[test]
    fn server_status_serializes_without_absent_application() {
        let status = ServerStatus {
            connection: Connection::unreachable(LifecycleState::Stopped),
            application: None,
            checked_at: Utc::now(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("application"));
        assert!(json.contains("\"state\":\"STOPPED\""));
    }

    #[test]
    fn application_status_roundtrips() {
        let status = ApplicationStatus {
            online: true,
            ip: Some("203.0.113.5".to_string()),
            port: Some(25565),
            version: Some("1.21".to_string()),
            players: Players {
                online: 3,
                max: 20,
                list: vec![Player {
                    name: "steve".to_string(),
                    uuid: Some("069a79f4-44e9-4726-a5be-fca90e38aaf5".to_string()),
                }],
            },
            ..ApplicationStatus::offline("https://status.example/icon/a:1")
        };

        let json = serde_json::to_string(&status).unwrap();
        let back: ApplicationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
