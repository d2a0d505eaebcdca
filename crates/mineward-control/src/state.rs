//! Normalized instance lifecycle states and the provider label mapping.
//!
//! The provider reports instance states as free-form labels; this module
//! normalizes them into [`LifecycleState`] and is the single place where the
//! label vocabulary is known.
//!
//! # State machine
//!
//! ```text
//!              start()
//! ┌─────────┐ ────────▶ ┌─────────┐          ┌─────────┐
//! │ STOPPED │           │ PENDING │ ────────▶│ RUNNING │
//! └─────────┘           └─────────┘          └─────────┘
//!      ▲                                          │ stop()
//!      │                ┌──────────┐              ▼
//!      └─────────────── │ STOPPING │ ◀────────────┘
//!                       └──────────┘
//!
//! SHUTTING_DOWN ──▶ TERMINATED   (absorbing; issued outside this system)
//! UNKNOWN                        (provider query failed, nothing else)
//! ```
//!
//! `UNKNOWN` is produced only when the provider could not be asked at all. A
//! provider that answers with a label outside the table is a contract break
//! and surfaces as [`ControlError::UnmappedProviderState`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ControlError, Result};

/// Normalized lifecycle state of the managed compute instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// The instance is starting up.
    Pending,
    /// The instance is up; the game server may or may not be reachable yet.
    Running,
    /// A stop has been issued and is in progress.
    Stopping,
    /// The instance is stopped and can be started.
    Stopped,
    /// The instance is being terminated.
    ShuttingDown,
    /// The instance no longer exists. Absorbing: callers should not issue
    /// further transitions once this is observed.
    Terminated,
    /// The provider state query itself failed. Never produced for an
    /// unrecognized label.
    Unknown,
}

impl LifecycleState {
    /// True if `start()` may be issued from this state.
    ///
    /// `Unknown` fails this check: an unreadable state is not evidence the
    /// instance is stopped.
    #[must_use]
    pub const fn may_start(self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// True if `stop()` may be issued from this state.
    ///
    /// `Unknown` fails this check as well.
    #[must_use]
    pub const fn may_stop(self) -> bool {
        matches!(self, Self::Running)
    }

    /// True once the instance is gone for good.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::ShuttingDown => "SHUTTING_DOWN",
            Self::Terminated => "TERMINATED",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{name}")
    }
}

/// The lifecycle transition an operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    /// Bring the instance up.
    Start,
    /// Shut the instance down.
    Stop,
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// Map a provider-reported state label to a [`LifecycleState`].
///
/// Matching is case-insensitive and exact over the fixed vocabulary.
///
/// # Errors
///
/// Returns [`ControlError::UnmappedProviderState`] for any label outside the
/// table, including the empty string. This is a hard error: it means the
/// mapping table has a gap, not that the provider was unreachable.
pub fn map_state(label: &str) -> Result<LifecycleState> {
    match label.to_ascii_lowercase().as_str() {
        "pending" => Ok(LifecycleState::Pending),
        "running" => Ok(LifecycleState::Running),
        "shutting-down" => Ok(LifecycleState::ShuttingDown),
        "stopped" => Ok(LifecycleState::Stopped),
        "stopping" => Ok(LifecycleState::Stopping),
        "terminated" => Ok(LifecycleState::Terminated),
        _ => Err(ControlError::UnmappedProviderState(label.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map() {
        assert_eq!(map_state("pending").unwrap(), LifecycleState::Pending);
        assert_eq!(map_state("running").unwrap(), LifecycleState::Running);
        assert_eq!(
            map_state("shutting-down").unwrap(),
            LifecycleState::ShuttingDown
        );
        assert_eq!(map_state("stopped").unwrap(), LifecycleState::Stopped);
        assert_eq!(map_state("stopping").unwrap(), LifecycleState::Stopping);
        assert_eq!(map_state("terminated").unwrap(), LifecycleState::Terminated);
    }

    #[test]
    fn mapping_is_case_insensitive() {
        assert_eq!(map_state("RUNNING").unwrap(), LifecycleState::Running);
        assert_eq!(map_state("Stopped").unwrap(), LifecycleState::Stopped);
        assert_eq!(
            map_state("Shutting-Down").unwrap(),
            LifecycleState::ShuttingDown
        );
    }

    #[test]
    fn unknown_labels_are_hard_errors() {
        for label in ["", "limbo", "shutting_down", "run ning", "UNKNOWN"] {
            let err = map_state(label).unwrap_err();
            match err {
                ControlError::UnmappedProviderState(got) => assert_eq!(got, label),
                other => panic!("expected UnmappedProviderState, got {other:?}"),
            }
        }
    }

    #[test]
    fn mapper_never_produces_unknown() {
        // UNKNOWN is reserved for failed provider queries; the label "unknown"
        // is not in the vocabulary.
        assert!(map_state("unknown").is_err());
    }

    #[test]
    fn start_only_from_stopped() {
        assert!(LifecycleState::Stopped.may_start());
        for state in [
            LifecycleState::Pending,
            LifecycleState::Running,
            LifecycleState::Stopping,
            LifecycleState::ShuttingDown,
            LifecycleState::Terminated,
            LifecycleState::Unknown,
        ] {
            assert!(!state.may_start(), "{state} should not allow start");
        }
    }

    #[test]
    fn stop_only_from_running() {
        assert!(LifecycleState::Running.may_stop());
        for state in [
            LifecycleState::Pending,
            LifecycleState::Stopping,
            LifecycleState::Stopped,
            LifecycleState::ShuttingDown,
            LifecycleState::Terminated,
            LifecycleState::Unknown,
        ] {
            assert!(!state.may_stop(), "{state} should not allow stop");
        }
    }

    #[test]
    fn terminated_is_the_only_terminal_state() {
        assert!(LifecycleState::Terminated.is_terminal());
        assert!(!LifecycleState::Stopped.is_terminal());
        assert!(!LifecycleState::Unknown.is_terminal());
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(LifecycleState::ShuttingDown.to_string(), "SHUTTING_DOWN");
        assert_eq!(
            serde_json::to_string(&LifecycleState::ShuttingDown).unwrap(),
            "\"SHUTTING_DOWN\""
        );
    }
}
