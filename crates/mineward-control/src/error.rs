//! Error types for server control operations.
//!
//! This module defines all errors that can occur during lifecycle,
//! status, and command execution operations.

use thiserror::Error;

use crate::state::{LifecycleState, TransitionAction};

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Errors that can occur in server control operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The caller is not authorized for the requested operation.
    #[error(transparent)]
    Auth(#[from] mineward_auth::AuthError),

    /// The lifecycle precondition for a transition was not met.
    ///
    /// Carries the state observed at check time. No provider call is issued
    /// when this is returned.
    #[error("server cannot {action}: instance state is {observed}")]
    InvalidTransition {
        /// The transition that was requested.
        action: TransitionAction,
        /// The instance state observed when the precondition was checked.
        observed: LifecycleState,
    },

    /// The provider reported an instance state outside the known vocabulary.
    ///
    /// This indicates a gap in the mapping table or a provider contract
    /// break, not a transient failure. It is never coerced to
    /// [`LifecycleState::Unknown`].
    #[error("unrecognized provider instance state: {0:?}")]
    UnmappedProviderState(String),

    /// A provider call the caller explicitly requested failed.
    #[error("provider request failed: {0}")]
    Provider(String),

    /// The remote console channel failed to deliver a command.
    #[error("console request failed: {0}")]
    Console(String),
}

impl ControlError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Auth(err) => err.http_status_code(),
            Self::InvalidTransition { .. } => 409,
            Self::UnmappedProviderState(_) | Self::Provider(_) | Self::Console(_) => 500,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    ///
    /// A rejected transition can succeed once the instance settles into the
    /// required state; provider and console failures are usually transient.
    /// A denial or a mapping-table gap never resolves on retry.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::Provider(_) | Self::Console(_)
        )
    }
}
