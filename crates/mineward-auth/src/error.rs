//! Authorization error types.

use thiserror::Error;

use crate::role::Role;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during authorization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The caller's role does not satisfy the required minimum.
    ///
    /// The message is intentionally safe to relay to the end user verbatim.
    #[error("you do not have permission to perform this action")]
    Forbidden {
        /// The minimum role the operation requires.
        required: Role,
    },
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Forbidden { .. } => 403,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    ///
    /// A denial never is; the caller's role would have to change first.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        false
    }
}
