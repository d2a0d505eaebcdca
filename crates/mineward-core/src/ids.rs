//! Core identifier types for mineward.
//!
//! This module provides the strongly-typed identifier for the managed compute
//! instance. The provider assigns instance identifiers; mineward treats them
//! as opaque strings and only rejects values that cannot possibly name an
//! instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The identifier of a compute instance, as assigned by the provider.
///
/// Instance IDs are opaque to mineward. The only validation applied is that
/// the identifier is non-empty and carries no surrounding whitespace.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceId(String);

impl InstanceId {
    /// Create an `InstanceId` from a provider-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the identifier is empty or whitespace-only,
    /// `IdError::SurroundingWhitespace` if it is padded.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdError::Empty);
        }
        if id.trim() != id {
            return Err(IdError::SurroundingWhitespace);
        }
        Ok(Self(id))
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for InstanceId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InstanceId> for String {
    fn from(id: InstanceId) -> Self {
        id.0
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty or whitespace-only.
    #[error("identifier is empty")]
    Empty,

    /// The identifier had leading or trailing whitespace.
    #[error("identifier has surrounding whitespace")]
    SurroundingWhitespace,
}
