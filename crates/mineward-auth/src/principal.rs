//! Principals: resolved caller identities with their claims.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keys under which claims are stored on a [`Principal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimKey {
    /// The caller's claimed role name.
    Role,
    /// The caller's platform identity.
    UserId,
}

/// A resolved caller identity.
///
/// Principals are produced by identity extraction from inbound request
/// metadata and live only for the duration of a single call; they are never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Claims attached to this identity.
    pub claims: HashMap<ClaimKey, String>,
}

impl Principal {
    /// Create a principal with no claims.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a claim, replacing any existing value under the same key.
    #[must_use]
    pub fn with_claim(mut self, key: ClaimKey, value: impl Into<String>) -> Self {
        self.claims.insert(key, value.into());
        self
    }

    /// Look up a claim value.
    #[must_use]
    pub fn claim(&self, key: ClaimKey) -> Option<&str> {
        self.claims.get(&key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_are_retrievable() {
        let principal = Principal::new()
            .with_claim(ClaimKey::Role, "ADMIN")
            .with_claim(ClaimKey::UserId, "426503936501874707");

        assert_eq!(principal.claim(ClaimKey::Role), Some("ADMIN"));
        assert_eq!(
            principal.claim(ClaimKey::UserId),
            Some("426503936501874707")
        );
    }

    #[test]
    fn missing_claim_is_none() {
        let principal = Principal::new();
        assert_eq!(principal.claim(ClaimKey::Role), None);
    }

    #[test]
    fn later_claim_replaces_earlier() {
        let principal = Principal::new()
            .with_claim(ClaimKey::Role, "USER")
            .with_claim(ClaimKey::Role, "ADMIN");
        assert_eq!(principal.claim(ClaimKey::Role), Some("ADMIN"));
    }
}
