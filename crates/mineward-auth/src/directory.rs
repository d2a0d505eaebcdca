//! Identity extraction: platform identities to principals.

use std::collections::HashMap;

use serde::Deserialize;

use crate::principal::{ClaimKey, Principal};
use crate::role::Role;

/// A platform-identity to role mapping, loaded once at process start and
/// injected wherever principals need to be built.
///
/// Identities not present in the directory resolve to [`Role::None`]; the
/// identity claim is still populated so denials can be attributed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IdentityDirectory {
    roles: HashMap<String, Role>,
}

impl IdentityDirectory {
    /// Build a directory from an explicit mapping.
    #[must_use]
    pub fn from_map(roles: HashMap<String, Role>) -> Self {
        Self { roles }
    }

    /// Look up the role assigned to a platform identity.
    #[must_use]
    pub fn role_of(&self, platform_id: &str) -> Role {
        self.roles.get(platform_id).copied().unwrap_or(Role::None)
    }

    /// Build the principal for a platform identity.
    #[must_use]
    pub fn principal_for(&self, platform_id: &str) -> Principal {
        Principal::new()
            .with_claim(ClaimKey::Role, self.role_of(platform_id).to_string())
            .with_claim(ClaimKey::UserId, platform_id)
    }

    /// Number of identities with an assigned role.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True if no identities have an assigned role.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl FromIterator<(String, Role)> for IdentityDirectory {
    fn from_iter<I: IntoIterator<Item = (String, Role)>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}
