//! The authorization gate for privileged operations.

use crate::error::{AuthError, Result};
use crate::principal::{ClaimKey, Principal};
use crate::role::Role;

/// Checks a principal's claimed role against a required minimum.
///
/// The gate resolves the role claim with [`Role::from_claim`], so a
/// principal with an unknown or absent claim is treated as [`Role::None`]
/// and denied everything above the open tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate;

impl RoleGate {
    /// Create a new gate.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve the principal's effective role.
    #[must_use]
    pub fn resolve_role(self, principal: &Principal) -> Role {
        Role::from_claim(principal.claim(ClaimKey::Role))
    }

    /// True if the principal's role is at least as strong as `required`.
    #[must_use]
    pub fn has_role_or_higher(self, required: Role, principal: &Principal) -> bool {
        self.resolve_role(principal).satisfies(required)
    }

    /// Fail with [`AuthError::Forbidden`] unless the principal's role is at
    /// least as strong as `required`.
    ///
    /// This is the only path by which privileged operations are blocked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` when the check fails.
    pub fn require_role(self, required: Role, principal: &Principal) -> Result<()> {
        if self.has_role_or_higher(required, principal) {
            return Ok(());
        }

        tracing::warn!(
            required = %required,
            actual = %self.resolve_role(principal),
            user_id = principal.claim(ClaimKey::UserId).unwrap_or("<unknown>"),
            "Denied privileged operation"
        );

        Err(AuthError::Forbidden { required })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal_with_role(role: &str) -> Principal {
        Principal::new()
            .with_claim(ClaimKey::Role, role)
            .with_claim(ClaimKey::UserId, "318259216429219841")
    }

    #[test]
    fn owner_passes_owner_requirement() {
        let gate = RoleGate::new();
        assert!(gate.has_role_or_higher(Role::Owner, &principal_with_role("OWNER")));
        assert!(gate
            .require_role(Role::Owner, &principal_with_role("OWNER"))
            .is_ok());
    }

    #[test]
    fn only_owner_passes_owner_requirement() {
        let gate = RoleGate::new();
        for role in ["ADMIN", "USER", "NONE"] {
            assert!(!gate.has_role_or_higher(Role::Owner, &principal_with_role(role)));
        }
    }

    #[test]
    fn unrecognized_claim_is_denied() {
        let gate = RoleGate::new();
        assert!(!gate.has_role_or_higher(Role::Owner, &principal_with_role("SUPERUSER")));
        assert!(!gate.has_role_or_higher(Role::User, &principal_with_role("owner")));
    }

    #[test]
    fn absent_claim_is_denied() {
        let gate = RoleGate::new();
        let principal = Principal::new();
        assert!(!gate.has_role_or_higher(Role::User, &principal));
        // The open tier still passes.
        assert!(gate.has_role_or_higher(Role::None, &principal));
    }

    #[test]
    fn admin_passes_user_requirement() {
        let gate = RoleGate::new();
        assert!(gate.has_role_or_higher(Role::User, &principal_with_role("ADMIN")));
    }

    #[test]
    fn denial_carries_required_role() {
        let gate = RoleGate::new();
        let err = gate
            .require_role(Role::Owner, &principal_with_role("USER"))
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::Forbidden {
                required: Role::Owner
            }
        );
    }
}
