//! The fixed role hierarchy for operator commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege level of an operator.
///
/// The hierarchy is a fixed total order: `Owner` is the strongest role and
/// `None` the weakest. The set is closed; roles cannot be added at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full control, including arbitrary console commands.
    Owner,
    /// Elevated operator.
    Admin,
    /// Regular member.
    User,
    /// No privileges. Also the fallback for unknown or absent role claims.
    None,
}

impl Role {
    /// Rank within the hierarchy. Lower rank means a stronger role.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Owner => 0,
            Self::Admin => 1,
            Self::User => 2,
            Self::None => 3,
        }
    }

    /// Resolve a role claim value to a role.
    ///
    /// The claim must exactly match one of the known role names; anything
    /// else (including an absent claim) resolves to `Role::None`. A caller
    /// is never granted a role it did not explicitly claim.
    #[must_use]
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some("OWNER") => Self::Owner,
            Some("ADMIN") => Self::Admin,
            Some("USER") => Self::User,
            _ => Self::None,
        }
    }

    /// True if this role is at least as strong as `required`.
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        self.rank() <= required.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::None => "NONE",
        };
        write!(f, "{name}")
    }
}
