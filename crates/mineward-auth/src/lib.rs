//! Role-based authorization for mineward.
//!
//! This crate decides which callers may invoke privileged operator commands.
//! It provides:
//!
//! - A fixed [`Role`] hierarchy (`OWNER < ADMIN < USER < NONE`, strongest
//!   first)
//! - [`Principal`], a resolved caller identity with its claims
//! - [`RoleGate`], the single enforcement point for minimum-role checks
//! - [`IdentityDirectory`], the injected platform-identity → role mapping
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │  Chat transport  │────▶│ IdentityDirectory │
//! │  (external)      │     │  id → Role        │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │ Principal
//!                          ┌────────▼─────────┐
//!                          │    RoleGate      │
//!                          │  require_role()  │
//!                          └────────┬─────────┘
//!                                   │ Ok / Forbidden
//!                          ┌────────▼─────────┐
//!                          │  Privileged op   │
//!                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use mineward_auth::{IdentityDirectory, Role, RoleGate};
//!
//! let directory: IdentityDirectory =
//!     [("426503936501874707".to_string(), Role::Owner)]
//!         .into_iter()
//!         .collect();
//! let gate = RoleGate::new();
//!
//! let owner = directory.principal_for("426503936501874707");
//! assert!(gate.require_role(Role::Owner, &owner).is_ok());
//!
//! let stranger = directory.principal_for("000000000000000000");
//! assert!(gate.require_role(Role::Owner, &stranger).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod gate;
pub mod principal;
pub mod role;

pub use directory::IdentityDirectory;
pub use error::{AuthError, Result};
pub use gate::RoleGate;
pub use principal::{ClaimKey, Principal};
pub use role::Role;
