//! Core types and utilities for mineward.
//!
//! This crate provides the foundational types used throughout the mineward
//! platform:
//!
//! - **Identifiers**: the strongly-typed [`InstanceId`] of the managed
//!   compute instance
//! - **Endpoints**: the [`Endpoint`] (`host:port`) the hosted game server is
//!   reachable on
//!
//! # Example
//!
//! ```
//! use mineward_core::{Endpoint, InstanceId};
//!
//! let instance_id = InstanceId::new("i-0123456789abcdef0").unwrap();
//! let endpoint: Endpoint = "203.0.113.5:25565".parse().unwrap();
//!
//! assert_eq!(endpoint.to_string(), "203.0.113.5:25565");
//! assert_eq!(instance_id.as_str(), "i-0123456789abcdef0");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod endpoint;
pub mod ids;

pub use endpoint::{Endpoint, EndpointError};
pub use ids::{IdError, InstanceId};
