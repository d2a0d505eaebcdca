//! Server control for the mineward platform.
//!
//! This crate provides the core business logic for operating a single
//! managed game-server instance: lifecycle control, unified status
//! aggregation, and owner-gated remote command execution.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Chat transport (external)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ OperatorCommand + Principal
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Operations                            │
//! │  ┌──────────────┐ ┌───────────────┐ ┌──────────────────┐    │
//! │  │  Instance    │ │    Status     │ │    Command       │    │
//! │  │  Controller  │ │    Service    │ │    Executor      │    │
//! │  └──────────────┘ └───────────────┘ └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                │              │                │
//!                ▼              ▼                ▼
//!         ┌────────────┐ ┌────────────┐  ┌────────────┐
//!         │  Provider  │ │   Status   │  │  Console   │
//!         │  (HTTP)    │ │   probe    │  │  relay     │
//!         └────────────┘ └────────────┘  └────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use mineward_auth::RoleGate;
//! use mineward_control::{
//!     CommandExecutor, HttpConsoleClient, HttpInstanceClient, InstanceController,
//!     McsrvstatProbe, Operations, StatusService,
//! };
//! use mineward_core::InstanceId;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let instance_id = InstanceId::new("i-0123456789abcdef0")?;
//! let provider = Arc::new(HttpInstanceClient::new("http://provider:8081"));
//! let console = Arc::new(HttpConsoleClient::new("http://console:8082"));
//! let probe = Arc::new(McsrvstatProbe::new());
//!
//! let controller = Arc::new(InstanceController::new(
//!     provider,
//!     instance_id.clone(),
//!     25565,
//! ));
//! let status = StatusService::new(Arc::clone(&controller), probe);
//! let executor = CommandExecutor::new(RoleGate::new(), console, instance_id);
//!
//! let ops = Operations::new(controller, status, executor);
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle preconditions
//!
//! - `start()` is legal only from `STOPPED`
//! - `stop()` is legal only from `RUNNING`
//! - `UNKNOWN` (a failed provider query) fails both preconditions
//!
//! Rejected transitions never issue a provider call. See the
//! [`controller`] module for the check-then-act caveat.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod ops;
pub mod probe;
pub mod provider;
pub mod state;
pub mod status;
pub mod types;

pub use command::{CommandExecutor, MAX_OUTPUT_CHARS};
pub use config::{ConfigError, ControlConfig};
pub use console::{ConsoleChannel, HttpConsoleClient};
pub use controller::InstanceController;
pub use error::{ControlError, Result};
pub use ops::{OperatorCommand, Operations};
pub use probe::{McsrvstatProbe, ProbeError, StatusProbe};
pub use provider::{HttpInstanceClient, InstanceApi};
pub use state::{map_state, LifecycleState, TransitionAction};
pub use status::StatusService;
pub use types::{
    ActionOutcome, ApplicationStatus, Connection, NamedVersion, Player, Players, ServerStatus,
    TextBlock,
};

#[cfg(any(test, feature = "test-utils"))]
pub use console::RecordingConsole;
#[cfg(any(test, feature = "test-utils"))]
pub use probe::StaticProbe;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::StaticInstanceApi;

// Re-export commonly used types from dependencies for convenience
pub use mineward_auth::{Principal, Role, RoleGate};
pub use mineward_core::{Endpoint, InstanceId};
