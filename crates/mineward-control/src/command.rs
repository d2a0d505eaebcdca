//! Remote command execution, gated to the strongest role.

use std::sync::Arc;

use mineward_auth::{Principal, Role, RoleGate};
use mineward_core::InstanceId;

use crate::console::ConsoleChannel;
use crate::error::Result;

/// Maximum number of characters of console output returned to the caller.
///
/// Downstream chat transports impose strict payload limits; keeping the tail
/// preserves the most recent (and most relevant) output.
pub const MAX_OUTPUT_CHARS: usize = 1024;

/// Executes arbitrary game-server commands on behalf of the owner.
pub struct CommandExecutor<C: ConsoleChannel> {
    gate: RoleGate,
    console: Arc<C>,
    instance_id: InstanceId,
}

impl<C: ConsoleChannel> CommandExecutor<C> {
    /// Create an executor for the given instance.
    #[must_use]
    pub fn new(gate: RoleGate, console: Arc<C>, instance_id: InstanceId) -> Self {
        Self {
            gate,
            console,
            instance_id,
        }
    }

    /// Execute `command` on the server console and return its output.
    ///
    /// Output lines are joined with newlines and truncated to the last
    /// [`MAX_OUTPUT_CHARS`] characters. Empty console output yields an empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`mineward_auth::AuthError::Forbidden`] (as a
    /// [`crate::error::ControlError::Auth`]) before the console is ever
    /// contacted unless the principal holds the `OWNER` role. Console
    /// delivery failures propagate.
    pub async fn execute(&self, principal: &Principal, command: &str) -> Result<String> {
        self.gate.require_role(Role::Owner, principal)?;

        let lines = self.console.send(&self.instance_id, command).await?;
        Ok(tail_chars(&lines.join("\n"), MAX_OUTPUT_CHARS))
    }
}

/// Keep the last `max` characters of `text`.
///
/// Counts characters, not bytes or lines, so multi-byte output truncates on
/// a character boundary.
fn tail_chars(text: &str, max: usize) -> String {
    let total = text.chars().count();
    if total <= max {
        return text.to_string();
    }
    text.chars().skip(total - max).collect()
}
