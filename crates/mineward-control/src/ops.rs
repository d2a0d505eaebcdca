//! Operator-facing use cases and command dispatch.
//!
//! This module is the boundary the chat transport calls into. Lifecycle
//! actions are wrapped fire-and-report: internal errors are logged here and
//! reported as a plain failure, never leaked to the end user. The one
//! exception is an authorization denial, whose message is safe and intended
//! to reach the user directly.

use std::sync::Arc;

use mineward_auth::Principal;

use crate::command::CommandExecutor;
use crate::console::ConsoleChannel;
use crate::controller::InstanceController;
use crate::error::{ControlError, Result};
use crate::probe::StatusProbe;
use crate::provider::InstanceApi;
use crate::status::StatusService;
use crate::types::{ActionOutcome, Connection, ServerStatus};

/// An operator intent, as parsed by the (external) chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Bring the server up. Open to any caller.
    Start,
    /// Shut the server down. Open to any caller.
    Stop,
    /// Report the unified status. Open to any caller.
    Status,
    /// Run an arbitrary console command. Owner only.
    Execute {
        /// The console command to forward verbatim.
        command: String,
    },
}

impl OperatorCommand {
    /// Map an intent name and optional argument to a command.
    ///
    /// Returns `None` for unknown intents so the transport can answer with
    /// its own "unknown command" reply.
    #[must_use]
    pub fn parse(name: &str, argument: Option<&str>) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "status" => Some(Self::Status),
            "execute" => Some(Self::Execute {
                command: argument.unwrap_or_default().to_string(),
            }),
            _ => None,
        }
    }
}

/// The operator use cases, composed over the control services.
pub struct Operations<P: InstanceApi, B: StatusProbe, C: ConsoleChannel> {
    controller: Arc<InstanceController<P>>,
    status: StatusService<P, B>,
    executor: CommandExecutor<C>,
}

impl<P: InstanceApi, B: StatusProbe, C: ConsoleChannel> Operations<P, B, C> {
    /// Compose the use cases from their services.
    #[must_use]
    pub fn new(
        controller: Arc<InstanceController<P>>,
        status: StatusService<P, B>,
        executor: CommandExecutor<C>,
    ) -> Self {
        Self {
            controller,
            status,
            executor,
        }
    }

    /// Start the server, reporting only success or failure.
    ///
    /// Every propagated error is logged here and collapsed into
    /// `ActionOutcome::failed()`.
    pub async fn start_server(&self) -> ActionOutcome {
        match self.controller.start().await {
            Ok(state) => {
                tracing::info!(state = %state, "Server start accepted");
                ActionOutcome::ok()
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to start server");
                ActionOutcome::failed()
            }
        }
    }

    /// Stop the server, reporting only success or failure.
    pub async fn stop_server(&self) -> ActionOutcome {
        match self.controller.stop().await {
            Ok(state) => {
                tracing::info!(state = %state, "Server stop accepted");
                ActionOutcome::ok()
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to stop server");
                ActionOutcome::failed()
            }
        }
    }

    /// Take a unified status snapshot.
    ///
    /// # Errors
    ///
    /// Propagates connection-query failures; probe failures are already
    /// absorbed below this call.
    pub async fn server_status(&self) -> Result<ServerStatus> {
        self.status.status().await
    }

    /// Query the player-facing connection snapshot.
    ///
    /// # Errors
    ///
    /// Propagates connection-query failures.
    pub async fn server_connection(&self) -> Result<Connection> {
        self.controller.connection().await
    }

    /// Execute a console command as `principal`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-owners before any delivery is attempted;
    /// console failures propagate.
    pub async fn execute_command(&self, principal: &Principal, command: &str) -> Result<String> {
        self.executor.execute(principal, command).await
    }

    /// Dispatch an operator intent to its use case and render the reply.
    ///
    /// The reply is plain text suitable for a chat message. Internal error
    /// detail never appears in it; an authorization denial is relayed
    /// verbatim.
    pub async fn dispatch(&self, principal: &Principal, command: OperatorCommand) -> String {
        match command {
            OperatorCommand::Start => {
                if self.start_server().await.success {
                    "Server is starting".to_string()
                } else {
                    "Cannot start server".to_string()
                }
            }
            OperatorCommand::Stop => {
                if self.stop_server().await.success {
                    "Server is stopping".to_string()
                } else {
                    "Cannot stop server".to_string()
                }
            }
            OperatorCommand::Status => match self.server_status().await {
                Ok(status) => render_status(&status),
                Err(err) => {
                    tracing::error!(error = %err, "Failed to fetch server status");
                    "Cannot fetch server status".to_string()
                }
            },
            OperatorCommand::Execute { command } => {
                match self.execute_command(principal, &command).await {
                    Ok(output) if output.is_empty() => "Command sent".to_string(),
                    Ok(output) => output,
                    Err(err @ ControlError::Auth(_)) => err.to_string(),
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to execute command");
                        "Cannot execute command".to_string()
                    }
                }
            }
        }
    }
}

fn render_status(status: &ServerStatus) -> String {
    let mut reply = format!("Server state is {}", status.connection.state);

    match &status.connection.endpoint {
        Some(endpoint) => {
            reply.push_str(&format!(". Server address is `{endpoint}`"));
        }
        None => reply.push_str(". Server address is not available"),
    }

    if let Some(application) = &status.application {
        if application.online {
            reply.push_str(&format!(
                ". {}/{} players online",
                application.players.online, application.players.max
            ));
        }
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::RecordingConsole;
    use crate::probe::StaticProbe;
    use crate::provider::StaticInstanceApi;
    use crate::types::{ApplicationStatus, Players};
    use mineward_auth::{ClaimKey, Role, RoleGate};
    use mineward_core::InstanceId;

    fn instance_id() -> InstanceId {
        InstanceId::new("i-0123456789abcdef0").unwrap()
    }

    fn operations(
        provider: StaticInstanceApi,
        probe: StaticProbe,
        console: Arc<RecordingConsole>,
    ) -> Operations<StaticInstanceApi, StaticProbe, RecordingConsole> {
        let controller = Arc::new(InstanceController::new(
            Arc::new(provider),
            instance_id(),
            25565,
        ));
        let status = StatusService::new(Arc::clone(&controller), Arc::new(probe));
        let executor = CommandExecutor::new(RoleGate::new(), console, instance_id());
        Operations::new(controller, status, executor)
    }

    fn principal(role: &str) -> Principal {
        Principal::new()
            .with_claim(ClaimKey::Role, role)
            .with_claim(ClaimKey::UserId, "426503936501874707")
    }

    #[tokio::test]
    async fn start_then_start_again() {
        let ops = operations(
            StaticInstanceApi::with_state("stopped"),
            StaticProbe::failing(),
            Arc::new(RecordingConsole::new()),
        );
        let caller = principal("USER");

        let reply = ops.dispatch(&caller, OperatorCommand::Start).await;
        assert_eq!(reply, "Server is starting");

        // The fake provider now reports "pending"; the precondition rejects.
        let reply = ops.dispatch(&caller, OperatorCommand::Start).await;
        assert_eq!(reply, "Cannot start server");
    }

    #[tokio::test]
    async fn stop_failure_is_reported_without_detail() {
        let ops = operations(
            StaticInstanceApi::with_state("stopped"),
            StaticProbe::failing(),
            Arc::new(RecordingConsole::new()),
        );

        let reply = ops.dispatch(&principal("USER"), OperatorCommand::Stop).await;
        assert_eq!(reply, "Cannot stop server");
    }

    #[tokio::test]
    async fn status_reply_includes_address_when_running() {
        let ops = operations(
            StaticInstanceApi::with_state("running").address("203.0.113.5"),
            StaticProbe::replying(ApplicationStatus {
                online: true,
                players: Players {
                    online: 3,
                    max: 20,
                    list: Vec::new(),
                },
                ..ApplicationStatus::offline("https://status.example/icon/203.0.113.5:25565")
            }),
            Arc::new(RecordingConsole::new()),
        );

        let reply = ops.dispatch(&principal("NONE"), OperatorCommand::Status).await;
        assert_eq!(
            reply,
            "Server state is RUNNING. Server address is `203.0.113.5:25565`. 3/20 players online"
        );
    }

    #[tokio::test]
    async fn status_reply_without_address() {
        let ops = operations(
            StaticInstanceApi::with_state("stopped"),
            StaticProbe::failing(),
            Arc::new(RecordingConsole::new()),
        );

        let reply = ops.dispatch(&principal("NONE"), OperatorCommand::Status).await;
        assert_eq!(
            reply,
            "Server state is STOPPED. Server address is not available"
        );
    }

    #[tokio::test]
    async fn status_survives_probe_failure() {
        let ops = operations(
            StaticInstanceApi::with_state("running").address("203.0.113.5"),
            StaticProbe::failing(),
            Arc::new(RecordingConsole::new()),
        );

        let status = ops.server_status().await.unwrap();
        let application = status.application.unwrap();
        assert!(!application.online);
        assert_eq!(application.players.online, 0);
    }

    #[tokio::test]
    async fn execute_denied_for_non_owner_without_console_contact() {
        let console = Arc::new(RecordingConsole::new());
        let ops = operations(
            StaticInstanceApi::with_state("running"),
            StaticProbe::failing(),
            Arc::clone(&console),
        );

        let reply = ops
            .dispatch(
                &principal("NONE"),
                OperatorCommand::Execute {
                    command: "op griefer".to_string(),
                },
            )
            .await;

        assert_eq!(reply, "you do not have permission to perform this action");
        assert!(console.sent().is_empty());
    }

    #[tokio::test]
    async fn execute_relays_console_output_to_owner() {
        let console = Arc::new(RecordingConsole::replying(vec![
            "There are 3 of a max of 20 players online".to_string(),
        ]));
        let ops = operations(
            StaticInstanceApi::with_state("running"),
            StaticProbe::failing(),
            Arc::clone(&console),
        );

        let reply = ops
            .dispatch(
                &principal("OWNER"),
                OperatorCommand::Execute {
                    command: "list".to_string(),
                },
            )
            .await;

        assert_eq!(reply, "There are 3 of a max of 20 players online");
        assert_eq!(console.sent(), vec!["list"]);
    }

    #[tokio::test]
    async fn execute_with_empty_output_acknowledges() {
        let ops = operations(
            StaticInstanceApi::with_state("running"),
            StaticProbe::failing(),
            Arc::new(RecordingConsole::new()),
        );

        let reply = ops
            .dispatch(
                &principal("OWNER"),
                OperatorCommand::Execute {
                    command: "save-all".to_string(),
                },
            )
            .await;
        assert_eq!(reply, "Command sent");
    }

    #[test]
    fn intent_parsing() {
        assert_eq!(OperatorCommand::parse("start", None), Some(OperatorCommand::Start));
        assert_eq!(OperatorCommand::parse("stop", None), Some(OperatorCommand::Stop));
        assert_eq!(
            OperatorCommand::parse("status", None),
            Some(OperatorCommand::Status)
        );
        assert_eq!(
            OperatorCommand::parse("execute", Some("list")),
            Some(OperatorCommand::Execute {
                command: "list".to_string()
            })
        );
        assert_eq!(OperatorCommand::parse("restart", None), None);
    }

    #[tokio::test]
    async fn gate_requires_exactly_owner() {
        let gate = RoleGate::new();
        assert!(gate.has_role_or_higher(Role::Owner, &principal("OWNER")));
        assert!(!gate.has_role_or_higher(Role::Owner, &principal("ADMIN")));
    }
}
