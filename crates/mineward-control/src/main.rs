//! Mineward control service - managed game server control.
//!
//! This is the main entry point for the control service. It wires the
//! provider, probe, and console clients into the operator use cases and
//! serves a small internal HTTP API. The chat-platform webhook transport in
//! front of it owns signature verification and message rendering.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mineward_auth::{IdentityDirectory, RoleGate};
use mineward_control::{
    CommandExecutor, ConsoleChannel, ControlConfig, HttpConsoleClient, HttpInstanceClient,
    InstanceApi, InstanceController, McsrvstatProbe, OperatorCommand, Operations, StatusProbe,
    StatusService,
};

/// Application state shared across handlers.
struct AppState<P: InstanceApi, B: StatusProbe, C: ConsoleChannel> {
    ops: Arc<Operations<P, B, C>>,
    directory: Arc<IdentityDirectory>,
}

impl<P: InstanceApi, B: StatusProbe, C: ConsoleChannel> Clone for AppState<P, B, C> {
    fn clone(&self) -> Self {
        Self {
            ops: Arc::clone(&self.ops),
            directory: Arc::clone(&self.directory),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "mineward-control",
    })
}

async fn ready_handler<P, B, C>(State(_state): State<AppState<P, B, C>>) -> impl IntoResponse
where
    P: InstanceApi + 'static,
    B: StatusProbe + 'static,
    C: ConsoleChannel + 'static,
{
    (StatusCode::OK, "ready")
}

/// An operator command as delivered by the transport in front of us.
#[derive(Deserialize)]
struct CommandRequest {
    /// Platform identity of the caller.
    actor: String,
    /// Intent name: start, stop, status, or execute.
    command: String,
    /// Argument for intents that take one.
    #[serde(default)]
    argument: Option<String>,
}

#[derive(Serialize)]
struct CommandResponse {
    reply: String,
}

async fn command_handler<P, B, C>(
    State(state): State<AppState<P, B, C>>,
    Json(request): Json<CommandRequest>,
) -> impl IntoResponse
where
    P: InstanceApi + 'static,
    B: StatusProbe + 'static,
    C: ConsoleChannel + 'static,
{
    let Some(command) = OperatorCommand::parse(&request.command, request.argument.as_deref())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(CommandResponse {
                reply: "Unknown command".to_string(),
            }),
        );
    };

    tracing::info!(actor = %request.actor, command = %request.command, "Received operator command");

    let principal = state.directory.principal_for(&request.actor);
    let reply = state.ops.dispatch(&principal, command).await;

    (StatusCode::OK, Json(CommandResponse { reply }))
}

fn create_router<P, B, C>(state: AppState<P, B, C>) -> Router
where
    P: InstanceApi + 'static,
    B: StatusProbe + 'static,
    C: ConsoleChannel + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler::<P, B, C>))
        .route("/v1/commands", post(command_handler::<P, B, C>))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mineward=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mineward control service");

    let listen_addr =
        std::env::var("MINEWARD_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let config = ControlConfig::from_env()?;

    // One HTTP client with the configured timeouts, shared by the provider
    // and console clients. The probe keeps its own shorter timeout.
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .build()?;

    let provider = Arc::new(HttpInstanceClient::with_client(
        http.clone(),
        config.provider_url.clone(),
    ));
    let console = Arc::new(HttpConsoleClient::with_client(
        http,
        config.console_url.clone(),
    ));
    let probe = Arc::new(McsrvstatProbe::with_base_url(config.probe_url.clone()));

    let controller = Arc::new(InstanceController::new(
        provider,
        config.instance_id.clone(),
        config.game_port,
    ));
    let status = StatusService::new(Arc::clone(&controller), probe);
    let executor = CommandExecutor::new(RoleGate::new(), console, config.instance_id.clone());
    let ops = Arc::new(Operations::new(controller, status, executor));

    tracing::info!(
        instance_id = %config.instance_id,
        operators = config.operator_roles.len(),
        "Managing instance"
    );

    let state = AppState {
        ops,
        directory: Arc::new(config.operator_roles),
    };
    let app = create_router(state);

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
