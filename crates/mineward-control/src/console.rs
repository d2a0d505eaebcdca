//! The remote console channel for forwarding game-server commands.
//!
//! The channel is an opaque "send text, eventually get back output lines"
//! capability. Delivery may be queued, so an empty output list is a
//! legitimate response, not an error.

use std::time::Duration;

use async_trait::async_trait;
use mineward_core::InstanceId;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};

/// Trait for the remote console capability.
#[async_trait]
pub trait ConsoleChannel: Send + Sync {
    /// Forward `text` verbatim to the instance's console and collect the
    /// output lines it produced.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    async fn send(&self, instance_id: &InstanceId, text: &str) -> Result<Vec<String>>;
}

/// HTTP client for the console relay service.
#[derive(Debug, Clone)]
pub struct HttpConsoleClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConsoleClient {
    /// Create a new console client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create a new console client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the base URL of the console relay.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for a console send.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    command: &'a str,
}

/// Response body from a console send.
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    lines: Vec<String>,
}

#[async_trait]
impl ConsoleChannel for HttpConsoleClient {
    async fn send(&self, instance_id: &InstanceId, text: &str) -> Result<Vec<String>> {
        let url = format!("{}/v1/instances/{}/console", self.base_url, instance_id);

        let response = self
            .client
            .post(&url)
            .json(&SendRequest { command: text })
            .send()
            .await
            .map_err(|e| ControlError::Console(format!("send failed: {e}")))?;

        if response.status().is_success() {
            let body: SendResponse = response
                .json()
                .await
                .map_err(|e| ControlError::Console(format!("failed to parse response: {e}")))?;

            tracing::debug!(
                instance_id = %instance_id,
                lines = body.lines.len(),
                "Console command delivered"
            );
            Ok(body.lines)
        } else {
            let status = response.status();
            Err(ControlError::Console(format!(
                "console relay returned status {status}"
            )))
        }
    }
}

/// An in-memory console fake for tests.
///
/// Records every command it is asked to deliver and replies with a
/// configured set of output lines.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingConsole {
    sent: std::sync::Mutex<Vec<String>>,
    reply: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingConsole {
    /// Create a console that replies with no output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console that replies with the given lines.
    #[must_use]
    pub fn replying(lines: Vec<String>) -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            reply: std::sync::Mutex::new(lines),
        }
    }

    /// Commands delivered so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl ConsoleChannel for RecordingConsole {
    async fn send(&self, _instance_id: &InstanceId, text: &str) -> Result<Vec<String>> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(self.reply.lock().unwrap().clone())
    }
}
