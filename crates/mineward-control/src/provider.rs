//! HTTP client for the compute provider's instance control API.
//!
//! This module provides the [`InstanceApi`] seam the lifecycle controller
//! depends on, plus the [`HttpInstanceClient`] implementation against the
//! provider's REST surface. The controller only ever sees raw state labels;
//! normalization happens in [`crate::state`].

use std::time::Duration;

use async_trait::async_trait;
use mineward_core::InstanceId;
use serde::Deserialize;

use crate::error::{ControlError, Result};

/// Trait for the provider's instance control capability.
///
/// This trait abstracts the four provider operations the system depends on,
/// allowing substitution with a fake in tests.
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// Query the instance's current state label.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the provider rejects it.
    /// Callers doing advisory reads absorb this into an unknown state.
    async fn describe_state(&self, instance_id: &InstanceId) -> Result<String>;

    /// Issue a start and return the state label from the provider's
    /// immediate response.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn start(&self, instance_id: &InstanceId) -> Result<String>;

    /// Issue a stop and return the state label from the provider's
    /// immediate response.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn stop(&self, instance_id: &InstanceId) -> Result<String>;

    /// Look up the instance's public address.
    ///
    /// Returns `None` while no address is allocated, which is a valid
    /// transient condition shortly after start.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn public_address(&self, instance_id: &InstanceId) -> Result<Option<String>>;
}

/// HTTP client for the provider's instance control REST API.
#[derive(Debug, Clone)]
pub struct HttpInstanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInstanceClient {
    /// Create a new provider client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the provider API (e.g., "http://provider:8081")
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

    /// Create a new provider client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the base URL of the provider API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn decode_state(response: reqwest::Response) -> Result<String> {
        if response.status().is_success() {
            let body: StateResponse = response
                .json()
                .await
                .map_err(|e| ControlError::Provider(format!("failed to parse response: {e}")))?;
            Ok(body.state)
        } else {
            Err(Self::decode_error(response).await)
        }
    }

    async fn decode_error(response: reqwest::Response) -> ControlError {
        let status = response.status();
        let error = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("provider returned status {status}"));

        ControlError::Provider(error)
    }
}

/// State payload returned by the provider's query, start, and stop routes.
#[derive(Debug, Deserialize)]
struct StateResponse {
    state: String,
}

/// Address payload returned by the provider's address route.
#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: Option<String>,
}

/// Error response from the provider.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    #[allow(dead_code)]
    code: u16,
}

#[async_trait]
impl InstanceApi for HttpInstanceClient {
    async fn describe_state(&self, instance_id: &InstanceId) -> Result<String> {
        let url = format!("{}/v1/instances/{}/state", self.base_url, instance_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ControlError::Provider(format!("state query failed: {e}")))?;

        Self::decode_state(response).await
    }

    async fn start(&self, instance_id: &InstanceId) -> Result<String> {
        let url = format!("{}/v1/instances/{}/start", self.base_url, instance_id);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ControlError::Provider(format!("start request failed: {e}")))?;

        tracing::debug!(instance_id = %instance_id, "Issued provider start");
        Self::decode_state(response).await
    }

    async fn stop(&self, instance_id: &InstanceId) -> Result<String> {
        let url = format!("{}/v1/instances/{}/stop", self.base_url, instance_id);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ControlError::Provider(format!("stop request failed: {e}")))?;

        tracing::debug!(instance_id = %instance_id, "Issued provider stop");
        Self::decode_state(response).await
    }

    async fn public_address(&self, instance_id: &InstanceId) -> Result<Option<String>> {
        let url = format!("{}/v1/instances/{}/address", self.base_url, instance_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ControlError::Provider(format!("address query failed: {e}")))?;

        if response.status().is_success() {
            let body: AddressResponse = response
                .json()
                .await
                .map_err(|e| ControlError::Provider(format!("failed to parse response: {e}")))?;
            Ok(body.address)
        } else {
            Err(Self::decode_error(response).await)
        }
    }
}

/// An in-memory provider fake for tests.
///
/// Holds a single mutable state label and records how many start/stop calls
/// were issued, so tests can assert that rejected transitions stay
/// side-effect-free.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct StaticInstanceApi {
    state: std::sync::Mutex<String>,
    address: std::sync::Mutex<Option<String>>,
    describe_fails: std::sync::atomic::AtomicBool,
    start_calls: std::sync::atomic::AtomicUsize,
    stop_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticInstanceApi {
    /// Create a fake reporting the given state label.
    #[must_use]
    pub fn with_state(label: impl Into<String>) -> Self {
        Self {
            state: std::sync::Mutex::new(label.into()),
            address: std::sync::Mutex::new(None),
            describe_fails: std::sync::atomic::AtomicBool::new(false),
            start_calls: std::sync::atomic::AtomicUsize::new(0),
            stop_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Set the allocated public address.
    #[must_use]
    pub fn address(self, address: impl Into<String>) -> Self {
        *self.address.lock().unwrap() = Some(address.into());
        self
    }

    /// Make every subsequent state query fail, simulating provider outage.
    pub fn fail_describe(&self) {
        self.describe_fails
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of start calls issued.
    pub fn start_calls(&self) -> usize {
        self.start_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Number of stop calls issued.
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl InstanceApi for StaticInstanceApi {
    async fn describe_state(&self, _instance_id: &InstanceId) -> Result<String> {
        if self.describe_fails.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ControlError::Provider(
                "simulated provider outage".to_string(),
            ));
        }
        Ok(self.state.lock().unwrap().clone())
    }

    async fn start(&self, _instance_id: &InstanceId) -> Result<String> {
        self.start_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.state.lock().unwrap() = "pending".to_string();
        Ok("pending".to_string())
    }

    async fn stop(&self, _instance_id: &InstanceId) -> Result<String> {
        self.stop_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.state.lock().unwrap() = "stopping".to_string();
        Ok("stopping".to_string())
    }

    async fn public_address(&self, _instance_id: &InstanceId) -> Result<Option<String>> {
        Ok(self.address.lock().unwrap().clone())
    }
}
