//! The lifecycle controller for the single managed instance.
//!
//! The controller owns the instance identifier and is the sole issuer of
//! lifecycle-changing provider calls. It holds no state of its own: every
//! query re-derives truth from the provider, so snapshots can never go
//! stale.

use std::sync::Arc;

use mineward_core::{Endpoint, InstanceId};

use crate::error::{ControlError, Result};
use crate::provider::InstanceApi;
use crate::state::{self, LifecycleState, TransitionAction};
use crate::types::Connection;

/// Controls the lifecycle of the managed compute instance.
///
/// Start and stop are guarded by a precondition check against the current
/// provider state. The check reads and then acts without atomicity against
/// the provider, so two racing invocations can both pass it; the provider
/// remains the serialization point for conflicting operations. The check
/// exists to catch operator error, not to be a lock.
pub struct InstanceController<P: InstanceApi> {
    provider: Arc<P>,
    instance_id: InstanceId,
    game_port: u16,
}

impl<P: InstanceApi> InstanceController<P> {
    /// Create a controller for the given instance.
    #[must_use]
    pub fn new(provider: Arc<P>, instance_id: InstanceId, game_port: u16) -> Self {
        Self {
            provider,
            instance_id,
            game_port,
        }
    }

    /// The identifier of the managed instance.
    #[must_use]
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Query the instance's current lifecycle state.
    ///
    /// State reads are advisory and must stay available while the provider
    /// API is degraded, so any query failure is absorbed into
    /// [`LifecycleState::Unknown`] rather than raised.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnmappedProviderState`] if the provider
    /// answers with a label outside the known vocabulary. That is a contract
    /// break, not transience, and does propagate.
    pub async fn state(&self) -> Result<LifecycleState> {
        match self.provider.describe_state(&self.instance_id).await {
            Ok(label) => state::map_state(&label),
            Err(err) => {
                tracing::warn!(
                    instance_id = %self.instance_id,
                    error = %err,
                    "State query failed; reporting UNKNOWN"
                );
                Ok(LifecycleState::Unknown)
            }
        }
    }

    /// Start the instance.
    ///
    /// Returns the state from the provider's immediate response, normally
    /// `PENDING` or `RUNNING`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] without issuing any
    /// provider call unless the current state is `STOPPED`. Provider
    /// failures after the precondition passes propagate: the caller asked
    /// for this operation and needs to know it failed.
    pub async fn start(&self) -> Result<LifecycleState> {
        let observed = self.state().await?;
        if !observed.may_start() {
            return Err(ControlError::InvalidTransition {
                action: TransitionAction::Start,
                observed,
            });
        }

        let label = self.provider.start(&self.instance_id).await?;
        let resulting = state::map_state(&label)?;

        tracing::info!(
            instance_id = %self.instance_id,
            state = %resulting,
            "Instance start issued"
        );
        Ok(resulting)
    }

    /// Stop the instance.
    ///
    /// Returns the state from the provider's immediate response, normally
    /// `STOPPING`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidTransition`] without issuing any
    /// provider call unless the current state is `RUNNING`.
    pub async fn stop(&self) -> Result<LifecycleState> {
        let observed = self.state().await?;
        if !observed.may_stop() {
            return Err(ControlError::InvalidTransition {
                action: TransitionAction::Stop,
                observed,
            });
        }

        let label = self.provider.stop(&self.instance_id).await?;
        let resulting = state::map_state(&label)?;

        tracing::info!(
            instance_id = %self.instance_id,
            state = %resulting,
            "Instance stop issued"
        );
        Ok(resulting)
    }

    /// Query the player-facing connection snapshot.
    ///
    /// The endpoint is present only when the instance is `RUNNING` and the
    /// provider has allocated an address. A running instance with no address
    /// yet is a valid transient condition and yields an absent endpoint.
    /// Built fresh on every call; never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the address lookup fails, or if the state read
    /// surfaces an unmapped label.
    pub async fn connection(&self) -> Result<Connection> {
        let state = self.state().await?;
        if state != LifecycleState::Running {
            return Ok(Connection::unreachable(state));
        }

        let address = self.provider.public_address(&self.instance_id).await?;
        let endpoint = match address.filter(|a| !a.is_empty()) {
            Some(host) => Some(Endpoint::new(host, self.game_port).map_err(|e| {
                ControlError::Provider(format!("provider returned an unusable address: {e}"))
            })?),
            None => None,
        };

        Ok(Connection { endpoint, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticInstanceApi;

    fn controller(provider: StaticInstanceApi) -> InstanceController<StaticInstanceApi> {
        InstanceController::new(
            Arc::new(provider),
            InstanceId::new("i-0123456789abcdef0").unwrap(),
            25565,
        )
    }

    #[tokio::test]
    async fn state_maps_provider_label() {
        let controller = controller(StaticInstanceApi::with_state("running"));
        assert_eq!(controller.state().await.unwrap(), LifecycleState::Running);
    }

    #[tokio::test]
    async fn failed_state_query_reports_unknown() {
        let provider = StaticInstanceApi::with_state("running");
        provider.fail_describe();
        let controller = controller(provider);
        assert_eq!(controller.state().await.unwrap(), LifecycleState::Unknown);
    }

    #[tokio::test]
    async fn unmapped_label_propagates_from_state() {
        let controller = controller(StaticInstanceApi::with_state("limbo"));
        let err = controller.state().await.unwrap_err();
        assert!(matches!(err, ControlError::UnmappedProviderState(_)));
    }

    #[tokio::test]
    async fn start_from_stopped_succeeds() {
        let controller = controller(StaticInstanceApi::with_state("stopped"));
        let state = controller.start().await.unwrap();
        assert!(matches!(
            state,
            LifecycleState::Pending | LifecycleState::Running
        ));
    }

    #[tokio::test]
    async fn start_rejection_is_side_effect_free() {
        for label in ["pending", "running", "stopping", "shutting-down", "terminated"] {
            let provider = Arc::new(StaticInstanceApi::with_state(label));
            let controller = InstanceController::new(
                Arc::clone(&provider),
                InstanceId::new("i-0123456789abcdef0").unwrap(),
                25565,
            );

            let err = controller.start().await.unwrap_err();
            assert!(matches!(err, ControlError::InvalidTransition { .. }));
            assert_eq!(provider.start_calls(), 0, "start issued from {label}");
        }
    }

    #[tokio::test]
    async fn stop_rejection_is_side_effect_free() {
        let provider = Arc::new(StaticInstanceApi::with_state("stopped"));
        let controller = InstanceController::new(
            Arc::clone(&provider),
            InstanceId::new("i-0123456789abcdef0").unwrap(),
            25565,
        );

        let err = controller.stop().await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::InvalidTransition {
                action: TransitionAction::Stop,
                observed: LifecycleState::Stopped,
            }
        ));
        assert_eq!(provider.stop_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_state_fails_both_preconditions() {
        let provider = StaticInstanceApi::with_state("stopped");
        provider.fail_describe();
        let controller = controller(provider);

        let err = controller.start().await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::InvalidTransition {
                observed: LifecycleState::Unknown,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn stop_from_running_succeeds() {
        let controller = controller(StaticInstanceApi::with_state("running"));
        assert_eq!(controller.stop().await.unwrap(), LifecycleState::Stopping);
    }

    #[tokio::test]
    async fn connection_omits_endpoint_when_not_running() {
        // Address data is allocated, but the state is not RUNNING.
        let provider = StaticInstanceApi::with_state("stopping").address("203.0.113.5");
        let controller = controller(provider);

        let connection = controller.connection().await.unwrap();
        assert_eq!(connection.state, LifecycleState::Stopping);
        assert!(connection.endpoint.is_none());
    }

    #[tokio::test]
    async fn connection_joins_address_and_game_port() {
        let provider = StaticInstanceApi::with_state("running").address("203.0.113.5");
        let controller = controller(provider);

        let connection = controller.connection().await.unwrap();
        assert_eq!(connection.state, LifecycleState::Running);
        assert_eq!(
            connection.endpoint.unwrap().to_string(),
            "203.0.113.5:25565"
        );
    }

    #[tokio::test]
    async fn running_without_address_keeps_endpoint_absent() {
        let controller = controller(StaticInstanceApi::with_state("running"));
        let connection = controller.connection().await.unwrap();
        assert_eq!(connection.state, LifecycleState::Running);
        assert!(connection.endpoint.is_none());
    }

    #[tokio::test]
    async fn start_then_start_again_is_rejected() {
        let provider = Arc::new(StaticInstanceApi::with_state("stopped"));
        let controller = InstanceController::new(
            Arc::clone(&provider),
            InstanceId::new("i-0123456789abcdef0").unwrap(),
            25565,
        );

        let state = controller.start().await.unwrap();
        assert!(matches!(
            state,
            LifecycleState::Pending | LifecycleState::Running
        ));

        let err = controller.start().await.unwrap_err();
        assert!(matches!(err, ControlError::InvalidTransition { .. }));
        assert_eq!(provider.start_calls(), 1);
    }
}
