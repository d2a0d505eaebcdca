//! The status aggregator: infrastructure state plus application liveness.
//!
//! Composes the controller's connection snapshot with the external liveness
//! probe. The probe is best-effort; its failure degrades the snapshot
//! instead of failing the query.

use std::sync::Arc;

use chrono::Utc;

use crate::controller::InstanceController;
use crate::error::Result;
use crate::probe::StatusProbe;
use crate::provider::InstanceApi;
use crate::state::LifecycleState;
use crate::types::{ApplicationStatus, ServerStatus};

/// Produces unified status snapshots for the managed server.
pub struct StatusService<P: InstanceApi, B: StatusProbe> {
    controller: Arc<InstanceController<P>>,
    probe: Arc<B>,
}

impl<P: InstanceApi, B: StatusProbe> StatusService<P, B> {
    /// Create a status service over the given controller and probe.
    #[must_use]
    pub fn new(controller: Arc<InstanceController<P>>, probe: Arc<B>) -> Self {
        Self { controller, probe }
    }

    /// Take a unified status snapshot.
    ///
    /// The application status is present only when the instance is running
    /// with an allocated endpoint. A probe failure of any kind (timeout,
    /// non-success response, malformed document) is absorbed into the
    /// offline placeholder; this method never fails because of the probe.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying connection query fails.
    pub async fn status(&self) -> Result<ServerStatus> {
        let connection = self.controller.connection().await?;

        let application = match (connection.state, &connection.endpoint) {
            (LifecycleState::Running, Some(endpoint)) => {
                Some(match self.probe.probe(endpoint).await {
                    Ok(status) => status,
                    Err(err) => {
                        tracing::warn!(
                            endpoint = %endpoint,
                            error = %err,
                            "Liveness probe failed; reporting offline placeholder"
                        );
                        ApplicationStatus::offline(self.probe.icon_url(endpoint))
                    }
                })
            }
            _ => None,
        };

        Ok(ServerStatus {
            connection,
            application,
            checked_at: Utc::now(),
        })
    }
}
