//! Sidecar-facing seam for resolving which broker backs a channel.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::control_plane::TopologyStore;
use crate::error::{Result, TopologyError};
use crate::observability::{events, fields};

const COMPONENT: &str = "broker_resolution";

/// Resolves the broker a sidecar should use for a declared channel.
#[async_trait]
pub trait BrokerResolution: Send + Sync {
    /// Broker selected for channel `channel` owned by the App at `scope`.
    ///
    /// `NotFound` means the channel is not declared and the send must be rejected.
    async fn resolve_broker(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        channel: &str,
    ) -> Result<String>;
}

#[async_trait]
impl BrokerResolution for TopologyStore {
    async fn resolve_broker(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        channel: &str,
    ) -> Result<String> {
        let declared = match self.channels().get(cancel, scope, channel).await {
            Ok(declared) => declared,
            Err(err) => {
                warn!(
                    event = events::BROKER_RESOLVE_FAILED,
                    component = COMPONENT,
                    scope = fields::format_scope(scope),
                    name = channel,
                    err = %err,
                    "channel lookup failed"
                );
                return Err(err);
            }
        };

        if declared.spec.selected_broker.is_empty() {
            warn!(
                event = events::BROKER_RESOLVE_FAILED,
                component = COMPONENT,
                scope = fields::format_scope(scope),
                name = channel,
                "channel has no selected broker"
            );
            return Err(TopologyError::BadRequest(format!(
                "channel '{}' has no selected broker",
                declared.meta.reference
            )));
        }
        Ok(declared.spec.selected_broker)
    }
}
