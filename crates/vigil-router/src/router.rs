//! The alert router.
//!
//! Takes a finished [`Alert`] and decides where it goes: which channels it
//! fans out to and whether it is persisted. Persistence is unconditional;
//! mutes and channel preferences only shape delivery. The router owns no
//! transport and never blocks on one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vigil_config::AlertsConfigRegistry;
use vigil_model::{Alert, ChannelId};

use crate::channels::ChannelRegistry;
use crate::error::RoutingError;
use crate::mute::MuteStore;

/// Where one alert goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Channels the alert fans out to; empty when delivery is muted.
    pub deliver_to: BTreeSet<ChannelId>,
    /// Whether the alert is recorded. Always true: muted alerts are still
    /// part of the audit trail.
    pub persist: bool,
}

/// Routes alerts against the mute state and channel registry.
///
/// Cloning shares the underlying stores, so one router can run on every
/// worker.
#[derive(Debug, Clone)]
pub struct AlertRouter {
    registry: AlertsConfigRegistry,
    mutes: MuteStore,
    channels: ChannelRegistry,
}

impl AlertRouter {
    /// Creates a router over the given configuration, mute, and channel
    /// stores.
    #[must_use]
    pub fn new(registry: AlertsConfigRegistry, mutes: MuteStore, channels: ChannelRegistry) -> Self {
        Self {
            registry,
            mutes,
            channels,
        }
    }

    /// Resolves the chain name the alert's parent id belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::UnresolvableChain`] when no chain of the
    /// alert's kind is registered for the parent id. Routing itself treats
    /// this as non-fatal; the error exists for diagnostics.
    pub fn resolve_chain(&self, alert: &Alert) -> Result<String, RoutingError> {
        let kind = alert.metric_group_code.kind();
        self.registry
            .chain_name_for(&alert.parent_id, kind)
            .ok_or_else(|| RoutingError::UnresolvableChain {
                parent_id: alert.parent_id.as_str().to_string(),
                kind,
            })
    }

    /// Decides delivery and persistence for one alert.
    ///
    /// An alert whose parent id resolves to no chain is routed against the
    /// global mute scope only.
    #[must_use]
    pub fn route(&self, alert: &Alert, now: i64) -> RoutingDecision {
        let muted = if alert.is_internal() {
            // Control-plane lifecycle alerts bypass every mute scope.
            false
        } else {
            let parent = self.resolve_chain(alert).ok().map(|_| &alert.parent_id);
            self.mutes.is_muted(parent, alert.severity, now)
        };

        let deliver_to: BTreeSet<ChannelId> = if muted {
            BTreeSet::new()
        } else {
            self.channels
                .all()
                .into_iter()
                .filter(|channel| channel.accepts_severity(alert.severity))
                .filter(|channel| channel.covers_chain(&alert.parent_id))
                .map(|channel| channel.id)
                .collect()
        };

        debug!(
            code = %alert.alert_code,
            severity = %alert.severity,
            parent = %alert.parent_id,
            muted,
            channels = deliver_to.len(),
            "routing decision"
        );
        RoutingDecision {
            deliver_to,
            persist: true,
        }
    }
}
