//! The alert record emitted by the evaluation pipeline.

use serde::{Deserialize, Serialize};

use crate::code::AlertCode;
use crate::event::EntityCtx;
use crate::group::MetricGroupCode;
use crate::ids::{OriginId, ParentId};
use crate::severity::Severity;
use crate::value::MetricValue;

/// An immutable alert event.
///
/// Alerts are created by rule evaluation (or monitor lifecycle handling),
/// routed, and persisted; they are never mutated afterwards. There is no
/// synthetic alert id: `(origin_id, metric_group_code, timestamp)` already
/// identifies an alert, since one entity produces at most one alert per
/// metric group per observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Which alert this is.
    pub alert_code: AlertCode,
    /// Rendered operator-facing message.
    pub message: String,
    /// Severity at emission time, decided by the ladder configuration.
    pub severity: Severity,
    /// Unix seconds; the ordering source of truth for this alert.
    pub timestamp: i64,
    /// The chain the originating entity belongs to.
    pub parent_id: ParentId,
    /// The specific monitored entity the alert is about.
    pub origin_id: OriginId,
    /// The metric group the alert belongs to.
    pub metric_group_code: MetricGroupCode,
    /// Values substituted into the message template, kept raw for
    /// downstream consumers and test comparison.
    pub metric_state_args: Vec<MetricValue>,
}

impl Alert {
    /// Creates an alert, rendering its message from the code's template.
    #[must_use]
    pub fn new(
        alert_code: AlertCode,
        severity: Severity,
        ctx: &EntityCtx,
        metric_group_code: MetricGroupCode,
        metric_state_args: Vec<MetricValue>,
        timestamp: i64,
    ) -> Self {
        let message = alert_code.render_message(&ctx.entity_name, &metric_state_args);
        Self {
            alert_code,
            message,
            severity,
            timestamp,
            parent_id: ctx.parent_id.clone(),
            origin_id: ctx.origin_id.clone(),
            metric_group_code,
            metric_state_args,
        }
    }

    /// Returns true for control-plane lifecycle alerts, which bypass mutes
    /// and channel severity preferences.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.severity.is_internal()
    }
}
