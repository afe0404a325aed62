//! Inbound event types consumed by the alerting pipeline.

use serde::{Deserialize, Serialize};

use crate::group::MetricGroupCode;
use crate::ids::{OriginId, ParentId};
use crate::value::MetricValue;

/// The identity of a monitored entity as carried on every inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCtx {
    /// The specific monitored entity.
    pub origin_id: OriginId,
    /// The chain (or other grouping) the entity belongs to.
    pub parent_id: ParentId,
    /// Human-readable name used in rendered alert messages.
    pub entity_name: String,
}

/// One observation of one metric group for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEvent {
    /// The specific monitored entity.
    pub origin_id: OriginId,
    /// The chain the entity belongs to.
    pub parent_id: ParentId,
    /// Human-readable name used in rendered alert messages.
    pub entity_name: String,
    /// The metric group the observation belongs to.
    pub metric_group: MetricGroupCode,
    /// The observed value; its kind must match the group's declared kind.
    pub value: MetricValue,
    /// Unix seconds at which the observation was taken.
    pub observed_at: i64,
}

impl MetricEvent {
    /// Returns the entity identity carried by this event.
    #[must_use]
    pub fn ctx(&self) -> EntityCtx {
        EntityCtx {
            origin_id: self.origin_id.clone(),
            parent_id: self.parent_id.clone(),
            entity_name: self.entity_name.clone(),
        }
    }
}

/// What happened to the monitor feeding an entity's observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleKind {
    /// A monitor began (or resumed) observing the entity.
    Started,
    /// A monitor stopped observing the entity.
    Stopped,
}

impl LifecycleKind {
    /// Returns the kind as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monitor lifecycle transition for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Whether the monitor started or stopped.
    pub kind: LifecycleKind,
    /// The specific monitored entity.
    pub origin_id: OriginId,
    /// The chain the entity belongs to.
    pub parent_id: ParentId,
    /// Human-readable name used in rendered alert messages.
    pub entity_name: String,
    /// Unix seconds at which the transition happened.
    pub timestamp: i64,
}

impl LifecycleEvent {
    /// Returns the entity identity carried by this event.
    #[must_use]
    pub fn ctx(&self) -> EntityCtx {
        EntityCtx {
            origin_id: self.origin_id.clone(),
            parent_id: self.parent_id.clone(),
            entity_name: self.entity_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(id: &str) -> OriginId {
        OriginId::new(id).unwrap()
    }

    fn parent(id: &str) -> ParentId {
        ParentId::new(id).unwrap()
    }

    #[test]
    fn metric_event_serde_roundtrip() {
        let event = MetricEvent {
            origin_id: origin("node-7"),
            parent_id: parent("chain-cosmos"),
            entity_name: "cosmos validator 7".to_string(),
            metric_group: MetricGroupCode::SystemCpuUsage,
            value: MetricValue::Float(42.5),
            observed_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: MetricEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn metric_event_deserializes_integer_values_as_int() {
        let json = r#"{
            "origin_id": "node-7",
            "parent_id": "chain-cosmos",
            "entity_name": "cosmos validator 7",
            "metric_group": "peer_count",
            "value": 4,
            "observed_at": 1700000000
        }"#;
        let event: MetricEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.value, MetricValue::Int(4));
    }

    #[test]
    fn ctx_carries_entity_identity() {
        let event = LifecycleEvent {
            kind: LifecycleKind::Started,
            origin_id: origin("node-7"),
            parent_id: parent("chain-cosmos"),
            entity_name: "cosmos validator 7".to_string(),
            timestamp: 1_700_000_000,
        };
        let ctx = event.ctx();
        assert_eq!(ctx.origin_id.as_str(), "node-7");
        assert_eq!(ctx.parent_id.as_str(), "chain-cosmos");
        assert_eq!(ctx.entity_name, "cosmos validator 7");
    }

    #[test]
    fn lifecycle_kind_wire_strings() {
        assert_eq!(LifecycleKind::Started.as_str(), "started");
        assert_eq!(LifecycleKind::Stopped.to_string(), "stopped");
        let json = serde_json::to_string(&LifecycleKind::Started).unwrap();
        assert_eq!(json, "\"started\"");
    }
}
