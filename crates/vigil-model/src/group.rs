//! Metric groups: the deduplication/state key for families of alert codes.
//!
//! Every group is bound at compile time to the monitorable kind it belongs
//! to, the value type its observations must carry, the state machine that
//! evaluates it, and the alert codes it emits. The binding is one flat table
//! ([`MetricGroupCode::spec`]) instead of a class hierarchy resolved by
//! runtime introspection.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::code::AlertCode;
use crate::value::ValueKind;

/// The kind of monitored entity a metric group (or alert namespace) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorableKind {
    /// Host-level metrics (CPU, RAM, storage).
    System,
    /// Blockchain node metrics (height, peers, liveness).
    Node,
    /// Chain-level metrics aggregated across nodes.
    Network,
    /// On-chain contract metrics (oracle feeds).
    Contract,
    /// Source-repository metrics (GitHub/DockerHub access).
    Repository,
    /// Control-plane lifecycle; never carries operator configuration.
    Internal,
}

impl MonitorableKind {
    /// All monitorable kinds.
    pub const ALL: [Self; 6] = [
        Self::System,
        Self::Node,
        Self::Network,
        Self::Contract,
        Self::Repository,
        Self::Internal,
    ];

    /// Returns the kind as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Node => "node",
            Self::Network => "network",
            Self::Contract => "contract",
            Self::Repository => "repository",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for MonitorableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The comparison direction of a threshold-style metric group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The condition worsens as the value grows; crossing uses `>`.
    IncreaseAbove,
    /// The condition worsens as the value shrinks; crossing uses `<`.
    DecreaseBelow,
}

impl Direction {
    /// Returns the direction as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IncreaseAbove => "increase_above",
            Self::DecreaseBelow => "decrease_below",
        }
    }

    /// Parses a direction from its wire string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "increase_above" => Some(Self::IncreaseAbove),
            "decrease_below" => Some(Self::DecreaseBelow),
            _ => None,
        }
    }

    /// Evaluates whether `value` crosses `threshold` in this direction.
    #[must_use]
    pub fn crossed(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::IncreaseAbove => value > threshold,
            Self::DecreaseBelow => value < threshold,
        }
    }

    /// Returns true if `critical` is a strictly more severe crossing than
    /// `warning` in this direction.
    #[must_use]
    pub fn is_strictly_more_severe(self, critical: f64, warning: f64) -> bool {
        match self {
            Self::IncreaseAbove => critical > warning,
            Self::DecreaseBelow => critical < warning,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state machine a metric group is evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Machinery {
    /// Monotone threshold crossing over the raw value.
    Threshold,
    /// Threshold crossing that must hold continuously for a window.
    TimeWindow,
    /// Binary condition with a single configured severity.
    Boolean,
    /// Threshold crossing over elapsed downtime, fed by boolean observations.
    Downtime,
}

/// The compile-time binding of one metric group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSpec {
    /// The monitorable kind the group belongs to.
    pub kind: MonitorableKind,
    /// The value type observations must carry.
    pub value_kind: ValueKind,
    /// The state machine that evaluates the group.
    pub machinery: Machinery,
    /// Canonical comparison direction; `None` for boolean/lifecycle groups.
    pub direction: Option<Direction>,
    /// Code emitted on escalation (first crossing or level change upward).
    pub raise_code: AlertCode,
    /// Code emitted on periodic repeats of the held level.
    pub repeat_code: AlertCode,
    /// Code emitted on resolution, always at `Info`.
    pub resolve_code: AlertCode,
}

/// Identifies a logical metric family; the deduplication/state key.
///
/// Distinct from [`AlertCode`]: one group produces alerts of several codes
/// (crossed above vs. crossed below, went down vs. back up) that share one
/// state slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroupCode {
    /// Host CPU usage percentage.
    SystemCpuUsage,
    /// Host RAM usage percentage.
    SystemRamUsage,
    /// Host storage usage percentage.
    SystemStorageUsage,
    /// Open file descriptors as a percentage of the host limit.
    OpenFileDescriptors,
    /// Host reachability (downtime classification).
    SystemIsDown,
    /// Node reachability (downtime classification).
    NodeIsDown,
    /// Blocks behind the network head.
    BlockHeightDelta,
    /// Connected peer count.
    PeerCount,
    /// Chain data source reachability.
    DataSourceUnreachable,
    /// Oracle price-feed deviation percentage.
    PriceFeedDeviation,
    /// Oracle rounds missed by the observed feed.
    PriceFeedMissedObservations,
    /// Repository (GitHub/DockerHub) API accessibility.
    RepositoryAccessError,
    /// Monitor start/stop lifecycle; carries internal alerts only.
    EntityLifecycle,
}

impl MetricGroupCode {
    /// All metric groups.
    pub const ALL: [Self; 13] = [
        Self::SystemCpuUsage,
        Self::SystemRamUsage,
        Self::SystemStorageUsage,
        Self::OpenFileDescriptors,
        Self::SystemIsDown,
        Self::NodeIsDown,
        Self::BlockHeightDelta,
        Self::PeerCount,
        Self::DataSourceUnreachable,
        Self::PriceFeedDeviation,
        Self::PriceFeedMissedObservations,
        Self::RepositoryAccessError,
        Self::EntityLifecycle,
    ];

    /// Returns the group as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SystemCpuUsage => "system_cpu_usage",
            Self::SystemRamUsage => "system_ram_usage",
            Self::SystemStorageUsage => "system_storage_usage",
            Self::OpenFileDescriptors => "open_file_descriptors",
            Self::SystemIsDown => "system_is_down",
            Self::NodeIsDown => "node_is_down",
            Self::BlockHeightDelta => "block_height_delta",
            Self::PeerCount => "peer_count",
            Self::DataSourceUnreachable => "data_source_unreachable",
            Self::PriceFeedDeviation => "price_feed_deviation",
            Self::PriceFeedMissedObservations => "price_feed_missed_observations",
            Self::RepositoryAccessError => "repository_access_error",
            Self::EntityLifecycle => "entity_lifecycle",
        }
    }

    /// Resolves a group from its wire string.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        static BY_NAME: Lazy<HashMap<&'static str, MetricGroupCode>> = Lazy::new(|| {
            MetricGroupCode::ALL
                .into_iter()
                .map(|group| (group.as_str(), group))
                .collect()
        });
        BY_NAME.get(name).copied()
    }

    /// Returns the compile-time binding for this group.
    #[must_use]
    pub const fn spec(self) -> GroupSpec {
        use AlertCode as C;
        match self {
            Self::SystemCpuUsage => GroupSpec {
                kind: MonitorableKind::System,
                value_kind: ValueKind::Float,
                machinery: Machinery::Threshold,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::SystemCpuUsageIncreasedAboveThreshold,
                repeat_code: C::SystemCpuUsageIncreasedAboveThreshold,
                resolve_code: C::SystemCpuUsageDecreasedBelowThreshold,
            },
            Self::SystemRamUsage => GroupSpec {
                kind: MonitorableKind::System,
                value_kind: ValueKind::Float,
                machinery: Machinery::Threshold,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::SystemRamUsageIncreasedAboveThreshold,
                repeat_code: C::SystemRamUsageIncreasedAboveThreshold,
                resolve_code: C::SystemRamUsageDecreasedBelowThreshold,
            },
            Self::SystemStorageUsage => GroupSpec {
                kind: MonitorableKind::System,
                value_kind: ValueKind::Float,
                machinery: Machinery::Threshold,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::SystemStorageUsageIncreasedAboveThreshold,
                repeat_code: C::SystemStorageUsageIncreasedAboveThreshold,
                resolve_code: C::SystemStorageUsageDecreasedBelowThreshold,
            },
            Self::OpenFileDescriptors => GroupSpec {
                kind: MonitorableKind::System,
                value_kind: ValueKind::Float,
                machinery: Machinery::Threshold,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::OpenFileDescriptorsIncreasedAboveThreshold,
                repeat_code: C::OpenFileDescriptorsIncreasedAboveThreshold,
                resolve_code: C::OpenFileDescriptorsDecreasedBelowThreshold,
            },
            Self::SystemIsDown => GroupSpec {
                kind: MonitorableKind::System,
                value_kind: ValueKind::Bool,
                machinery: Machinery::Downtime,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::SystemWentDown,
                repeat_code: C::SystemStillDown,
                resolve_code: C::SystemBackUp,
            },
            Self::NodeIsDown => GroupSpec {
                kind: MonitorableKind::Node,
                value_kind: ValueKind::Bool,
                machinery: Machinery::Downtime,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::NodeWentDown,
                repeat_code: C::NodeStillDown,
                resolve_code: C::NodeBackUp,
            },
            Self::BlockHeightDelta => GroupSpec {
                kind: MonitorableKind::Node,
                value_kind: ValueKind::Int,
                machinery: Machinery::TimeWindow,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::BlockHeightDeltaIncreasedAboveThreshold,
                repeat_code: C::BlockHeightDeltaIncreasedAboveThreshold,
                resolve_code: C::BlockHeightDeltaDecreasedBelowThreshold,
            },
            Self::PeerCount => GroupSpec {
                kind: MonitorableKind::Node,
                value_kind: ValueKind::Int,
                machinery: Machinery::Threshold,
                direction: Some(Direction::DecreaseBelow),
                raise_code: C::PeerCountDecreasedBelowThreshold,
                repeat_code: C::PeerCountDecreasedBelowThreshold,
                resolve_code: C::PeerCountIncreasedAboveThreshold,
            },
            Self::DataSourceUnreachable => GroupSpec {
                kind: MonitorableKind::Network,
                value_kind: ValueKind::Bool,
                machinery: Machinery::Boolean,
                direction: None,
                raise_code: C::DataSourceUnreachable,
                repeat_code: C::DataSourceUnreachable,
                resolve_code: C::DataSourceReachableAgain,
            },
            Self::PriceFeedDeviation => GroupSpec {
                kind: MonitorableKind::Contract,
                value_kind: ValueKind::Float,
                machinery: Machinery::Threshold,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::PriceFeedDeviationIncreasedAboveThreshold,
                repeat_code: C::PriceFeedDeviationIncreasedAboveThreshold,
                resolve_code: C::PriceFeedDeviationDecreasedBelowThreshold,
            },
            Self::PriceFeedMissedObservations => GroupSpec {
                kind: MonitorableKind::Contract,
                value_kind: ValueKind::Int,
                machinery: Machinery::Threshold,
                direction: Some(Direction::IncreaseAbove),
                raise_code: C::PriceFeedMissedObservationsIncreasedAboveThreshold,
                repeat_code: C::PriceFeedMissedObservationsIncreasedAboveThreshold,
                resolve_code: C::PriceFeedMissedObservationsDecreasedBelowThreshold,
            },
            Self::RepositoryAccessError => GroupSpec {
                kind: MonitorableKind::Repository,
                value_kind: ValueKind::Bool,
                machinery: Machinery::Boolean,
                direction: None,
                raise_code: C::RepositoryInaccessible,
                repeat_code: C::RepositoryInaccessible,
                resolve_code: C::RepositoryAccessRestored,
            },
            Self::EntityLifecycle => GroupSpec {
                kind: MonitorableKind::Internal,
                value_kind: ValueKind::Bool,
                machinery: Machinery::Boolean,
                direction: None,
                raise_code: C::MonitoringStarted,
                repeat_code: C::MonitoringStarted,
                resolve_code: C::MonitoringStopped,
            },
        }
    }

    /// Returns the monitorable kind this group belongs to.
    #[must_use]
    pub const fn kind(self) -> MonitorableKind {
        self.spec().kind
    }

    /// Returns the value type observations for this group must carry.
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        self.spec().value_kind
    }

    /// Returns the state machine this group is evaluated with.
    #[must_use]
    pub const fn machinery(self) -> Machinery {
        self.spec().machinery
    }

    /// Returns the expected metric-group set for one monitorable kind,
    /// used to validate configuration batches.
    #[must_use]
    pub fn groups_for(kind: MonitorableKind) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|group| group.kind() == kind)
            .collect()
    }
}

impl std::fmt::Display for MetricGroupCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
