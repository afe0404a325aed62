//! Alert codes and their message templates.
//!
//! Every alert the platform can emit is declared here as one variant of a
//! flat enum, paired with a positional message template. Adding an alert is
//! one new variant plus one template row, not a new type.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::group::MonitorableKind;
use crate::value::MetricValue;

/// Uniquely identifies one alert message shape across the whole platform.
///
/// Codes are namespaced by [`MonitorableKind`] and stable on the wire; the
/// severity of an emitted alert is decided by the ladder configuration at
/// evaluation time, never by the code itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCode {
    /// System CPU usage crossed a configured threshold upward.
    SystemCpuUsageIncreasedAboveThreshold,
    /// System CPU usage dropped back below the previously crossed threshold.
    SystemCpuUsageDecreasedBelowThreshold,
    /// System RAM usage crossed a configured threshold upward.
    SystemRamUsageIncreasedAboveThreshold,
    /// System RAM usage dropped back below the previously crossed threshold.
    SystemRamUsageDecreasedBelowThreshold,
    /// System storage usage crossed a configured threshold upward.
    SystemStorageUsageIncreasedAboveThreshold,
    /// System storage usage dropped back below the previously crossed threshold.
    SystemStorageUsageDecreasedBelowThreshold,
    /// Open file descriptors crossed a configured threshold upward.
    OpenFileDescriptorsIncreasedAboveThreshold,
    /// Open file descriptors dropped back below the previously crossed threshold.
    OpenFileDescriptorsDecreasedBelowThreshold,
    /// A host became unreachable and stayed down past a ladder threshold.
    SystemWentDown,
    /// A host remains unreachable; emitted on the repeat cadence.
    SystemStillDown,
    /// A previously down host is reachable again.
    SystemBackUp,
    /// A node became unreachable and stayed down past a ladder threshold.
    NodeWentDown,
    /// A node remains unreachable; emitted on the repeat cadence.
    NodeStillDown,
    /// A previously down node is reachable again.
    NodeBackUp,
    /// A node fell behind the network head by more than the threshold.
    BlockHeightDeltaIncreasedAboveThreshold,
    /// A lagging node caught back up below the threshold.
    BlockHeightDeltaDecreasedBelowThreshold,
    /// Peer count dropped below a configured threshold.
    PeerCountDecreasedBelowThreshold,
    /// Peer count recovered above the previously crossed threshold.
    PeerCountIncreasedAboveThreshold,
    /// No data source for the chain could be reached.
    DataSourceUnreachable,
    /// A chain data source is reachable again.
    DataSourceReachableAgain,
    /// Price-feed deviation crossed a configured threshold upward.
    PriceFeedDeviationIncreasedAboveThreshold,
    /// Price-feed deviation dropped back below the threshold.
    PriceFeedDeviationDecreasedBelowThreshold,
    /// Missed price-feed rounds crossed a configured threshold upward.
    PriceFeedMissedObservationsIncreasedAboveThreshold,
    /// Missed price-feed rounds dropped back below the threshold.
    PriceFeedMissedObservationsDecreasedBelowThreshold,
    /// A watched repository could not be accessed.
    RepositoryInaccessible,
    /// A previously inaccessible repository responds again.
    RepositoryAccessRestored,
    /// Monitoring of an entity started or restarted.
    MonitoringStarted,
    /// Monitoring of an entity stopped.
    MonitoringStopped,
}

impl AlertCode {
    /// All alert codes.
    pub const ALL: [Self; 28] = [
        Self::SystemCpuUsageIncreasedAboveThreshold,
        Self::SystemCpuUsageDecreasedBelowThreshold,
        Self::SystemRamUsageIncreasedAboveThreshold,
        Self::SystemRamUsageDecreasedBelowThreshold,
        Self::SystemStorageUsageIncreasedAboveThreshold,
        Self::SystemStorageUsageDecreasedBelowThreshold,
        Self::OpenFileDescriptorsIncreasedAboveThreshold,
        Self::OpenFileDescriptorsDecreasedBelowThreshold,
        Self::SystemWentDown,
        Self::SystemStillDown,
        Self::SystemBackUp,
        Self::NodeWentDown,
        Self::NodeStillDown,
        Self::NodeBackUp,
        Self::BlockHeightDeltaIncreasedAboveThreshold,
        Self::BlockHeightDeltaDecreasedBelowThreshold,
        Self::PeerCountDecreasedBelowThreshold,
        Self::PeerCountIncreasedAboveThreshold,
        Self::DataSourceUnreachable,
        Self::DataSourceReachableAgain,
        Self::PriceFeedDeviationIncreasedAboveThreshold,
        Self::PriceFeedDeviationDecreasedBelowThreshold,
        Self::PriceFeedMissedObservationsIncreasedAboveThreshold,
        Self::PriceFeedMissedObservationsDecreasedBelowThreshold,
        Self::RepositoryInaccessible,
        Self::RepositoryAccessRestored,
        Self::MonitoringStarted,
        Self::MonitoringStopped,
    ];

    /// Returns the code as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SystemCpuUsageIncreasedAboveThreshold => {
                "system_cpu_usage_increased_above_threshold"
            }
            Self::SystemCpuUsageDecreasedBelowThreshold => {
                "system_cpu_usage_decreased_below_threshold"
            }
            Self::SystemRamUsageIncreasedAboveThreshold => {
                "system_ram_usage_increased_above_threshold"
            }
            Self::SystemRamUsageDecreasedBelowThreshold => {
                "system_ram_usage_decreased_below_threshold"
            }
            Self::SystemStorageUsageIncreasedAboveThreshold => {
                "system_storage_usage_increased_above_threshold"
            }
            Self::SystemStorageUsageDecreasedBelowThreshold => {
                "system_storage_usage_decreased_below_threshold"
            }
            Self::OpenFileDescriptorsIncreasedAboveThreshold => {
                "open_file_descriptors_increased_above_threshold"
            }
            Self::OpenFileDescriptorsDecreasedBelowThreshold => {
                "open_file_descriptors_decreased_below_threshold"
            }
            Self::SystemWentDown => "system_went_down",
            Self::SystemStillDown => "system_still_down",
            Self::SystemBackUp => "system_back_up",
            Self::NodeWentDown => "node_went_down",
            Self::NodeStillDown => "node_still_down",
            Self::NodeBackUp => "node_back_up",
            Self::BlockHeightDeltaIncreasedAboveThreshold => {
                "block_height_delta_increased_above_threshold"
            }
            Self::BlockHeightDeltaDecreasedBelowThreshold => {
                "block_height_delta_decreased_below_threshold"
            }
            Self::PeerCountDecreasedBelowThreshold => "peer_count_decreased_below_threshold",
            Self::PeerCountIncreasedAboveThreshold => "peer_count_increased_above_threshold",
            Self::DataSourceUnreachable => "data_source_unreachable",
            Self::DataSourceReachableAgain => "data_source_reachable_again",
            Self::PriceFeedDeviationIncreasedAboveThreshold => {
                "price_feed_deviation_increased_above_threshold"
            }
            Self::PriceFeedDeviationDecreasedBelowThreshold => {
                "price_feed_deviation_decreased_below_threshold"
            }
            Self::PriceFeedMissedObservationsIncreasedAboveThreshold => {
                "price_feed_missed_observations_increased_above_threshold"
            }
            Self::PriceFeedMissedObservationsDecreasedBelowThreshold => {
                "price_feed_missed_observations_decreased_below_threshold"
            }
            Self::RepositoryInaccessible => "repository_inaccessible",
            Self::RepositoryAccessRestored => "repository_access_restored",
            Self::MonitoringStarted => "monitoring_started",
            Self::MonitoringStopped => "monitoring_stopped",
        }
    }

    /// Resolves a code from its wire string.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        static BY_CODE: Lazy<HashMap<&'static str, AlertCode>> = Lazy::new(|| {
            AlertCode::ALL
                .into_iter()
                .map(|code| (code.as_str(), code))
                .collect()
        });
        BY_CODE.get(code).copied()
    }

    /// Returns the monitorable kind this code belongs to.
    #[must_use]
    pub const fn namespace(&self) -> MonitorableKind {
        match self {
            Self::SystemCpuUsageIncreasedAboveThreshold
            | Self::SystemCpuUsageDecreasedBelowThreshold
            | Self::SystemRamUsageIncreasedAboveThreshold
            | Self::SystemRamUsageDecreasedBelowThreshold
            | Self::SystemStorageUsageIncreasedAboveThreshold
            | Self::SystemStorageUsageDecreasedBelowThreshold
            | Self::OpenFileDescriptorsIncreasedAboveThreshold
            | Self::OpenFileDescriptorsDecreasedBelowThreshold
            | Self::SystemWentDown
            | Self::SystemStillDown
            | Self::SystemBackUp => MonitorableKind::System,
            Self::NodeWentDown
            | Self::NodeStillDown
            | Self::NodeBackUp
            | Self::BlockHeightDeltaIncreasedAboveThreshold
            | Self::BlockHeightDeltaDecreasedBelowThreshold
            | Self::PeerCountDecreasedBelowThreshold
            | Self::PeerCountIncreasedAboveThreshold => MonitorableKind::Node,
            Self::DataSourceUnreachable | Self::DataSourceReachableAgain => {
                MonitorableKind::Network
            }
            Self::PriceFeedDeviationIncreasedAboveThreshold
            | Self::PriceFeedDeviationDecreasedBelowThreshold
            | Self::PriceFeedMissedObservationsIncreasedAboveThreshold
            | Self::PriceFeedMissedObservationsDecreasedBelowThreshold => {
                MonitorableKind::Contract
            }
            Self::RepositoryInaccessible | Self::RepositoryAccessRestored => {
                MonitorableKind::Repository
            }
            Self::MonitoringStarted | Self::MonitoringStopped => MonitorableKind::Internal,
        }
    }

    /// Returns the positional message template for this code.
    ///
    /// `{}` placeholders are filled left to right from the alert's metric
    /// state args by [`AlertCode::render_message`].
    #[must_use]
    pub const fn template(&self) -> &'static str {
        match self {
            Self::SystemCpuUsageIncreasedAboveThreshold => {
                "system CPU usage is at {}%, above the {}% threshold"
            }
            Self::SystemCpuUsageDecreasedBelowThreshold => {
                "system CPU usage is back at {}%, below the {}% threshold"
            }
            Self::SystemRamUsageIncreasedAboveThreshold => {
                "system RAM usage is at {}%, above the {}% threshold"
            }
            Self::SystemRamUsageDecreasedBelowThreshold => {
                "system RAM usage is back at {}%, below the {}% threshold"
            }
            Self::SystemStorageUsageIncreasedAboveThreshold => {
                "system storage usage is at {}%, above the {}% threshold"
            }
            Self::SystemStorageUsageDecreasedBelowThreshold => {
                "system storage usage is back at {}%, below the {}% threshold"
            }
            Self::OpenFileDescriptorsIncreasedAboveThreshold => {
                "open file descriptors are at {}% of the limit, above the {}% threshold"
            }
            Self::OpenFileDescriptorsDecreasedBelowThreshold => {
                "open file descriptors are back at {}% of the limit, below the {}% threshold"
            }
            Self::SystemWentDown => "system went down, unreachable for {}s (threshold {}s)",
            Self::SystemStillDown => "system is still down, unreachable for {}s",
            Self::SystemBackUp => "system is back up after {}s of downtime",
            Self::NodeWentDown => "node went down, unreachable for {}s (threshold {}s)",
            Self::NodeStillDown => "node is still down, unreachable for {}s",
            Self::NodeBackUp => "node is back up after {}s of downtime",
            Self::BlockHeightDeltaIncreasedAboveThreshold => {
                "node is {} blocks behind the network head, above the {}-block threshold"
            }
            Self::BlockHeightDeltaDecreasedBelowThreshold => {
                "node is {} blocks behind the network head, back below the {}-block threshold"
            }
            Self::PeerCountDecreasedBelowThreshold => {
                "node has {} peers, below the {}-peer threshold"
            }
            Self::PeerCountIncreasedAboveThreshold => {
                "node has {} peers, back above the {}-peer threshold"
            }
            Self::DataSourceUnreachable => "no chain data source can be reached",
            Self::DataSourceReachableAgain => "a chain data source is reachable again",
            Self::PriceFeedDeviationIncreasedAboveThreshold => {
                "price feed deviation is at {}%, above the {}% threshold"
            }
            Self::PriceFeedDeviationDecreasedBelowThreshold => {
                "price feed deviation is back at {}%, below the {}% threshold"
            }
            Self::PriceFeedMissedObservationsIncreasedAboveThreshold => {
                "price feed missed {} rounds, above the {}-round threshold"
            }
            Self::PriceFeedMissedObservationsDecreasedBelowThreshold => {
                "price feed missed rounds back at {}, below the {}-round threshold"
            }
            Self::RepositoryInaccessible => "repository cannot be accessed",
            Self::RepositoryAccessRestored => "repository access restored",
            Self::MonitoringStarted => "monitoring started",
            Self::MonitoringStopped => "monitoring stopped",
        }
    }

    /// Renders the operator-facing message for this code.
    ///
    /// The entity name prefixes the rendered template so a message is
    /// readable without the surrounding alert record.
    #[must_use]
    pub fn render_message(&self, entity_name: &str, args: &[MetricValue]) -> String {
        format!("{entity_name}: {}", render(self.template(), args))
    }
}

impl std::fmt::Display for AlertCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Substitutes `{}` placeholders positionally.
///
/// Arity mismatches never fail: excess args are dropped and unfilled
/// placeholders are left verbatim, so a stale template cannot take the
/// alert path down.
fn render(template: &str, args: &[MetricValue]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut remaining = template;
    let mut args = args.iter();
    while let Some(idx) = remaining.find("{}") {
        out.push_str(&remaining[..idx]);
        match args.next() {
            Some(arg) => out.push_str(&arg.to_string()),
            None => out.push_str("{}"),
        }
        remaining = &remaining[idx + 2..];
    }
    out.push_str(remaining);
    out
}
