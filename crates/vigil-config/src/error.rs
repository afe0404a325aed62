//! Error types for the vigil-config crate.

use thiserror::Error;
use vigil_model::{Direction, MetricGroupCode, MonitorableKind};

/// Errors that can occur while validating or applying alert configuration.
///
/// Every variant rejects a whole configuration batch; the previously applied
/// configuration (if any) stays active.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A batch carried entries with more than one parent id.
    #[error("configuration batch mixes parent ids: expected {expected}, found {found}")]
    ParentIdMismatch {
        /// The parent id established by the first entry of the batch.
        expected: String,
        /// The conflicting parent id found on a later entry.
        found: String,
    },

    /// The batch's parent id is already registered to another chain.
    #[error("parent id {parent_id} is already registered to chain {chain_name}")]
    ParentIdInUse {
        /// The parent id the batch tried to claim.
        parent_id: String,
        /// The chain that already owns the parent id.
        chain_name: String,
    },

    /// An entry named a metric group the target kind does not have.
    #[error("unknown metric group {name} for {kind} chains")]
    UnknownMetricGroup {
        /// The unrecognized entry name.
        name: String,
        /// The monitorable kind the batch was applied for.
        kind: MonitorableKind,
    },

    /// Warning and critical thresholds are not ordered by severity.
    #[error(
        "thresholds for {group} are not ordered by severity: warning {warning}, critical {critical}"
    )]
    InvalidThresholdOrdering {
        /// The metric group whose ladder is misordered.
        group: MetricGroupCode,
        /// The configured warning threshold.
        warning: f64,
        /// The configured critical threshold.
        critical: f64,
    },

    /// A string-typed field failed to parse, or a required field was absent.
    #[error("entry {entry}: field {field} has malformed value {value:?}")]
    MalformedValue {
        /// The entry (metric group name) the field belongs to.
        entry: String,
        /// The field that failed to parse.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },

    /// An entry configured a comparison direction the group does not use.
    #[error("metric group {group} compares {expected}, entry configured {configured}")]
    DirectionConflict {
        /// The metric group whose direction was overridden.
        group: MetricGroupCode,
        /// The direction the entry configured.
        configured: Direction,
        /// The group's canonical direction.
        expected: Direction,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
