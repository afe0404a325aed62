//! Error types for the vigil-alerter crate.

use thiserror::Error;
use vigil_model::{MetricGroupCode, ValueKind};

/// Errors that can occur while evaluating an observation.
///
/// Every variant leaves the entity's metric state untouched; the caller is
/// expected to log and drop the observation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    /// The observation's value kind does not match the group's declared kind.
    #[error("metric group {group} expects {expected} observations, got {found}")]
    TypeMismatch {
        /// The metric group the observation was submitted for.
        group: MetricGroupCode,
        /// The value kind the group declares.
        expected: ValueKind,
        /// The value kind the observation carried.
        found: ValueKind,
    },

    /// No ladder is configured for the group under the entity's chain.
    #[error("no ladder for metric group {group} under parent id {parent_id}")]
    UnknownMetricGroup {
        /// The metric group with no configuration.
        group: MetricGroupCode,
        /// The parent id the lookup went through.
        parent_id: String,
    },

    /// A ladder exists for the group but is disabled.
    #[error("ladder for metric group {group} is disabled")]
    DisabledLadder {
        /// The metric group whose ladder is disabled.
        group: MetricGroupCode,
    },
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, ObservationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_type_mismatch() {
        let err = ObservationError::TypeMismatch {
            group: MetricGroupCode::SystemCpuUsage,
            expected: ValueKind::Float,
            found: ValueKind::Bool,
        };
        assert_eq!(
            err.to_string(),
            "metric group system_cpu_usage expects float observations, got bool"
        );
    }

    #[test]
    fn error_display_unknown_metric_group() {
        let err = ObservationError::UnknownMetricGroup {
            group: MetricGroupCode::PeerCount,
            parent_id: "parent-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no ladder for metric group peer_count under parent id parent-1"
        );
    }

    #[test]
    fn error_display_disabled_ladder() {
        let err = ObservationError::DisabledLadder {
            group: MetricGroupCode::SystemRamUsage,
        };
        assert_eq!(
            err.to_string(),
            "ladder for metric group system_ram_usage is disabled"
        );
    }
}
