//! Error types for the vigil-router crate.

use thiserror::Error;
use vigil_model::MonitorableKind;

/// Errors that can occur while routing an alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The alert's parent id resolves to no registered chain.
    ///
    /// Non-fatal: routing degrades to the global mute scope for such
    /// alerts; this error exists for diagnostics.
    #[error("no chain registered for parent id {parent_id} under kind {kind}")]
    UnresolvableChain {
        /// The parent id that could not be resolved.
        parent_id: String,
        /// The monitorable kind the lookup went through.
        kind: MonitorableKind,
    },
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RoutingError>;
