//! Error types for the alerting engine.

use thiserror::Error;

/// Errors surfaced by the engine's submission API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The worker pool is no longer accepting events.
    ///
    /// Raised after [`EngineHandle::shutdown`] has been initiated or when
    /// every worker has stopped for good.
    ///
    /// [`EngineHandle::shutdown`]: crate::engine::EngineHandle::shutdown
    #[error("alerting engine is shut down")]
    ShutDown,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
