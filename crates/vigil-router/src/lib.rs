//! Alert routing for the Vigil monitoring platform.
//!
//! `vigil-router` decides where finished alerts go. Operators mute fan-out
//! globally, per chain, or per `(chain, severity)`; channels subscribe to
//! severities and optionally to chains. The routing decision is the only
//! contract surfaced to the dispatch layer, and persistence is never
//! suppressed: a muted alert still lands in the audit trail.
//!
//! # Features
//!
//! - **Scoped mutes**: global / chain / chain+severity entries with optional
//!   expiry, expired entries inactive immediately and purged lazily
//! - **Channel preferences**: per-severity subscription flags plus optional
//!   chain restriction
//! - **Control-plane bypass**: `Internal` lifecycle alerts ignore mutes and
//!   severity flags, but still honor channel chain scoping
//! - **Graceful degradation**: alerts for unregistered parent ids route
//!   against the global mute scope instead of failing
//!
//! # Example
//!
//! ```rust
//! use vigil_config::AlertsConfigRegistry;
//! use vigil_model::{
//!     Alert, AlertCode, ChannelId, EntityCtx, MetricGroupCode, MetricValue, OriginId, ParentId,
//!     Severity,
//! };
//! use vigil_router::{AlertRouter, ChannelConfig, ChannelRegistry, MuteScope, MuteStore};
//!
//! let channels = ChannelRegistry::new();
//! channels.register(ChannelConfig::new(
//!     ChannelId::new("ops").unwrap(),
//!     "ops room",
//! ));
//!
//! let mutes = MuteStore::new();
//! let router = AlertRouter::new(AlertsConfigRegistry::new(), mutes.clone(), channels);
//!
//! let ctx = EntityCtx {
//!     origin_id: OriginId::new("host-1").unwrap(),
//!     parent_id: ParentId::new("parent-1").unwrap(),
//!     entity_name: "cosmos host 1".to_string(),
//! };
//! let alert = Alert::new(
//!     AlertCode::SystemCpuUsageIncreasedAboveThreshold,
//!     Severity::Warning,
//!     &ctx,
//!     MetricGroupCode::SystemCpuUsage,
//!     vec![MetricValue::Float(91.0), MetricValue::Float(85.0)],
//!     1_700_000_000,
//! );
//!
//! let decision = router.route(&alert, 1_700_000_000);
//! assert_eq!(decision.deliver_to.len(), 1);
//!
//! // Muting suppresses delivery, never persistence.
//! mutes.mute(MuteScope::Global, None);
//! let decision = router.route(&alert, 1_700_000_000);
//! assert!(decision.deliver_to.is_empty());
//! assert!(decision.persist);
//! ```

#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/vigil-router/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channels;
pub mod error;
pub mod mute;
pub mod router;

// Re-export main types at crate root
pub use channels::{ChannelConfig, ChannelRegistry};
pub use error::{Result, RoutingError};
pub use mute::{MuteCommand, MuteEntry, MuteScope, MuteStore};
pub use router::{AlertRouter, RoutingDecision};
