//! Shared alert vocabulary for the Vigil monitoring platform.
//!
//! `vigil-model` declares the types every other Vigil crate speaks:
//! severities, alert codes and their message templates, the metric-group
//! catalog, observation values, entity identifiers, and the alert record
//! itself. It carries no evaluation or routing logic.
//!
//! # Features
//!
//! - **Severity scale**: `Info` through `Internal`, with `Internal` reserved
//!   for control-plane lifecycle alerts
//! - **Alert codes**: one flat, wire-stable enum with a declarative message
//!   template per code
//! - **Metric-group catalog**: each group bound to its monitorable kind,
//!   value type, and evaluation machinery at compile time
//! - **Typed identifiers**: validated `OriginId` / `ParentId` / `ChannelId`
//!   newtypes
//! - **Wire-ready**: everything serializes as snake_case JSON for the bus
//!
//! # Example
//!
//! ```rust
//! use vigil_model::{
//!     Alert, AlertCode, EntityCtx, MetricGroupCode, MetricValue, OriginId, ParentId, Severity,
//! };
//!
//! let ctx = EntityCtx {
//!     origin_id: OriginId::new("node-1").unwrap(),
//!     parent_id: ParentId::new("chain-polkadot").unwrap(),
//!     entity_name: "polkadot validator 1".to_string(),
//! };
//!
//! // An alert renders its message from the code's template.
//! let alert = Alert::new(
//!     AlertCode::SystemRamUsageIncreasedAboveThreshold,
//!     Severity::Critical,
//!     &ctx,
//!     MetricGroupCode::SystemRamUsage,
//!     vec![MetricValue::Float(96.5), MetricValue::Float(95.0)],
//!     1_700_000_000,
//! );
//!
//! assert_eq!(
//!     alert.message,
//!     "polkadot validator 1: system RAM usage is at 96.5%, above the 95% threshold"
//! );
//! assert!(alert.severity > Severity::Warning);
//! ```

#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/vigil-model/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod alert;
pub mod code;
pub mod event;
pub mod group;
pub mod ids;
pub mod severity;
pub mod value;

// Re-export main types at crate root
pub use alert::Alert;
pub use code::AlertCode;
pub use event::{EntityCtx, LifecycleEvent, LifecycleKind, MetricEvent};
pub use group::{Direction, GroupSpec, Machinery, MetricGroupCode, MonitorableKind};
pub use ids::{ChannelId, IdError, OriginId, ParentId, MAX_ID_LENGTH};
pub use severity::Severity;
pub use value::{MetricValue, ValueKind};
