//! Rule evaluation for the Vigil monitoring platform.
//!
//! `vigil-alerter` turns observations into alerts. Each metric group runs
//! one of four state machines (threshold, time-window, boolean, downtime)
//! against per-entity state, so repeated observations of the same condition
//! alert on the configured cadence instead of every interval.
//!
//! # Features
//!
//! - **Stateful evaluation**: one [`MetricState`] per `(origin, metric
//!   group)` pair, created lazily and reset on monitor restart
//! - **Escalation ladders**: warning/critical rungs with per-level repeat
//!   timers, de-escalation always passing through an `Info` resolution
//! - **Four machineries**: plain thresholds, continuous time-window holds,
//!   binary conditions, and elapsed-downtime classification
//! - **Typed rejections**: unmatched value kinds and unconfigured groups
//!   fail with [`ObservationError`], never with a silent drop
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use vigil_alerter::{MetricStateStore, RuleEvaluator};
//! use vigil_config::{AlertsConfigRegistry, RawConfigEntry};
//! use vigil_model::{
//!     EntityCtx, MetricGroupCode, MetricValue, MonitorableKind, OriginId, ParentId, Severity,
//! };
//!
//! let registry = AlertsConfigRegistry::new();
//! let mut batch = HashMap::new();
//! batch.insert(
//!     "system_cpu_usage".to_string(),
//!     RawConfigEntry::new("parent-1", "system_cpu_usage")
//!         .with_warning_threshold("85")
//!         .with_critical_threshold("95"),
//! );
//! registry.apply("cosmos", MonitorableKind::System, &batch).unwrap();
//!
//! let evaluator = RuleEvaluator::new(registry, MetricStateStore::new());
//! let ctx = EntityCtx {
//!     origin_id: OriginId::new("host-1").unwrap(),
//!     parent_id: ParentId::new("parent-1").unwrap(),
//!     entity_name: "cosmos host 1".to_string(),
//! };
//!
//! let alert = evaluator
//!     .evaluate(
//!         &ctx,
//!         MetricGroupCode::SystemCpuUsage,
//!         &MetricValue::Float(91.0),
//!         1_700_000_000,
//!     )
//!     .unwrap()
//!     .expect("first crossing fires");
//! assert_eq!(alert.severity, Severity::Warning);
//! ```

#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/vigil-alerter/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod evaluator;
pub mod store;

// Re-export main types at crate root
pub use error::{ObservationError, Result};
pub use evaluator::RuleEvaluator;
pub use store::{MetricState, MetricStateStore};
