//! Alert evaluation engine for the Vigil monitoring platform.
//!
//! `vigil-engine` ties the other Vigil crates into a running pipeline: a
//! pool of worker tasks pulls metric and lifecycle events off per-shard
//! queues, evaluates them against the configured ladders, routes the
//! resulting alerts, and emits each alert with its delivery decision on a
//! bounded outbound channel.
//!
//! # Features
//!
//! - **Per-entity ordering**: events shard by origin id, so one entity's
//!   observations are evaluated strictly in submission order
//! - **Live reconfiguration**: the handle applies configuration batches and
//!   mute commands against the same stores the workers read
//! - **Lifecycle hygiene**: a monitor start resets the entity's metric
//!   state on its own worker before any later observation is evaluated
//! - **Supervised workers**: worker tasks restart on crash within a budget
//!   and drain their queues on shutdown
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use vigil_config::{AlertsConfigRegistry, RawConfigEntry};
//! use vigil_engine::{AlertingEngine, EngineConfig, EngineEvent};
//! use vigil_model::{
//!     ChannelId, MetricEvent, MetricGroupCode, MetricValue, MonitorableKind, OriginId, ParentId,
//!     Severity,
//! };
//! use vigil_router::{ChannelConfig, ChannelRegistry, MuteStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = AlertsConfigRegistry::new();
//! let mut batch = HashMap::new();
//! batch.insert(
//!     "system_cpu_usage".to_string(),
//!     RawConfigEntry::new("parent-1", "system_cpu_usage").with_critical_threshold("90"),
//! );
//! registry
//!     .apply("cosmos", MonitorableKind::System, &batch)
//!     .unwrap();
//!
//! let channels = ChannelRegistry::new();
//! channels.register(ChannelConfig::new(ChannelId::new("ops").unwrap(), "ops room"));
//!
//! let engine = AlertingEngine::new(
//!     EngineConfig::default(),
//!     registry,
//!     channels,
//!     MuteStore::new(),
//! );
//! let (outbound, mut alerts) = tokio::sync::mpsc::channel(16);
//! let handle = engine.start(outbound);
//!
//! handle
//!     .submit(EngineEvent::Metric(MetricEvent {
//!         origin_id: OriginId::new("host-1").unwrap(),
//!         parent_id: ParentId::new("parent-1").unwrap(),
//!         entity_name: "cosmos host 1".to_string(),
//!         metric_group: MetricGroupCode::SystemCpuUsage,
//!         value: MetricValue::Float(97.0),
//!         observed_at: 1_700_000_000,
//!     }))
//!     .await
//!     .unwrap();
//!
//! let routed = alerts.recv().await.unwrap();
//! assert_eq!(routed.alert.severity, Severity::Critical);
//! assert_eq!(routed.decision.deliver_to.len(), 1);
//!
//! handle.shutdown().await;
//! # });
//! ```

#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/vigil-engine/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod engine;
pub mod error;
pub mod supervisor;

// Re-export main types at crate root
pub use engine::{
    AlertingEngine, DEFAULT_QUEUE_DEPTH, DEFAULT_WORKERS, EngineConfig, EngineEvent, EngineHandle,
    RoutedAlert,
};
pub use error::{EngineError, Result};
pub use supervisor::{RestartPolicy, Supervisor};
