//! Alerts configuration registry for the Vigil monitoring platform.
//!
//! `vigil-config` turns raw, string-typed configuration rows into typed
//! threshold ladders and stores them per chain. Configuration arrives in
//! whole-chain batches and is applied atomically: a batch either replaces
//! the chain's previous configuration in full or is rejected in full.
//!
//! # Features
//!
//! - **Typed ladders**: threshold, time-window, and severity ladders behind
//!   one tagged [`LadderConfig`] union
//! - **Strict parsing**: every malformed field is reported with its entry
//!   and raw value; nothing is coerced silently
//! - **Atomic apply**: no partially applied batch is ever observable
//! - **Reverse lookup**: `parent_id → chain_name` resolution for the
//!   routing layer
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use vigil_config::{AlertsConfigRegistry, RawConfigEntry};
//! use vigil_model::{MetricGroupCode, MonitorableKind, ParentId};
//!
//! let registry = AlertsConfigRegistry::new();
//!
//! let mut batch = HashMap::new();
//! batch.insert(
//!     "system_cpu_usage".to_string(),
//!     RawConfigEntry::new("parent-1", "system_cpu_usage")
//!         .with_warning_threshold("85")
//!         .with_warning_repeat("300")
//!         .with_critical_threshold("95"),
//! );
//!
//! registry.apply("cosmos", MonitorableKind::System, &batch).unwrap();
//!
//! let parent = ParentId::new("parent-1").unwrap();
//! let config = registry
//!     .config_for_parent(&parent, MonitorableKind::System)
//!     .unwrap();
//! assert!(config.ladder(MetricGroupCode::SystemCpuUsage).is_some());
//! ```

#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/vigil-config/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod ladder;
pub mod raw;
pub mod registry;

// Re-export main types at crate root
pub use error::{ConfigError, Result};
pub use ladder::{LadderConfig, SeverityLadder, ThresholdLadder, ThresholdLevel, TimeWindowLadder};
pub use raw::RawConfigEntry;
pub use registry::{AlertsConfig, AlertsConfigRegistry};
