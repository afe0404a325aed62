//! The alerts configuration registry.
//!
//! Holds one [`AlertsConfig`] per `(kind, chain_name)` and the reverse
//! `parent_id → chain_name` index the routing layer depends on. Batches are
//! validated in full before anything is stored; a rejected batch leaves the
//! previously applied configuration untouched.
//!
//! The registry never logs. Every rejection is a typed [`ConfigError`] the
//! ingestion path is expected to surface.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use vigil_model::{MetricGroupCode, MonitorableKind, ParentId};

use crate::error::ConfigError;
use crate::ladder::LadderConfig;
use crate::raw::RawConfigEntry;

/// One chain's applied alerting configuration.
///
/// Built by [`AlertsConfigRegistry::apply`] and replaced wholesale on
/// reconfiguration; individual ladders are never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertsConfig {
    /// The parent id every entry of the originating batch carried.
    pub parent_id: ParentId,
    /// The chain this configuration belongs to.
    pub chain_name: String,
    /// The monitorable kind this configuration was applied for.
    pub kind: MonitorableKind,
    ladders: HashMap<MetricGroupCode, LadderConfig>,
}

impl AlertsConfig {
    /// Creates a configuration from already validated ladders.
    #[must_use]
    pub fn new(
        parent_id: ParentId,
        chain_name: impl Into<String>,
        kind: MonitorableKind,
        ladders: HashMap<MetricGroupCode, LadderConfig>,
    ) -> Self {
        Self {
            parent_id,
            chain_name: chain_name.into(),
            kind,
            ladders,
        }
    }

    /// Returns the ladder configured for `group`, if any.
    #[must_use]
    pub fn ladder(&self, group: MetricGroupCode) -> Option<&LadderConfig> {
        self.ladders.get(&group)
    }

    /// Returns the number of configured metric groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.ladders.len()
    }
}

/// Registry of applied alert configurations, shared across workers.
///
/// Lock ordering: whenever both maps are held, `parents` is acquired
/// before `configs`.
#[derive(Debug, Default)]
pub struct AlertsConfigRegistry {
    /// Configurations indexed by (kind, chain name).
    configs: Arc<RwLock<HashMap<(MonitorableKind, String), Arc<AlertsConfig>>>>,
    /// Parent id to chain name mapping for reverse lookups.
    parents: Arc<RwLock<HashMap<(MonitorableKind, ParentId), String>>>,
}

impl AlertsConfigRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and applies one configuration batch for `chain_name`.
    ///
    /// The whole batch is rejected on the first violation: mixed parent
    /// ids, a parent id owned by another chain of the same kind, entry
    /// names outside the kind's metric-group set, or entries that fail to
    /// parse. On success the chain's configuration is swapped atomically.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered; the previously
    /// applied configuration (if any) stays active.
    pub fn apply(
        &self,
        chain_name: &str,
        kind: MonitorableKind,
        batch: &HashMap<String, RawConfigEntry>,
    ) -> Result<(), ConfigError> {
        let (parent_id, ladders) = validate_batch(kind, batch)?;

        let mut parents = self.parents.write();
        if let Some(owner) = parents.get(&(kind, parent_id.clone())) {
            if owner != chain_name {
                return Err(ConfigError::ParentIdInUse {
                    parent_id: parent_id.as_str().to_string(),
                    chain_name: owner.clone(),
                });
            }
        }

        let mut configs = self.configs.write();
        let key = (kind, chain_name.to_string());
        if let Some(previous) = configs.get(&key) {
            if previous.parent_id != parent_id {
                parents.remove(&(kind, previous.parent_id.clone()));
            }
        }
        let config = AlertsConfig::new(parent_id.clone(), chain_name, kind, ladders);
        configs.insert(key, Arc::new(config));
        parents.insert((kind, parent_id), chain_name.to_string());
        Ok(())
    }

    /// Removes a chain's configuration and its reverse mapping.
    ///
    /// Returns true if a configuration was present.
    pub fn remove(&self, chain_name: &str, kind: MonitorableKind) -> bool {
        let mut parents = self.parents.write();
        let mut configs = self.configs.write();
        match configs.remove(&(kind, chain_name.to_string())) {
            Some(config) => {
                parents.remove(&(kind, config.parent_id.clone()));
                true
            }
            None => false,
        }
    }

    /// Gets a chain's configuration by name.
    #[must_use]
    pub fn config_for(&self, chain_name: &str, kind: MonitorableKind) -> Option<Arc<AlertsConfig>> {
        let configs = self.configs.read();
        configs.get(&(kind, chain_name.to_string())).cloned()
    }

    /// Gets a chain's configuration by parent id.
    #[must_use]
    pub fn config_for_parent(
        &self,
        parent_id: &ParentId,
        kind: MonitorableKind,
    ) -> Option<Arc<AlertsConfig>> {
        let parents = self.parents.read();
        let chain_name = parents.get(&(kind, parent_id.clone()))?;

        let configs = self.configs.read();
        configs.get(&(kind, chain_name.clone())).cloned()
    }

    /// Resolves the chain name owning `parent_id`.
    #[must_use]
    pub fn chain_name_for(&self, parent_id: &ParentId, kind: MonitorableKind) -> Option<String> {
        let parents = self.parents.read();
        parents.get(&(kind, parent_id.clone())).cloned()
    }

    /// Returns the number of configured chains across all kinds.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.configs.read().len()
    }

    /// Returns true if no chain is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }
}

impl Clone for AlertsConfigRegistry {
    /// Cheap clone sharing the same underlying maps.
    fn clone(&self) -> Self {
        Self {
            configs: Arc::clone(&self.configs),
            parents: Arc::clone(&self.parents),
        }
    }
}

/// Parses and validates a whole batch without touching shared state.
fn validate_batch(
    kind: MonitorableKind,
    batch: &HashMap<String, RawConfigEntry>,
) -> Result<(ParentId, HashMap<MetricGroupCode, LadderConfig>), ConfigError> {
    // Deterministic validation order so the same bad batch always reports
    // the same first violation.
    let mut names: Vec<&String> = batch.keys().collect();
    names.sort();

    let mut parent_id: Option<ParentId> = None;
    let mut ladders = HashMap::with_capacity(batch.len());
    for name in names {
        let entry = &batch[name];
        let Some(group) = MetricGroupCode::from_name(name) else {
            return Err(ConfigError::UnknownMetricGroup {
                name: name.clone(),
                kind,
            });
        };
        if group.kind() != kind {
            return Err(ConfigError::UnknownMetricGroup {
                name: name.clone(),
                kind,
            });
        }

        let entry_parent =
            ParentId::new(entry.parent_id.clone()).map_err(|_| ConfigError::MalformedValue {
                entry: name.clone(),
                field: "parent_id",
                value: entry.parent_id.clone(),
            })?;
        match &parent_id {
            None => parent_id = Some(entry_parent),
            Some(expected) if *expected != entry_parent => {
                return Err(ConfigError::ParentIdMismatch {
                    expected: expected.as_str().to_string(),
                    found: entry_parent.as_str().to_string(),
                });
            }
            Some(_) => {}
        }

        ladders.insert(group, entry.build(group)?);
    }

    let Some(parent_id) = parent_id else {
        // An empty batch binds no parent id and cannot be stored.
        return Err(ConfigError::MalformedValue {
            entry: String::new(),
            field: "parent_id",
            value: String::new(),
        });
    };
    Ok((parent_id, ladders))
}
