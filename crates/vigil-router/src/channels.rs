//! Notification channel configuration.
//!
//! The router does not talk to Telegram, PagerDuty, or e-mail itself; it
//! selects which configured channels an alert fans out to. A channel
//! subscribes to severities through four flags and optionally to a subset
//! of chains. Dispatch over the selected channels is the transport layer's
//! job.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use vigil_model::{ChannelId, ParentId, Severity};

/// One notification channel's routing preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// The channel's identifier, referenced by routing decisions.
    pub id: ChannelId,
    /// Human-readable channel name.
    pub name: String,
    /// Whether the channel receives `Info` alerts.
    pub info: bool,
    /// Whether the channel receives `Warning` alerts.
    pub warning: bool,
    /// Whether the channel receives `Critical` alerts.
    pub critical: bool,
    /// Whether the channel receives `Error` alerts.
    pub error: bool,
    /// Chains the channel covers; `None` covers every chain.
    pub chains: Option<BTreeSet<ParentId>>,
}

impl ChannelConfig {
    /// Creates a channel subscribed to every severity on every chain.
    #[must_use]
    pub fn new(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            info: true,
            warning: true,
            critical: true,
            error: true,
            chains: None,
        }
    }

    /// Sets the `Info` subscription flag.
    #[must_use]
    pub fn with_info(mut self, info: bool) -> Self {
        self.info = info;
        self
    }

    /// Sets the `Warning` subscription flag.
    #[must_use]
    pub fn with_warning(mut self, warning: bool) -> Self {
        self.warning = warning;
        self
    }

    /// Sets the `Critical` subscription flag.
    #[must_use]
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Sets the `Error` subscription flag.
    #[must_use]
    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    /// Restricts the channel to the given chains.
    #[must_use]
    pub fn with_chains(mut self, chains: impl IntoIterator<Item = ParentId>) -> Self {
        self.chains = Some(chains.into_iter().collect());
        self
    }

    /// Returns whether the channel subscribes to `severity`.
    ///
    /// `Internal` always passes: control-plane lifecycle alerts have no
    /// opt-out flag.
    #[must_use]
    pub const fn accepts_severity(&self, severity: Severity) -> bool {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
            Severity::Error => self.error,
            Severity::Internal => true,
        }
    }

    /// Returns whether the channel covers the given chain.
    #[must_use]
    pub fn covers_chain(&self, parent_id: &ParentId) -> bool {
        self.chains
            .as_ref()
            .map_or(true, |chains| chains.contains(parent_id))
    }
}

/// Registry of configured notification channels.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Arc<RwLock<HashMap<ChannelId, ChannelConfig>>>,
}

impl ChannelRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a channel, returning the replaced configuration if its id
    /// was already present.
    pub fn register(&self, config: ChannelConfig) -> Option<ChannelConfig> {
        let mut channels = self.channels.write();
        channels.insert(config.id.clone(), config)
    }

    /// Removes a channel by id.
    ///
    /// Returns true if a channel was present.
    pub fn remove(&self, id: &ChannelId) -> bool {
        let mut channels = self.channels.write();
        channels.remove(id).is_some()
    }

    /// Gets a channel's configuration by id.
    #[must_use]
    pub fn get(&self, id: &ChannelId) -> Option<ChannelConfig> {
        let channels = self.channels.read();
        channels.get(id).cloned()
    }

    /// Returns a snapshot of every registered channel.
    #[must_use]
    pub fn all(&self) -> Vec<ChannelConfig> {
        let channels = self.channels.read();
        channels.values().cloned().collect()
    }

    /// Returns the number of registered channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Returns true if no channel is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }
}

impl Clone for ChannelRegistry {
    /// Cheap clone sharing the same underlying channel map.
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}
