//! Mute scopes and the mute-state store.
//!
//! Operators can silence alert fan-out globally, for one chain, or for one
//! `(chain, severity)` pair. A mute carries an optional expiry; expired
//! mutes become inactive immediately but stay stored until the external
//! housekeeping path calls [`MuteStore::purge_expired`]. Muting never
//! affects persistence, only delivery.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vigil_model::{ParentId, Severity};

/// The scope a mute (or unmute) command applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum MuteScope {
    /// Every chain and severity.
    Global,
    /// One chain, every severity.
    Chain {
        /// The chain being muted.
        parent_id: ParentId,
    },
    /// One severity on one chain.
    ChainSeverity {
        /// The chain being muted.
        parent_id: ParentId,
        /// The severity being muted on that chain.
        severity: Severity,
    },
}

/// One stored mute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteEntry {
    /// Unix seconds after which the mute stops applying; `None` means the
    /// mute holds until explicitly removed.
    pub expires_at: Option<i64>,
}

impl MuteEntry {
    /// Returns whether the mute applies at `now`.
    #[must_use]
    pub fn is_active(&self, now: i64) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// An operator mute command as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteCommand {
    /// The scope to mute.
    #[serde(flatten)]
    pub scope: MuteScope,
    /// Optional expiry in unix seconds.
    pub expires_at: Option<i64>,
}

/// Scoped mute flags, shared between the router and the command path.
#[derive(Debug, Default)]
pub struct MuteStore {
    inner: Arc<RwLock<MuteMaps>>,
}

#[derive(Debug, Default)]
struct MuteMaps {
    global: Option<MuteEntry>,
    chains: HashMap<ParentId, MuteEntry>,
    chain_severities: HashMap<(ParentId, Severity), MuteEntry>,
}

impl MuteStore {
    /// Creates a new store with no mutes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a mute for `scope`, replacing any previous entry for it.
    pub fn mute(&self, scope: MuteScope, expires_at: Option<i64>) {
        let entry = MuteEntry { expires_at };
        let mut maps = self.inner.write();
        match scope {
            MuteScope::Global => maps.global = Some(entry),
            MuteScope::Chain { parent_id } => {
                maps.chains.insert(parent_id, entry);
            }
            MuteScope::ChainSeverity {
                parent_id,
                severity,
            } => {
                maps.chain_severities.insert((parent_id, severity), entry);
            }
        }
    }

    /// Removes the mute for `scope`.
    ///
    /// Returns true if an entry (active or expired) was present.
    pub fn unmute(&self, scope: &MuteScope) -> bool {
        let mut maps = self.inner.write();
        match scope {
            MuteScope::Global => maps.global.take().is_some(),
            MuteScope::Chain { parent_id } => maps.chains.remove(parent_id).is_some(),
            MuteScope::ChainSeverity {
                parent_id,
                severity,
            } => maps
                .chain_severities
                .remove(&(parent_id.clone(), *severity))
                .is_some(),
        }
    }

    /// Returns whether delivery for `(parent_id, severity)` is muted at `now`.
    ///
    /// `parent_id = None` marks an alert whose chain could not be resolved;
    /// only the global scope applies to those.
    #[must_use]
    pub fn is_muted(&self, parent_id: Option<&ParentId>, severity: Severity, now: i64) -> bool {
        let maps = self.inner.read();
        if maps.global.map_or(false, |entry| entry.is_active(now)) {
            return true;
        }
        let Some(parent_id) = parent_id else {
            return false;
        };
        if maps
            .chains
            .get(parent_id)
            .map_or(false, |entry| entry.is_active(now))
        {
            return true;
        }
        maps.chain_severities
            .get(&(parent_id.clone(), severity))
            .map_or(false, |entry| entry.is_active(now))
    }

    /// Drops every entry that is no longer active at `now`.
    ///
    /// Returns the number of dropped entries.
    pub fn purge_expired(&self, now: i64) -> usize {
        let mut maps = self.inner.write();
        let mut purged = 0;

        if maps.global.map_or(false, |entry| !entry.is_active(now)) {
            maps.global = None;
            purged += 1;
        }
        let before = maps.chains.len();
        maps.chains.retain(|_, entry| entry.is_active(now));
        purged += before - maps.chains.len();
        let before = maps.chain_severities.len();
        maps.chain_severities.retain(|_, entry| entry.is_active(now));
        purged += before - maps.chain_severities.len();

        debug!(purged, "purged expired mutes");
        purged
    }

    /// Returns the number of stored entries, active or expired.
    #[must_use]
    pub fn mute_count(&self) -> usize {
        let maps = self.inner.read();
        usize::from(maps.global.is_some()) + maps.chains.len() + maps.chain_severities.len()
    }
}

impl Clone for MuteStore {
    /// Cheap clone sharing the same underlying mute maps.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
