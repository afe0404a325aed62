//! Per-entity metric state storage.
//!
//! This module provides the [`MetricStateStore`], which tracks one
//! [`MetricState`] per `(origin, metric group)` pair. The store does no
//! cross-entity coordination beyond the map lock; keeping writes for one
//! entity on one worker is the engine's job.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use vigil_model::{MetricGroupCode, MetricValue, OriginId, Severity};

/// Evaluation state for one `(origin, metric group)` pair.
///
/// Created lazily on first observation and reset when the entity's monitor
/// (re)starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricState {
    /// The most recent observation, updated on every enabled evaluation.
    pub last_value: Option<MetricValue>,
    /// The threshold level currently held; `None` when below every rung.
    pub last_severity: Option<Severity>,
    /// When the last alert for this pair was emitted.
    pub last_alert_at: Option<i64>,
    /// Streak anchor: when the current time-window hold began, or for
    /// downtime groups the epoch the entity went down.
    pub window_start_at: Option<i64>,
    /// Consecutive down observations for downtime groups.
    pub consecutive_down_count: u32,
}

/// Thread-safe storage of per-entity evaluation state.
#[derive(Debug, Default)]
pub struct MetricStateStore {
    /// State keyed by (origin, metric group).
    states: Arc<RwLock<HashMap<(OriginId, MetricGroupCode), MetricState>>>,
}

impl MetricStateStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the state for one `(origin, metric group)` pair.
    #[must_use]
    pub fn get(&self, origin: &OriginId, group: MetricGroupCode) -> Option<MetricState> {
        let states = self.states.read();
        states.get(&(origin.clone(), group)).copied()
    }

    /// Stores the state for one `(origin, metric group)` pair.
    pub fn put(&self, origin: &OriginId, group: MetricGroupCode, state: MetricState) {
        let mut states = self.states.write();
        states.insert((origin.clone(), group), state);
    }

    /// Clears every group's state for one entity.
    ///
    /// Returns the number of cleared states.
    pub fn reset(&self, origin: &OriginId) -> usize {
        let mut states = self.states.write();
        let before = states.len();
        states.retain(|(state_origin, _), _| state_origin != origin);
        let cleared = before - states.len();

        debug!(
            origin = %origin,
            cleared,
            "reset entity metric state"
        );

        cleared
    }

    /// Returns the number of tracked `(origin, metric group)` pairs.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.read().len()
    }

    /// Returns true if no state is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

impl Clone for MetricStateStore {
    /// Cheap clone sharing the same underlying storage.
    fn clone(&self) -> Self {
        Self {
            states: Arc::clone(&self.states),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(id: &str) -> OriginId {
        OriginId::new(id).unwrap()
    }

    fn held_state(severity: Severity, at: i64) -> MetricState {
        MetricState {
            last_value: Some(MetricValue::Float(95.0)),
            last_severity: Some(severity),
            last_alert_at: Some(at),
            window_start_at: None,
            consecutive_down_count: 0,
        }
    }

    #[test]
    fn get_returns_none_for_untracked_pair() {
        let store = MetricStateStore::new();
        assert!(store.get(&origin("node-1"), MetricGroupCode::SystemCpuUsage).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn put_then_get_roundtrip() {
        let store = MetricStateStore::new();
        let state = held_state(Severity::Warning, 100);
        store.put(&origin("node-1"), MetricGroupCode::SystemCpuUsage, state);

        let got = store.get(&origin("node-1"), MetricGroupCode::SystemCpuUsage).unwrap();
        assert_eq!(got, state);
        assert_eq!(store.state_count(), 1);
    }

    #[test]
    fn states_are_isolated_per_group() {
        let store = MetricStateStore::new();
        store.put(
            &origin("node-1"),
            MetricGroupCode::SystemCpuUsage,
            held_state(Severity::Warning, 100),
        );
        store.put(
            &origin("node-1"),
            MetricGroupCode::SystemRamUsage,
            held_state(Severity::Critical, 200),
        );

        let cpu = store.get(&origin("node-1"), MetricGroupCode::SystemCpuUsage).unwrap();
        let ram = store.get(&origin("node-1"), MetricGroupCode::SystemRamUsage).unwrap();
        assert_eq!(cpu.last_severity, Some(Severity::Warning));
        assert_eq!(ram.last_severity, Some(Severity::Critical));
    }

    #[test]
    fn reset_clears_only_the_given_entity() {
        let store = MetricStateStore::new();
        store.put(
            &origin("node-1"),
            MetricGroupCode::SystemCpuUsage,
            held_state(Severity::Warning, 100),
        );
        store.put(
            &origin("node-1"),
            MetricGroupCode::SystemRamUsage,
            held_state(Severity::Warning, 100),
        );
        store.put(
            &origin("node-2"),
            MetricGroupCode::SystemCpuUsage,
            held_state(Severity::Critical, 100),
        );

        assert_eq!(store.reset(&origin("node-1")), 2);
        assert!(store.get(&origin("node-1"), MetricGroupCode::SystemCpuUsage).is_none());
        assert!(store.get(&origin("node-2"), MetricGroupCode::SystemCpuUsage).is_some());
        assert_eq!(store.state_count(), 1);
    }

    #[test]
    fn reset_of_untracked_entity_clears_nothing() {
        let store = MetricStateStore::new();
        assert_eq!(store.reset(&origin("ghost")), 0);
    }

    #[test]
    fn clone_shares_storage() {
        let store = MetricStateStore::new();
        let clone = store.clone();
        clone.put(
            &origin("node-1"),
            MetricGroupCode::PeerCount,
            held_state(Severity::Warning, 100),
        );
        assert_eq!(store.state_count(), 1);
    }

    mod concurrent_tests {
        use super::*;
        use std::thread;

        #[test]
        fn concurrent_puts_and_resets() {
            let store = MetricStateStore::new();
            let mut handles = Vec::new();

            for i in 0..4 {
                let store = store.clone();
                handles.push(thread::spawn(move || {
                    let id = origin(&format!("node-{i}"));
                    for round in 0..100 {
                        store.put(
                            &id,
                            MetricGroupCode::SystemCpuUsage,
                            held_state(Severity::Warning, round),
                        );
                        assert!(store.get(&id, MetricGroupCode::SystemCpuUsage).is_some());
                    }
                    store.reset(&id);
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }
            assert!(store.is_empty());
        }
    }
}
