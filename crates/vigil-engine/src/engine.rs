//! Sharded evaluation engine turning metric streams into routed alerts.
//!
//! [`AlertingEngine::start`] spawns a pool of worker tasks. Inbound events
//! are sharded by origin id, so every observation for one entity lands on
//! the same worker and is evaluated in submission order. Each worker runs
//! the full pipeline: evaluate the observation against the configured
//! ladders, route any resulting alert, and hand the pair to the outbound
//! channel.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};
use vigil_alerter::{MetricStateStore, RuleEvaluator};
use vigil_config::{AlertsConfigRegistry, ConfigError, RawConfigEntry};
use vigil_model::{
    Alert, AlertCode, LifecycleEvent, LifecycleKind, MetricEvent, MetricGroupCode, MonitorableKind,
    OriginId, Severity,
};
use vigil_router::{
    AlertRouter, ChannelRegistry, MuteCommand, MuteScope, MuteStore, RoutingDecision,
};

use crate::error::EngineError;
use crate::supervisor::{RestartPolicy, Supervisor};

/// Default number of worker shards.
pub const DEFAULT_WORKERS: usize = 4;

/// Default bounded queue depth per worker.
pub const DEFAULT_QUEUE_DEPTH: usize = 256;

/// Restart budget for a worker task before it is abandoned.
const WORKER_RESTART_LIMIT: u32 = 3;

/// Sizing knobs for the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of worker tasks sharding the event stream.
    pub workers: usize,
    /// Queue depth per worker; submission backpressures once full.
    pub queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

/// Inbound work accepted by [`EngineHandle::submit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A metric observation to evaluate against the configured ladders.
    Metric(MetricEvent),
    /// A monitoring lifecycle transition for one entity.
    Lifecycle(LifecycleEvent),
}

impl EngineEvent {
    /// Identity used to shard the event onto a worker.
    #[must_use]
    pub fn origin_id(&self) -> &OriginId {
        match self {
            Self::Metric(event) => &event.origin_id,
            Self::Lifecycle(event) => &event.origin_id,
        }
    }
}

/// An alert paired with the delivery decision computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedAlert {
    /// The rendered alert.
    pub alert: Alert,
    /// Where the alert fans out and whether it is persisted.
    pub decision: RoutingDecision,
}

/// Assembles the evaluation pipeline and spawns the worker pool.
///
/// The registry, mute store and channel registry stay shared with the
/// caller, so configuration and mute commands keep working while the
/// workers run.
#[derive(Debug)]
pub struct AlertingEngine {
    config: EngineConfig,
    registry: AlertsConfigRegistry,
    store: MetricStateStore,
    evaluator: RuleEvaluator,
    router: AlertRouter,
    mutes: MuteStore,
}

impl AlertingEngine {
    /// Wires an engine from its shared stores.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        registry: AlertsConfigRegistry,
        channels: ChannelRegistry,
        mutes: MuteStore,
    ) -> Self {
        let store = MetricStateStore::new();
        let evaluator = RuleEvaluator::new(registry.clone(), store.clone());
        let router = AlertRouter::new(registry.clone(), mutes.clone(), channels);
        Self {
            config,
            registry,
            store,
            evaluator,
            router,
            mutes,
        }
    }

    /// Spawns the worker pool and returns the handle used to feed it.
    ///
    /// Every routed alert is sent on `outbound`; dropping the receiving
    /// side only costs the alerts, the workers keep running.
    #[must_use]
    pub fn start(self, outbound: mpsc::Sender<RoutedAlert>) -> EngineHandle {
        let workers = self.config.workers.max(1);
        let queue_depth = self.config.queue_depth.max(1);
        let mut supervisor = Supervisor::new();
        let mut queues = Vec::with_capacity(workers);

        for shard in 0..workers {
            let (tx, rx) = mpsc::channel(queue_depth);
            queues.push(tx);
            let events: EventQueue = Arc::new(Mutex::new(rx));
            let worker = Worker {
                evaluator: self.evaluator.clone(),
                router: self.router.clone(),
                store: self.store.clone(),
                outbound: outbound.clone(),
            };
            supervisor.spawn(
                format!("alert-worker-{shard}"),
                RestartPolicy::OnExit {
                    max_restarts: WORKER_RESTART_LIMIT,
                },
                move |shutdown| {
                    let worker = worker.clone();
                    let events = Arc::clone(&events);
                    async move { worker.run(events, shutdown).await }
                },
            );
        }

        info!(workers, queue_depth, "alerting engine started");
        EngineHandle {
            queues,
            supervisor,
            registry: self.registry,
            mutes: self.mutes,
        }
    }
}

/// Handle for feeding events and commands to a running engine.
#[derive(Debug)]
pub struct EngineHandle {
    queues: Vec<mpsc::Sender<EngineEvent>>,
    supervisor: Supervisor,
    registry: AlertsConfigRegistry,
    mutes: MuteStore,
}

impl EngineHandle {
    /// Queues an event on the worker owning the event's origin.
    ///
    /// Events for the same origin are evaluated in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ShutDown`] when the worker pool has stopped
    /// accepting events.
    pub async fn submit(&self, event: EngineEvent) -> Result<(), EngineError> {
        let shard = shard_for(event.origin_id(), self.queues.len());
        self.queues[shard]
            .send(event)
            .await
            .map_err(|_| EngineError::ShutDown)
    }

    /// Applies a per-chain configuration batch to the shared registry.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; the registry keeps its
    /// previous configuration on error.
    pub fn apply_config(
        &self,
        chain_name: &str,
        kind: MonitorableKind,
        batch: &HashMap<String, RawConfigEntry>,
    ) -> Result<(), ConfigError> {
        match self.registry.apply(chain_name, kind, batch) {
            Ok(()) => {
                info!(chain = %chain_name, kind = %kind, entries = batch.len(), "alert configuration applied");
                Ok(())
            }
            Err(err) => {
                warn!(chain = %chain_name, kind = %kind, error = %err, "alert configuration rejected");
                Err(err)
            }
        }
    }

    /// Drops the configuration for a chain, returning whether one existed.
    pub fn remove_config(&self, chain_name: &str, kind: MonitorableKind) -> bool {
        let removed = self.registry.remove(chain_name, kind);
        if removed {
            info!(chain = %chain_name, kind = %kind, "alert configuration removed");
        }
        removed
    }

    /// Installs the mute described by a wire command.
    pub fn mute(&self, command: MuteCommand) {
        info!(scope = ?command.scope, expires_at = ?command.expires_at, "mute installed");
        self.mutes.mute(command.scope, command.expires_at);
    }

    /// Lifts a mute, returning whether one was present.
    pub fn unmute(&self, scope: &MuteScope) -> bool {
        let removed = self.mutes.unmute(scope);
        info!(scope = ?scope, removed, "mute lifted");
        removed
    }

    /// Drops expired mute entries, returning how many were removed.
    pub fn purge_expired_mutes(&self, now: i64) -> usize {
        self.mutes.purge_expired(now)
    }

    /// Signals shutdown and waits for the workers to drain their queues.
    pub async fn shutdown(self) {
        info!("alerting engine shutting down");
        self.supervisor.shutdown().await;
    }
}

type EventQueue = Arc<Mutex<mpsc::Receiver<EngineEvent>>>;

/// Maps an origin onto a worker shard; stable for the process lifetime.
fn shard_for(origin: &OriginId, shards: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    origin.hash(&mut hasher);
    (hasher.finish() as usize) % shards
}

/// Per-shard pipeline state; cloned into each run of a worker task.
#[derive(Debug, Clone)]
struct Worker {
    evaluator: RuleEvaluator,
    router: AlertRouter,
    store: MetricStateStore,
    outbound: mpsc::Sender<RoutedAlert>,
}

impl Worker {
    async fn run(self, events: EventQueue, mut shutdown: watch::Receiver<bool>) {
        // The lock is held for the whole run; only one run per shard is
        // ever active, a restarted run re-locks the same queue.
        let mut events = events.lock().await;
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle(event).await,
                        // Every submission handle is gone.
                        None => break,
                    }
                }
                // Resolves even when the signal predates this run. The
                // async block drops the non-Send watch::Ref inside the
                // future so the worker future stays Send.
                _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => break,
            }
        }
        // Finish events accepted before the stop signal.
        while let Ok(event) = events.try_recv() {
            self.handle(event).await;
        }
    }

    async fn handle(&self, event: EngineEvent) {
        match event {
            EngineEvent::Metric(event) => self.observe(event).await,
            EngineEvent::Lifecycle(event) => self.transition(event).await,
        }
    }

    /// Evaluates one observation, routing whatever alert it produces.
    async fn observe(&self, event: MetricEvent) {
        let ctx = event.ctx();
        match self
            .evaluator
            .evaluate(&ctx, event.metric_group, &event.value, event.observed_at)
        {
            Ok(Some(alert)) => self.dispatch(alert).await,
            Ok(None) => {}
            Err(err) => {
                warn!(
                    origin = %event.origin_id,
                    group = %event.metric_group,
                    error = %err,
                    "observation rejected"
                );
            }
        }
    }

    /// Resets per-entity state on start and emits the lifecycle alert.
    async fn transition(&self, event: LifecycleEvent) {
        let ctx = event.ctx();
        let code = match event.kind {
            LifecycleKind::Started => {
                let cleared = self.store.reset(&event.origin_id);
                debug!(origin = %event.origin_id, cleared, "metric state reset");
                AlertCode::MonitoringStarted
            }
            LifecycleKind::Stopped => AlertCode::MonitoringStopped,
        };
        let alert = Alert::new(
            code,
            Severity::Internal,
            &ctx,
            MetricGroupCode::EntityLifecycle,
            Vec::new(),
            event.timestamp,
        );
        self.dispatch(alert).await;
    }

    /// Routes an alert with the current mute state and sends it outbound.
    async fn dispatch(&self, alert: Alert) {
        let decision = self.router.route(&alert, Utc::now().timestamp());
        let routed = RoutedAlert { alert, decision };
        if self.outbound.send(routed).await.is_err() {
            warn!("routed alert receiver dropped");
        }
    }
}
