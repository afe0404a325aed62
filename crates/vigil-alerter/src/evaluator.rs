//! The rule evaluator.
//!
//! One observation goes in, at most one [`Alert`] comes out. The evaluator
//! resolves the entity's ladder from the configuration registry, runs the
//! group's state machine against the stored [`MetricState`], and persists
//! the updated state. All rejection reasons are typed; the evaluator logs
//! produced alerts at debug level and nothing else.

use tracing::debug;
use vigil_config::{AlertsConfigRegistry, LadderConfig, SeverityLadder, ThresholdLadder, TimeWindowLadder};
use vigil_model::{
    Alert, Direction, EntityCtx, GroupSpec, Machinery, MetricGroupCode, MetricValue, Severity,
};

use crate::error::ObservationError;
use crate::store::{MetricState, MetricStateStore};

/// Evaluates observations against configured ladders.
///
/// Cloning shares the underlying registry and state store, so one evaluator
/// can be handed to every worker.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    registry: AlertsConfigRegistry,
    store: MetricStateStore,
}

impl RuleEvaluator {
    /// Creates an evaluator over the given registry and state store.
    #[must_use]
    pub fn new(registry: AlertsConfigRegistry, store: MetricStateStore) -> Self {
        Self { registry, store }
    }

    /// Resolves the ladder governing `group` for the entity's chain.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::UnknownMetricGroup`] when the chain has
    /// no configuration (or none for this group), and
    /// [`ObservationError::DisabledLadder`] when a ladder exists but is
    /// switched off.
    pub fn resolve(
        &self,
        ctx: &EntityCtx,
        group: MetricGroupCode,
    ) -> Result<LadderConfig, ObservationError> {
        let config = self
            .registry
            .config_for_parent(&ctx.parent_id, group.kind())
            .ok_or_else(|| ObservationError::UnknownMetricGroup {
                group,
                parent_id: ctx.parent_id.as_str().to_string(),
            })?;
        let ladder =
            config
                .ladder(group)
                .copied()
                .ok_or_else(|| ObservationError::UnknownMetricGroup {
                    group,
                    parent_id: ctx.parent_id.as_str().to_string(),
                })?;
        if !ladder.is_enabled() {
            return Err(ObservationError::DisabledLadder { group });
        }
        Ok(ladder)
    }

    /// Evaluates one observation, returning at most one alert.
    ///
    /// A disabled ladder is inert: the observation is accepted, nothing is
    /// emitted, and the stored state is left untouched so re-enabling
    /// resumes cleanly instead of treating the gap as a crossing.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError`] for observations that cannot be
    /// evaluated; state is untouched and no alert is synthesized.
    pub fn evaluate(
        &self,
        ctx: &EntityCtx,
        group: MetricGroupCode,
        observation: &MetricValue,
        now: i64,
    ) -> Result<Option<Alert>, ObservationError> {
        let expected = group.value_kind();
        let found = observation.kind();
        if found != expected {
            return Err(ObservationError::TypeMismatch {
                group,
                expected,
                found,
            });
        }

        let ladder = match self.resolve(ctx, group) {
            Ok(ladder) => ladder,
            Err(ObservationError::DisabledLadder { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };

        let spec = group.spec();
        let mut state = self.store.get(&ctx.origin_id, group).unwrap_or_default();
        let alert = match (group.machinery(), ladder) {
            (Machinery::Threshold, LadderConfig::Threshold(ladder)) => {
                step_threshold(ctx, group, spec, &ladder, observation, &mut state, now)
            }
            (Machinery::TimeWindow, LadderConfig::TimeWindow(ladder)) => {
                step_time_window(ctx, group, spec, &ladder, observation, &mut state, now)
            }
            (Machinery::Boolean, LadderConfig::Severity(ladder)) => {
                step_boolean(ctx, group, spec, &ladder, observation, &mut state, now)
            }
            (Machinery::Downtime, LadderConfig::Threshold(ladder)) => {
                step_downtime(ctx, group, spec, &ladder, observation, &mut state, now)
            }
            // Ladder shape the registry never produces for this machinery.
            _ => return Ok(None),
        };

        state.last_value = Some(*observation);
        self.store.put(&ctx.origin_id, group, state);

        if let Some(alert) = &alert {
            debug!(
                origin = %ctx.origin_id,
                group = %group,
                code = %alert.alert_code,
                severity = %alert.severity,
                "observation produced alert"
            );
        }
        Ok(alert)
    }
}

/// Classifies a value against the ladder's rungs, critical first.
///
/// An observation crossing both rungs is critical, never double-counted
/// as a warning.
fn classify(ladder: &ThresholdLadder, direction: Direction, value: f64) -> Option<(Severity, f64)> {
    if let Some(level) = ladder.critical {
        if direction.crossed(value, level.threshold) {
            return Some((Severity::Critical, level.threshold));
        }
    }
    if let Some(level) = ladder.warning {
        if direction.crossed(value, level.threshold) {
            return Some((Severity::Warning, level.threshold));
        }
    }
    None
}

fn step_threshold(
    ctx: &EntityCtx,
    group: MetricGroupCode,
    spec: GroupSpec,
    ladder: &ThresholdLadder,
    observation: &MetricValue,
    state: &mut MetricState,
    now: i64,
) -> Option<Alert> {
    let value = observation.as_f64()?;
    let direction = spec.direction.unwrap_or(Direction::IncreaseAbove);
    let new = classify(ladder, direction, value);
    let old = state.last_severity;

    match new {
        // Escalation, including the first crossing. Option ordering puts
        // None below every held level.
        Some((severity, threshold)) if Some(severity) > old => {
            state.last_severity = Some(severity);
            state.last_alert_at = Some(now);
            Some(Alert::new(
                spec.raise_code,
                severity,
                ctx,
                group,
                vec![*observation, MetricValue::Float(threshold)],
                now,
            ))
        }
        // Same level held: repeat on the level's own cadence.
        Some((severity, threshold)) if Some(severity) == old => {
            let repeat = ladder.level(severity).and_then(|level| level.repeat_seconds)?;
            let last = state.last_alert_at?;
            if now - last >= repeat as i64 {
                state.last_alert_at = Some(now);
                Some(Alert::new(
                    spec.repeat_code,
                    severity,
                    ctx,
                    group,
                    vec![*observation, MetricValue::Float(threshold)],
                    now,
                ))
            } else {
                None
            }
        }
        // De-escalation: resolves at Info, referencing the exited level.
        _ => {
            let exited = old?;
            state.last_severity = new.map(|(severity, _)| severity);
            state.last_alert_at = Some(now);
            let args = match ladder.level(exited) {
                Some(level) => vec![*observation, MetricValue::Float(level.threshold)],
                None => vec![*observation],
            };
            Some(Alert::new(spec.resolve_code, Severity::Info, ctx, group, args, now))
        }
    }
}

fn step_time_window(
    ctx: &EntityCtx,
    group: MetricGroupCode,
    spec: GroupSpec,
    ladder: &TimeWindowLadder,
    observation: &MetricValue,
    state: &mut MetricState,
    now: i64,
) -> Option<Alert> {
    let view = ladder.as_threshold();
    if state.last_severity.is_some() {
        // The window has been served; from here the ladder steps like a
        // plain threshold.
        let alert = step_threshold(ctx, group, spec, &view, observation, state, now);
        if state.last_severity.is_none() {
            state.window_start_at = None;
        }
        return alert;
    }

    let value = observation.as_f64()?;
    let direction = spec.direction.unwrap_or(Direction::IncreaseAbove);
    if classify(&view, direction, value).is_none() {
        // Streak broken: the window restarts from scratch, no partial credit.
        state.window_start_at = None;
        return None;
    }

    let start = match state.window_start_at {
        Some(start) => start,
        None => {
            state.window_start_at = Some(now);
            now
        }
    };
    if now - start >= ladder.time_window_seconds as i64 {
        state.window_start_at = None;
        step_threshold(ctx, group, spec, &view, observation, state, now)
    } else {
        // Holding inside the window.
        None
    }
}

fn step_boolean(
    ctx: &EntityCtx,
    group: MetricGroupCode,
    spec: GroupSpec,
    ladder: &SeverityLadder,
    observation: &MetricValue,
    state: &mut MetricState,
    now: i64,
) -> Option<Alert> {
    let is_true = observation.as_bool()?;
    let held = state.last_severity.is_some();
    if is_true && !held {
        state.last_severity = Some(ladder.severity);
        state.last_alert_at = Some(now);
        Some(Alert::new(
            spec.raise_code,
            ladder.severity,
            ctx,
            group,
            vec![*observation],
            now,
        ))
    } else if !is_true && held {
        state.last_severity = None;
        state.last_alert_at = Some(now);
        Some(Alert::new(
            spec.resolve_code,
            Severity::Info,
            ctx,
            group,
            vec![*observation],
            now,
        ))
    } else {
        None
    }
}

fn step_downtime(
    ctx: &EntityCtx,
    group: MetricGroupCode,
    spec: GroupSpec,
    ladder: &ThresholdLadder,
    observation: &MetricValue,
    state: &mut MetricState,
    now: i64,
) -> Option<Alert> {
    let is_down = observation.as_bool()?;

    if !is_down {
        let was_alerting = state.last_severity.is_some();
        let went_down_at = state.window_start_at;
        state.consecutive_down_count = 0;
        state.window_start_at = None;
        if was_alerting {
            state.last_severity = None;
            state.last_alert_at = Some(now);
            let downtime = went_down_at.map_or(0, |start| now - start);
            return Some(Alert::new(
                spec.resolve_code,
                Severity::Info,
                ctx,
                group,
                vec![MetricValue::Int(downtime)],
                now,
            ));
        }
        // Went back up before anything fired: clear silently.
        return None;
    }

    let went_down_at = match state.window_start_at {
        Some(start) => start,
        None => {
            state.window_start_at = Some(now);
            now
        }
    };
    state.consecutive_down_count = state.consecutive_down_count.saturating_add(1);

    let elapsed = now - went_down_at;
    let direction = spec.direction.unwrap_or(Direction::IncreaseAbove);
    let new = classify(ladder, direction, elapsed as f64);
    let old = state.last_severity;

    match new {
        Some((severity, threshold)) if Some(severity) > old => {
            state.last_severity = Some(severity);
            state.last_alert_at = Some(now);
            Some(Alert::new(
                spec.raise_code,
                severity,
                ctx,
                group,
                vec![MetricValue::Int(elapsed), MetricValue::Float(threshold)],
                now,
            ))
        }
        Some((severity, _)) if Some(severity) == old => {
            let repeat = ladder.level(severity).and_then(|level| level.repeat_seconds)?;
            let last = state.last_alert_at?;
            if now - last >= repeat as i64 {
                state.last_alert_at = Some(now);
                Some(Alert::new(
                    spec.repeat_code,
                    severity,
                    ctx,
                    group,
                    vec![MetricValue::Int(elapsed)],
                    now,
                ))
            } else {
                None
            }
        }
        // Elapsed downtime below every rung; it only grows while the
        // entity stays down, so de-escalation cannot happen here.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vigil_config::RawConfigEntry;
    use vigil_model::{AlertCode, MonitorableKind, OriginId, ParentId, ValueKind};

    fn ctx() -> EntityCtx {
        EntityCtx {
            origin_id: OriginId::new("node-1").unwrap(),
            parent_id: ParentId::new("parent-1").unwrap(),
            entity_name: "cosmos validator 1".to_string(),
        }
    }

    fn apply(
        registry: &AlertsConfigRegistry,
        chain: &str,
        kind: MonitorableKind,
        entries: Vec<RawConfigEntry>,
    ) {
        let batch: HashMap<String, RawConfigEntry> = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        registry.apply(chain, kind, &batch).unwrap();
    }

    /// CPU ladder {warning: 50 repeat 300, critical: 90 repeat 60}.
    fn cpu_evaluator() -> RuleEvaluator {
        let registry = AlertsConfigRegistry::new();
        apply(
            &registry,
            "cosmos",
            MonitorableKind::System,
            vec![RawConfigEntry::new("parent-1", "system_cpu_usage")
                .with_warning_threshold("50")
                .with_warning_repeat("300")
                .with_critical_threshold("90")
                .with_critical_repeat("60")],
        );
        RuleEvaluator::new(registry, MetricStateStore::new())
    }

    fn eval_cpu(evaluator: &RuleEvaluator, value: f64, now: i64) -> Option<Alert> {
        evaluator
            .evaluate(
                &ctx(),
                MetricGroupCode::SystemCpuUsage,
                &MetricValue::Float(value),
                now,
            )
            .unwrap()
    }

    mod threshold_tests {
        use super::*;
        use test_case::test_case;

        #[test]
        fn escalation_ordering_without_double_warning() {
            let evaluator = cpu_evaluator();

            assert!(eval_cpu(&evaluator, 5.0, 0).is_none());

            let warning = eval_cpu(&evaluator, 60.0, 10).unwrap();
            assert_eq!(warning.severity, Severity::Warning);
            assert_eq!(warning.alert_code, AlertCode::SystemCpuUsageIncreasedAboveThreshold);
            assert_eq!(
                warning.metric_state_args,
                vec![MetricValue::Float(60.0), MetricValue::Float(50.0)]
            );

            let critical = eval_cpu(&evaluator, 95.0, 20).unwrap();
            assert_eq!(critical.severity, Severity::Critical);
            assert_eq!(
                critical.metric_state_args,
                vec![MetricValue::Float(95.0), MetricValue::Float(90.0)]
            );
        }

        #[test]
        fn crossing_both_rungs_is_a_single_critical() {
            let evaluator = cpu_evaluator();
            let alert = eval_cpu(&evaluator, 95.0, 0).unwrap();
            assert_eq!(alert.severity, Severity::Critical);
            assert!(eval_cpu(&evaluator, 95.0, 1).is_none());
        }

        // Rung boundaries are strict: sitting exactly on a threshold is not
        // a crossing.
        #[test_case(30.0, None ; "inside both rungs")]
        #[test_case(50.0, None ; "at the warning rung")]
        #[test_case(60.0, Some(Severity::Warning) ; "between the rungs")]
        #[test_case(90.0, Some(Severity::Warning) ; "at the critical rung")]
        #[test_case(95.0, Some(Severity::Critical) ; "above the critical rung")]
        fn fresh_observation_classification(value: f64, expected: Option<Severity>) {
            let evaluator = cpu_evaluator();
            let severity = eval_cpu(&evaluator, value, 0).map(|alert| alert.severity);
            assert_eq!(severity, expected);
        }

        #[test]
        fn repeats_fire_only_after_the_window() {
            let evaluator = cpu_evaluator();

            assert!(eval_cpu(&evaluator, 95.0, 0).is_some());
            // Inside the 60s critical repeat window.
            assert!(eval_cpu(&evaluator, 95.0, 30).is_none());
            assert!(eval_cpu(&evaluator, 95.0, 59).is_none());

            let repeat = eval_cpu(&evaluator, 95.0, 60).unwrap();
            assert_eq!(repeat.severity, Severity::Critical);
            assert_eq!(repeat.alert_code, AlertCode::SystemCpuUsageIncreasedAboveThreshold);

            assert!(eval_cpu(&evaluator, 95.0, 90).is_none());
            assert!(eval_cpu(&evaluator, 95.0, 120).is_some());
        }

        #[test]
        fn repeat_timers_are_per_level() {
            let evaluator = cpu_evaluator();

            // Warning repeats every 300s.
            assert!(eval_cpu(&evaluator, 60.0, 0).is_some());
            assert!(eval_cpu(&evaluator, 60.0, 100).is_none());

            // Escalating resets the cadence to the critical timer (60s).
            assert!(eval_cpu(&evaluator, 95.0, 100).is_some());
            assert!(eval_cpu(&evaluator, 95.0, 150).is_none());
            assert!(eval_cpu(&evaluator, 95.0, 170).is_some());
        }

        #[test]
        fn repeats_disabled_when_unconfigured() {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::System,
                vec![RawConfigEntry::new("parent-1", "system_cpu_usage")
                    .with_warning_threshold("50")],
            );
            let evaluator = RuleEvaluator::new(registry, MetricStateStore::new());

            assert!(eval_cpu(&evaluator, 60.0, 0).is_some());
            assert!(eval_cpu(&evaluator, 60.0, 10_000).is_none());
        }

        #[test]
        fn resolution_is_a_single_info() {
            let evaluator = cpu_evaluator();

            assert!(eval_cpu(&evaluator, 95.0, 0).is_some());

            let resolved = eval_cpu(&evaluator, 10.0, 30).unwrap();
            assert_eq!(resolved.severity, Severity::Info);
            assert_eq!(resolved.alert_code, AlertCode::SystemCpuUsageDecreasedBelowThreshold);
            // References the exited critical rung.
            assert_eq!(
                resolved.metric_state_args,
                vec![MetricValue::Float(10.0), MetricValue::Float(90.0)]
            );

            assert!(eval_cpu(&evaluator, 10.0, 40).is_none());
        }

        #[test]
        fn de_escalation_steps_down_through_info() {
            let evaluator = cpu_evaluator();

            assert!(eval_cpu(&evaluator, 95.0, 0).is_some());

            // Critical to warning: one Info referencing the critical rung.
            let step_down = eval_cpu(&evaluator, 60.0, 10).unwrap();
            assert_eq!(step_down.severity, Severity::Info);
            assert_eq!(
                step_down.metric_state_args,
                vec![MetricValue::Float(60.0), MetricValue::Float(90.0)]
            );

            // Warning is now the held level; inside its repeat window.
            assert!(eval_cpu(&evaluator, 60.0, 20).is_none());

            // Warning to clear: one Info referencing the warning rung.
            let cleared = eval_cpu(&evaluator, 10.0, 30).unwrap();
            assert_eq!(cleared.severity, Severity::Info);
            assert_eq!(
                cleared.metric_state_args,
                vec![MetricValue::Float(10.0), MetricValue::Float(50.0)]
            );
        }

        #[test]
        fn only_critical_rung_configured() {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::System,
                vec![RawConfigEntry::new("parent-1", "system_cpu_usage")
                    .with_critical_threshold("90")],
            );
            let evaluator = RuleEvaluator::new(registry, MetricStateStore::new());

            assert!(eval_cpu(&evaluator, 60.0, 0).is_none());
            let alert = eval_cpu(&evaluator, 95.0, 10).unwrap();
            assert_eq!(alert.severity, Severity::Critical);

            let resolved = eval_cpu(&evaluator, 60.0, 20).unwrap();
            assert_eq!(resolved.severity, Severity::Info);
            assert_eq!(
                resolved.metric_state_args,
                vec![MetricValue::Float(60.0), MetricValue::Float(90.0)]
            );
        }

        #[test]
        fn below_threshold_observations_still_track_last_value() {
            let evaluator = cpu_evaluator();
            let store = MetricStateStore::new();
            let evaluator = RuleEvaluator::new(evaluator.registry.clone(), store.clone());

            assert!(eval_cpu(&evaluator, 5.0, 0).is_none());
            let state = store.get(&ctx().origin_id, MetricGroupCode::SystemCpuUsage).unwrap();
            assert_eq!(state.last_value, Some(MetricValue::Float(5.0)));
            assert!(state.last_severity.is_none());
            assert!(state.last_alert_at.is_none());
        }

        #[test]
        fn decrease_below_direction_flips_the_ladder() {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::Node,
                vec![RawConfigEntry::new("parent-1", "peer_count")
                    .with_warning_threshold("5")
                    .with_critical_threshold("2")],
            );
            let evaluator = RuleEvaluator::new(registry, MetricStateStore::new());
            let eval = |value: i64, now: i64| {
                evaluator
                    .evaluate(&ctx(), MetricGroupCode::PeerCount, &MetricValue::Int(value), now)
                    .unwrap()
            };

            assert!(eval(6, 0).is_none());

            let warning = eval(4, 10).unwrap();
            assert_eq!(warning.severity, Severity::Warning);
            assert_eq!(warning.alert_code, AlertCode::PeerCountDecreasedBelowThreshold);

            let critical = eval(1, 20).unwrap();
            assert_eq!(critical.severity, Severity::Critical);

            let recovered = eval(10, 30).unwrap();
            assert_eq!(recovered.severity, Severity::Info);
            assert_eq!(recovered.alert_code, AlertCode::PeerCountIncreasedAboveThreshold);
        }
    }

    mod inertness_tests {
        use super::*;

        #[test]
        fn disabled_ladder_never_emits_or_mutates() {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::System,
                vec![RawConfigEntry::new("parent-1", "system_cpu_usage")
                    .with_enabled("false")
                    .with_warning_threshold("50")
                    .with_critical_threshold("90")],
            );
            let store = MetricStateStore::new();
            let evaluator = RuleEvaluator::new(registry, store.clone());

            for (value, now) in [(95.0, 0), (5.0, 10), (99.0, 20)] {
                let outcome = evaluator
                    .evaluate(&ctx(), MetricGroupCode::SystemCpuUsage, &MetricValue::Float(value), now)
                    .unwrap();
                assert!(outcome.is_none());
            }
            assert!(store.is_empty());
        }

        #[test]
        fn resolve_surfaces_the_disabled_reason() {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::System,
                vec![RawConfigEntry::new("parent-1", "system_cpu_usage")
                    .with_enabled("false")
                    .with_warning_threshold("50")],
            );
            let evaluator = RuleEvaluator::new(registry, MetricStateStore::new());

            let err = evaluator.resolve(&ctx(), MetricGroupCode::SystemCpuUsage).unwrap_err();
            assert_eq!(
                err,
                ObservationError::DisabledLadder {
                    group: MetricGroupCode::SystemCpuUsage,
                }
            );
        }

        #[test]
        fn type_mismatch_is_rejected_before_state_access() {
            let evaluator = cpu_evaluator();
            let store = MetricStateStore::new();
            let evaluator = RuleEvaluator::new(evaluator.registry.clone(), store.clone());

            let err = evaluator
                .evaluate(&ctx(), MetricGroupCode::SystemCpuUsage, &MetricValue::Bool(true), 0)
                .unwrap_err();
            assert_eq!(
                err,
                ObservationError::TypeMismatch {
                    group: MetricGroupCode::SystemCpuUsage,
                    expected: ValueKind::Float,
                    found: ValueKind::Bool,
                }
            );
            assert!(store.is_empty());
        }

        #[test]
        fn unconfigured_chain_is_rejected() {
            let evaluator = RuleEvaluator::new(AlertsConfigRegistry::new(), MetricStateStore::new());
            let err = evaluator
                .evaluate(&ctx(), MetricGroupCode::SystemCpuUsage, &MetricValue::Float(95.0), 0)
                .unwrap_err();
            assert_eq!(
                err,
                ObservationError::UnknownMetricGroup {
                    group: MetricGroupCode::SystemCpuUsage,
                    parent_id: "parent-1".to_string(),
                }
            );
        }

        #[test]
        fn group_without_a_ladder_is_rejected() {
            let evaluator = cpu_evaluator();
            let err = evaluator
                .evaluate(&ctx(), MetricGroupCode::SystemRamUsage, &MetricValue::Float(95.0), 0)
                .unwrap_err();
            assert!(matches!(err, ObservationError::UnknownMetricGroup { .. }));
        }
    }

    mod time_window_tests {
        use super::*;

        /// Height-delta ladder {warning: 5, critical: 50, window: 300s}.
        fn height_evaluator() -> (RuleEvaluator, MetricStateStore) {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::Node,
                vec![RawConfigEntry::new("parent-1", "block_height_delta")
                    .with_warning_threshold("5")
                    .with_warning_repeat("600")
                    .with_critical_threshold("50")
                    .with_time_window("300")],
            );
            let store = MetricStateStore::new();
            (RuleEvaluator::new(registry, store.clone()), store)
        }

        fn eval_delta(evaluator: &RuleEvaluator, value: i64, now: i64) -> Option<Alert> {
            evaluator
                .evaluate(
                    &ctx(),
                    MetricGroupCode::BlockHeightDelta,
                    &MetricValue::Int(value),
                    now,
                )
                .unwrap()
        }

        #[test]
        fn window_must_be_served_continuously() {
            let (evaluator, _) = height_evaluator();

            // Holds for 250s, then the streak breaks.
            assert!(eval_delta(&evaluator, 10, 0).is_none());
            assert!(eval_delta(&evaluator, 12, 100).is_none());
            assert!(eval_delta(&evaluator, 11, 250).is_none());
            assert!(eval_delta(&evaluator, 0, 260).is_none());

            // Restarted streak: no partial credit from the first 250s.
            assert!(eval_delta(&evaluator, 10, 300).is_none());
            assert!(eval_delta(&evaluator, 10, 550).is_none());

            let alert = eval_delta(&evaluator, 10, 600).unwrap();
            assert_eq!(alert.severity, Severity::Warning);
            assert_eq!(
                alert.alert_code,
                AlertCode::BlockHeightDeltaIncreasedAboveThreshold
            );
        }

        #[test]
        fn commit_uses_the_classification_at_commit_time() {
            let (evaluator, _) = height_evaluator();

            // Anchored at warning level, escalated to critical by the time
            // the window is served.
            assert!(eval_delta(&evaluator, 10, 0).is_none());
            assert!(eval_delta(&evaluator, 80, 150).is_none());

            let alert = eval_delta(&evaluator, 80, 300).unwrap();
            assert_eq!(alert.severity, Severity::Critical);
            assert_eq!(
                alert.metric_state_args,
                vec![MetricValue::Int(80), MetricValue::Float(50.0)]
            );
        }

        #[test]
        fn committed_ladder_steps_like_threshold() {
            let (evaluator, _) = height_evaluator();

            assert!(eval_delta(&evaluator, 10, 0).is_none());
            assert!(eval_delta(&evaluator, 10, 300).is_some());

            // Escalation after commit is immediate; no second window.
            let escalated = eval_delta(&evaluator, 80, 310).unwrap();
            assert_eq!(escalated.severity, Severity::Critical);

            // Resolution clears both the level and the anchor.
            let resolved = eval_delta(&evaluator, 0, 320).unwrap();
            assert_eq!(resolved.severity, Severity::Info);
            assert_eq!(
                resolved.alert_code,
                AlertCode::BlockHeightDeltaDecreasedBelowThreshold
            );

            // A fresh crossing starts a fresh window.
            assert!(eval_delta(&evaluator, 10, 330).is_none());
            assert!(eval_delta(&evaluator, 10, 629).is_none());
            assert!(eval_delta(&evaluator, 10, 630).is_some());
        }

        #[test]
        fn repeats_after_commit_follow_the_level_cadence() {
            let (evaluator, _) = height_evaluator();

            assert!(eval_delta(&evaluator, 10, 0).is_none());
            assert!(eval_delta(&evaluator, 10, 300).is_some());

            assert!(eval_delta(&evaluator, 10, 500).is_none());
            let repeat = eval_delta(&evaluator, 10, 900).unwrap();
            assert_eq!(repeat.severity, Severity::Warning);
        }

        #[test]
        fn anchor_survives_level_fluctuation_inside_window() {
            let (evaluator, store) = height_evaluator();

            assert!(eval_delta(&evaluator, 10, 0).is_none());
            // Fluctuates between warning and critical classification while
            // the streak holds.
            assert!(eval_delta(&evaluator, 80, 100).is_none());
            assert!(eval_delta(&evaluator, 10, 200).is_none());

            let state = store.get(&ctx().origin_id, MetricGroupCode::BlockHeightDelta).unwrap();
            assert_eq!(state.window_start_at, Some(0));
        }
    }

    mod boolean_tests {
        use super::*;

        fn source_evaluator() -> RuleEvaluator {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::Network,
                vec![RawConfigEntry::new("parent-1", "data_source_unreachable")
                    .with_severity("error")],
            );
            RuleEvaluator::new(registry, MetricStateStore::new())
        }

        fn eval_source(evaluator: &RuleEvaluator, value: bool, now: i64) -> Option<Alert> {
            evaluator
                .evaluate(
                    &ctx(),
                    MetricGroupCode::DataSourceUnreachable,
                    &MetricValue::Bool(value),
                    now,
                )
                .unwrap()
        }

        #[test]
        fn fires_once_and_resolves_once() {
            let evaluator = source_evaluator();

            assert!(eval_source(&evaluator, false, 0).is_none());

            let raised = eval_source(&evaluator, true, 10).unwrap();
            assert_eq!(raised.severity, Severity::Error);
            assert_eq!(raised.alert_code, AlertCode::DataSourceUnreachable);

            // No repeats for binary conditions.
            assert!(eval_source(&evaluator, true, 20).is_none());
            assert!(eval_source(&evaluator, true, 10_000).is_none());

            let resolved = eval_source(&evaluator, false, 10_100).unwrap();
            assert_eq!(resolved.severity, Severity::Info);
            assert_eq!(resolved.alert_code, AlertCode::DataSourceReachableAgain);

            assert!(eval_source(&evaluator, false, 10_200).is_none());
        }

        #[test]
        fn first_observation_true_fires_immediately() {
            let evaluator = source_evaluator();
            let raised = eval_source(&evaluator, true, 0).unwrap();
            assert_eq!(raised.severity, Severity::Error);
        }
    }

    mod downtime_tests {
        use super::*;

        /// Node downtime ladder {warning: 60s repeat 120, critical: 600s repeat 300}.
        fn node_down_evaluator() -> (RuleEvaluator, MetricStateStore) {
            let registry = AlertsConfigRegistry::new();
            apply(
                &registry,
                "cosmos",
                MonitorableKind::Node,
                vec![RawConfigEntry::new("parent-1", "node_is_down")
                    .with_warning_threshold("60")
                    .with_warning_repeat("120")
                    .with_critical_threshold("600")
                    .with_critical_repeat("300")],
            );
            let store = MetricStateStore::new();
            (RuleEvaluator::new(registry, store.clone()), store)
        }

        fn eval_down(evaluator: &RuleEvaluator, down: bool, now: i64) -> Option<Alert> {
            evaluator
                .evaluate(&ctx(), MetricGroupCode::NodeIsDown, &MetricValue::Bool(down), now)
                .unwrap()
        }

        #[test]
        fn classifies_elapsed_downtime_end_to_end() {
            let (evaluator, _) = node_down_evaluator();

            // Two early observations: below the 60s rung, nothing fires.
            assert!(eval_down(&evaluator, true, 0).is_none());
            assert!(eval_down(&evaluator, true, 10).is_none());

            // Past the warning rung: went-down fires at warning.
            let went_down = eval_down(&evaluator, true, 90).unwrap();
            assert_eq!(went_down.severity, Severity::Warning);
            assert_eq!(went_down.alert_code, AlertCode::NodeWentDown);
            assert_eq!(
                went_down.metric_state_args,
                vec![MetricValue::Int(90), MetricValue::Float(60.0)]
            );

            // Still down: repeats on the warning cadence.
            assert!(eval_down(&evaluator, true, 150).is_none());
            let still_down = eval_down(&evaluator, true, 210).unwrap();
            assert_eq!(still_down.alert_code, AlertCode::NodeStillDown);
            assert_eq!(still_down.metric_state_args, vec![MetricValue::Int(210)]);

            // Past the critical rung: went-down escalates.
            let escalated = eval_down(&evaluator, true, 700).unwrap();
            assert_eq!(escalated.severity, Severity::Critical);
            assert_eq!(escalated.alert_code, AlertCode::NodeWentDown);
            assert_eq!(
                escalated.metric_state_args,
                vec![MetricValue::Int(700), MetricValue::Float(600.0)]
            );

            // Back up: exactly one Info resolution carrying total downtime.
            let back_up = eval_down(&evaluator, false, 800).unwrap();
            assert_eq!(back_up.severity, Severity::Info);
            assert_eq!(back_up.alert_code, AlertCode::NodeBackUp);
            assert_eq!(back_up.metric_state_args, vec![MetricValue::Int(800)]);

            assert!(eval_down(&evaluator, false, 810).is_none());
        }

        #[test]
        fn recovery_before_first_alert_clears_silently() {
            let (evaluator, store) = node_down_evaluator();

            assert!(eval_down(&evaluator, true, 0).is_none());
            assert!(eval_down(&evaluator, true, 30).is_none());
            assert!(eval_down(&evaluator, false, 50).is_none());

            let state = store.get(&ctx().origin_id, MetricGroupCode::NodeIsDown).unwrap();
            assert_eq!(state.consecutive_down_count, 0);
            assert!(state.window_start_at.is_none());
            assert!(state.last_severity.is_none());
        }

        #[test]
        fn still_down_repeats_respect_the_level_timer() {
            let (evaluator, _) = node_down_evaluator();

            assert!(eval_down(&evaluator, true, 0).is_none());
            assert!(eval_down(&evaluator, true, 90).is_some());

            // Warning repeat is 120s.
            assert!(eval_down(&evaluator, true, 150).is_none());
            assert!(eval_down(&evaluator, true, 209).is_none());
            assert!(eval_down(&evaluator, true, 210).is_some());
        }

        #[test]
        fn down_count_tracks_consecutive_observations() {
            let (evaluator, store) = node_down_evaluator();

            for (i, now) in [0_i64, 10, 20, 30].into_iter().enumerate() {
                eval_down(&evaluator, true, now);
                let state = store.get(&ctx().origin_id, MetricGroupCode::NodeIsDown).unwrap();
                assert_eq!(state.consecutive_down_count, u32::try_from(i).unwrap() + 1);
            }

            eval_down(&evaluator, false, 40);
            let state = store.get(&ctx().origin_id, MetricGroupCode::NodeIsDown).unwrap();
            assert_eq!(state.consecutive_down_count, 0);
        }

        #[test]
        fn fresh_outage_starts_a_fresh_ladder() {
            let (evaluator, _) = node_down_evaluator();

            assert!(eval_down(&evaluator, true, 0).is_none());
            assert!(eval_down(&evaluator, true, 90).is_some());
            assert!(eval_down(&evaluator, false, 100).is_some());

            // Second outage: the epoch restarts, below the rung again.
            assert!(eval_down(&evaluator, true, 200).is_none());
            assert!(eval_down(&evaluator, true, 230).is_none());
            let alert = eval_down(&evaluator, true, 290).unwrap();
            assert_eq!(alert.metric_state_args[0], MetricValue::Int(90));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_fresh_classification_follows_the_rungs(value in 0.0_f64..200.0) {
                let evaluator = cpu_evaluator();
                match eval_cpu(&evaluator, value, 0) {
                    None => prop_assert!(value <= 50.0),
                    Some(alert) if value > 90.0 => {
                        prop_assert_eq!(alert.severity, Severity::Critical);
                    }
                    Some(alert) => {
                        prop_assert!(value > 50.0);
                        prop_assert_eq!(alert.severity, Severity::Warning);
                    }
                }
            }

            #[test]
            fn prop_emitted_severities_stay_in_the_operator_range(
                values in proptest::collection::vec(0.0_f64..200.0, 1..40)
            ) {
                let evaluator = cpu_evaluator();
                for (i, value) in values.into_iter().enumerate() {
                    if let Some(alert) = eval_cpu(&evaluator, value, i as i64 * 10) {
                        prop_assert!(matches!(
                            alert.severity,
                            Severity::Info | Severity::Warning | Severity::Critical
                        ));
                    }
                }
            }

            #[test]
            fn prop_alert_args_lead_with_the_observation(
                values in proptest::collection::vec(0.0_f64..200.0, 1..40)
            ) {
                let evaluator = cpu_evaluator();
                for (i, value) in values.into_iter().enumerate() {
                    if let Some(alert) = eval_cpu(&evaluator, value, i as i64 * 10) {
                        prop_assert_eq!(
                            alert.metric_state_args.first(),
                            Some(&MetricValue::Float(value))
                        );
                    }
                }
            }
        }
    }
}
