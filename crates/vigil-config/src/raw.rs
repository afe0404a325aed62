//! Raw configuration entries as they arrive on the wire.
//!
//! Upstream config tooling delivers every field as an optional string; this
//! module parses one entry into the typed ladder its metric group calls
//! for. All parse failures carry the entry and field so an operator can fix
//! the source row.

use serde::{Deserialize, Serialize};
use vigil_model::{Direction, Machinery, MetricGroupCode, Severity};

use crate::error::ConfigError;
use crate::ladder::{
    LadderConfig, SeverityLadder, ThresholdLadder, ThresholdLevel, TimeWindowLadder,
};

/// One metric group's configuration row, untyped.
///
/// Fields the group's machinery does not use are ignored, with one
/// exception: a `direction` that contradicts the group's canonical
/// comparison direction rejects the entry, since silently inverting a
/// comparison is worse than failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfigEntry {
    /// The chain the entry belongs to.
    pub parent_id: String,
    /// The metric group name the entry configures.
    pub name: String,
    /// "true"/"false" (case-insensitive); absent means enabled.
    pub enabled: Option<String>,
    /// Warning threshold, parsed as a finite float.
    pub warning_threshold: Option<String>,
    /// Seconds between warning-level repeats.
    pub warning_repeat: Option<String>,
    /// Critical threshold, parsed as a finite float.
    pub critical_threshold: Option<String>,
    /// Seconds between critical-level repeats.
    pub critical_repeat: Option<String>,
    /// Continuous-hold window in seconds; required for time-window groups.
    pub time_window: Option<String>,
    /// Fired severity for binary groups; required for them.
    pub severity: Option<String>,
    /// Comparison direction; must match the group's canonical one.
    pub direction: Option<String>,
}

impl RawConfigEntry {
    /// Creates an entry with every optional field absent.
    #[must_use]
    pub fn new(parent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            name: name.into(),
            enabled: None,
            warning_threshold: None,
            warning_repeat: None,
            critical_threshold: None,
            critical_repeat: None,
            time_window: None,
            severity: None,
            direction: None,
        }
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: impl Into<String>) -> Self {
        self.enabled = Some(enabled.into());
        self
    }

    /// Sets the warning threshold.
    #[must_use]
    pub fn with_warning_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.warning_threshold = Some(threshold.into());
        self
    }

    /// Sets the warning repeat interval.
    #[must_use]
    pub fn with_warning_repeat(mut self, repeat: impl Into<String>) -> Self {
        self.warning_repeat = Some(repeat.into());
        self
    }

    /// Sets the critical threshold.
    #[must_use]
    pub fn with_critical_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.critical_threshold = Some(threshold.into());
        self
    }

    /// Sets the critical repeat interval.
    #[must_use]
    pub fn with_critical_repeat(mut self, repeat: impl Into<String>) -> Self {
        self.critical_repeat = Some(repeat.into());
        self
    }

    /// Sets the time window.
    #[must_use]
    pub fn with_time_window(mut self, window: impl Into<String>) -> Self {
        self.time_window = Some(window.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Sets the comparison direction.
    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Parses this entry into the ladder shape `group` calls for.
    pub fn build(&self, group: MetricGroupCode) -> Result<LadderConfig, ConfigError> {
        self.check_direction(group)?;
        let enabled = self.parse_enabled()?;
        match group.machinery() {
            Machinery::Threshold | Machinery::Downtime => {
                let ladder = self.threshold_ladder(group, enabled)?;
                Ok(LadderConfig::Threshold(ladder))
            }
            Machinery::TimeWindow => {
                let ladder = self.threshold_ladder(group, enabled)?;
                let window = self.parse_required_u64("time_window", self.time_window.as_deref())?;
                Ok(LadderConfig::TimeWindow(TimeWindowLadder {
                    enabled: ladder.enabled,
                    warning: ladder.warning,
                    critical: ladder.critical,
                    time_window_seconds: window,
                }))
            }
            Machinery::Boolean => {
                let severity = self.parse_severity()?;
                Ok(LadderConfig::Severity(SeverityLadder { enabled, severity }))
            }
        }
    }

    fn threshold_ladder(
        &self,
        group: MetricGroupCode,
        enabled: bool,
    ) -> Result<ThresholdLadder, ConfigError> {
        let warning = self.parse_level(
            "warning_threshold",
            self.warning_threshold.as_deref(),
            "warning_repeat",
            self.warning_repeat.as_deref(),
        )?;
        let critical = self.parse_level(
            "critical_threshold",
            self.critical_threshold.as_deref(),
            "critical_repeat",
            self.critical_repeat.as_deref(),
        )?;
        if let (Some(w), Some(c)) = (warning, critical) {
            let direction = group
                .spec()
                .direction
                .unwrap_or(Direction::IncreaseAbove);
            if !direction.is_strictly_more_severe(c.threshold, w.threshold) {
                return Err(ConfigError::InvalidThresholdOrdering {
                    group,
                    warning: w.threshold,
                    critical: c.threshold,
                });
            }
        }
        Ok(ThresholdLadder {
            enabled,
            warning,
            critical,
        })
    }

    /// A level exists only when its threshold does; a repeat interval
    /// without a threshold is ignored.
    fn parse_level(
        &self,
        threshold_field: &'static str,
        threshold: Option<&str>,
        repeat_field: &'static str,
        repeat: Option<&str>,
    ) -> Result<Option<ThresholdLevel>, ConfigError> {
        let Some(raw) = threshold else {
            return Ok(None);
        };
        let threshold = self.parse_f64(threshold_field, raw)?;
        let repeat_seconds = match repeat {
            Some(raw) => Some(self.parse_u64(repeat_field, raw)?),
            None => None,
        };
        Ok(Some(ThresholdLevel {
            threshold,
            repeat_seconds,
        }))
    }

    fn check_direction(&self, group: MetricGroupCode) -> Result<(), ConfigError> {
        let Some(raw) = self.direction.as_deref() else {
            return Ok(());
        };
        let Some(configured) = Direction::parse(raw) else {
            return Err(self.malformed("direction", raw));
        };
        match group.spec().direction {
            Some(expected) if expected == configured => Ok(()),
            Some(expected) => Err(ConfigError::DirectionConflict {
                group,
                configured,
                expected,
            }),
            // Binary groups have no comparison to direct.
            None => Err(self.malformed("direction", raw)),
        }
    }

    fn parse_enabled(&self) -> Result<bool, ConfigError> {
        match self.enabled.as_deref() {
            None => Ok(true),
            Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(true),
            Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(false),
            Some(raw) => Err(self.malformed("enabled", raw)),
        }
    }

    fn parse_severity(&self) -> Result<Severity, ConfigError> {
        let Some(raw) = self.severity.as_deref() else {
            return Err(self.malformed("severity", ""));
        };
        match Severity::parse(raw) {
            // Internal is reserved for control-plane lifecycle alerts.
            Some(Severity::Internal) | None => Err(self.malformed("severity", raw)),
            Some(severity) => Ok(severity),
        }
    }

    fn parse_f64(&self, field: &'static str, raw: &str) -> Result<f64, ConfigError> {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.malformed(field, raw)),
        }
    }

    fn parse_u64(&self, field: &'static str, raw: &str) -> Result<u64, ConfigError> {
        raw.trim()
            .parse::<u64>()
            .map_err(|_| self.malformed(field, raw))
    }

    fn parse_required_u64(
        &self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Result<u64, ConfigError> {
        let Some(raw) = raw else {
            return Err(self.malformed(field, ""));
        };
        self.parse_u64(field, raw)
    }

    fn malformed(&self, field: &'static str, value: &str) -> ConfigError {
        ConfigError::MalformedValue {
            entry: self.name.clone(),
            field,
            value: value.to_string(),
        }
    }
}
