//! Typed ladder configurations.
//!
//! A ladder is one metric group's alerting policy for one chain. Three
//! shapes cover every group: plain thresholds, thresholds that must hold
//! for a time window, and a single severity for binary conditions. One
//! tagged union ([`LadderConfig`]) replaces per-group config types so the
//! registry and evaluator stay generic over groups.

use serde::{Deserialize, Serialize};
use vigil_model::Severity;

/// One rung of a threshold ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevel {
    /// The threshold crossed in the group's canonical direction.
    pub threshold: f64,
    /// Seconds between repeat alerts while this level stays held;
    /// `None` disables repeats for the level.
    pub repeat_seconds: Option<u64>,
}

/// Warning/critical thresholds for a monotone metric.
///
/// Either level may be absent; a ladder with both absent never alerts but
/// still tracks last values. When both are present the critical threshold
/// must be strictly more severe under the group's direction, which the
/// registry enforces at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    /// Whether this ladder is evaluated at all.
    pub enabled: bool,
    /// The warning rung.
    pub warning: Option<ThresholdLevel>,
    /// The critical rung.
    pub critical: Option<ThresholdLevel>,
}

impl ThresholdLadder {
    /// Returns the rung configured for `severity`, if any.
    ///
    /// Only `Warning` and `Critical` have rungs; other severities always
    /// yield `None`.
    #[must_use]
    pub const fn level(&self, severity: Severity) -> Option<ThresholdLevel> {
        match severity {
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
            Severity::Info | Severity::Error | Severity::Internal => None,
        }
    }
}

/// A threshold ladder whose condition must hold continuously for a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowLadder {
    /// Whether this ladder is evaluated at all.
    pub enabled: bool,
    /// The warning rung.
    pub warning: Option<ThresholdLevel>,
    /// The critical rung.
    pub critical: Option<ThresholdLevel>,
    /// Seconds the condition must hold before the first alert fires.
    pub time_window_seconds: u64,
}

impl TimeWindowLadder {
    /// Returns the plain threshold view of this ladder, used once the
    /// window has been served.
    #[must_use]
    pub const fn as_threshold(&self) -> ThresholdLadder {
        ThresholdLadder {
            enabled: self.enabled,
            warning: self.warning,
            critical: self.critical,
        }
    }
}

/// A single configured severity for a binary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityLadder {
    /// Whether this ladder is evaluated at all.
    pub enabled: bool,
    /// The severity fired when the condition becomes true.
    pub severity: Severity,
}

/// One metric group's alerting policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LadderConfig {
    /// Monotone thresholds over the raw value.
    Threshold(ThresholdLadder),
    /// Thresholds that must hold for a continuous window.
    TimeWindow(TimeWindowLadder),
    /// A single severity for a binary condition.
    Severity(SeverityLadder),
}

impl LadderConfig {
    /// Returns whether the ladder participates in evaluation.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::Threshold(ladder) => ladder.enabled,
            Self::TimeWindow(ladder) => ladder.enabled,
            Self::Severity(ladder) => ladder.enabled,
        }
    }
}
