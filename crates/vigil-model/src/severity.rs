//! Alert severity levels.

use serde::{Deserialize, Serialize};

/// The severity level of an alert.
///
/// The declaration order is the escalation order: `Info < Warning < Error <
/// Critical`. [`Severity::Internal`] sits above all of them but is reserved
/// for control-plane lifecycle alerts and never produced by threshold
/// classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational alert, typically a resolution; no action required.
    Info,
    /// Warning alert, should be investigated.
    Warning,
    /// Error alert, a data-source or configuration fault.
    Error,
    /// Critical alert, requires immediate attention.
    Critical,
    /// Control-plane lifecycle alert; bypasses mute checks.
    Internal,
}

impl Severity {
    /// All severities, in escalation order.
    pub const ALL: [Self; 5] = [
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::Internal,
    ];

    /// Returns the severity as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Internal => "internal",
        }
    }

    /// Returns the priority of this severity (higher = more urgent).
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error => 3,
            Self::Critical => 4,
            Self::Internal => 5,
        }
    }

    /// Returns true for the control-plane lifecycle severity.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Parses a severity from its wire string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
