//! Validated identifier newtypes shared across the platform.
//!
//! Identifiers arrive from the upstream monitors and config manager as opaque
//! strings; these wrappers validate them once at the boundary so the rest of
//! the engine can trust them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier was empty.
    #[error("identifier cannot be empty")]
    Empty,

    /// The identifier exceeded the maximum length.
    #[error("identifier exceeds maximum length of {max} characters (got {len})")]
    TooLong {
        /// The maximum allowed length.
        max: usize,
        /// The actual length.
        len: usize,
    },
}

/// Maximum length for any identifier string.
pub const MAX_ID_LENGTH: usize = 256;

fn validate(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong {
            max: MAX_ID_LENGTH,
            len: id.len(),
        });
    }
    Ok(())
}

/// Identifies one monitored entity (a node, system, contract, or repository
/// watched by a monitor). Used as the state-store and dispatch shard key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginId(String);

impl OriginId {
    /// Creates a new origin identifier after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the identifier is empty or too long.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OriginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OriginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The chain/grouping key under which a monitored entity's configuration and
/// mute scope are organized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentId(String);

impl ParentId {
    /// Creates a new parent identifier after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the identifier is empty or too long.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ParentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifies a configured notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Creates a new channel identifier after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the identifier is empty or too long.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
