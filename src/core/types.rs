//! core::types
//!
//! Strong types for container domain concepts.
//!
//! # Types
//!
//! - [`ModuleId`] - Validated capability identifier
//! - [`Lifecycle`] - Shared singleton vs. fresh per request
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use armature::core::types::{Lifecycle, ModuleId};
//!
//! // Valid constructions
//! let id = ModuleId::new("storage.pool").unwrap();
//! assert_eq!(id.as_str(), "storage.pool");
//! assert!(Lifecycle::Shared.is_shared());
//!
//! // Invalid constructions fail at creation time
//! assert!(ModuleId::new("").is_err());
//! assert!(ModuleId::new("has space").is_err());
//! assert!(ModuleId::new("trailing.").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ContainerError;

/// A validated module capability identifier.
///
/// Ids are opaque to the engine; the only structure enforced is that an
/// id reads as a sane dotted path:
/// - Cannot be empty
/// - Cannot contain whitespace or ASCII control characters
/// - Cannot start or end with `.`
/// - Cannot contain an empty `..` segment
///
/// # Example
///
/// ```
/// use armature::core::types::ModuleId;
///
/// let id = ModuleId::new("auth.token_store").unwrap();
/// assert_eq!(id.as_str(), "auth.token_store");
///
/// assert!(ModuleId::new(".hidden").is_err());
/// assert!(ModuleId::new("a..b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a new validated module id.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::Declaration` if the id is malformed.
    pub fn new(id: impl Into<String>) -> Result<Self, ContainerError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), ContainerError> {
        if id.is_empty() {
            return Err(ContainerError::Declaration(
                "module id cannot be empty".into(),
            ));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ContainerError::Declaration(format!(
                "module id '{}' cannot contain whitespace or control characters",
                id.escape_default()
            )));
        }
        if id.starts_with('.') || id.ends_with('.') {
            return Err(ContainerError::Declaration(format!(
                "module id '{id}' cannot start or end with '.'"
            )));
        }
        if id.contains("..") {
            return Err(ContainerError::Declaration(format!(
                "module id '{id}' cannot contain an empty '..' segment"
            )));
        }
        Ok(())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ModuleId {
    type Error = ContainerError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ModuleId> for String {
    fn from(id: ModuleId) -> String {
        id.0
    }
}

/// How long one built instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    /// Exactly one instance for the container's lifetime, built eagerly
    /// at seal time and cached.
    Shared,
    /// A fresh instance per request. Its own dependencies still obey
    /// their own lifecycles.
    PerRequest,
}

impl Lifecycle {
    /// Whether this lifecycle caches a single instance.
    pub fn is_shared(self) -> bool {
        matches!(self, Lifecycle::Shared)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Shared => f.write_str("shared"),
            Lifecycle::PerRequest => f.write_str("per-request"),
        }
    }
}
