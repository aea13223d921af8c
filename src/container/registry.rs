//! container::registry
//!
//! An explicit, application-owned registry of named containers.
//!
//! There is deliberately no process-global registry: a name→container
//! map with static lifetime is shared mutable state that outlives its
//! users. The registry here is a plain value; whoever owns it decides
//! when it is created and torn down.

use std::collections::HashMap;

use thiserror::Error;

use super::Container;

/// Errors from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A container is already registered under this name.
    #[error("container '{0}' is already registered")]
    Duplicate(String),
}

/// Named containers, owned by the application.
///
/// # Example
///
/// ```
/// use armature::container::{Container, ContainerRegistry};
///
/// let mut registry = ContainerRegistry::new();
/// registry.insert("app", Container::new()).unwrap();
/// assert!(registry.get("app").is_some());
/// assert!(registry.insert("app", Container::new()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: HashMap<String, Container>,
}

impl ContainerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container under a unique name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` if the name is taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        container: Container,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.containers.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.containers.insert(name, container);
        Ok(())
    }

    /// Look up a container by name.
    pub fn get(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    /// Look up a container by name, mutably (for declaration and
    /// sealing).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.get_mut(name)
    }

    /// Remove and return a container.
    pub fn remove(&mut self, name: &str) -> Option<Container> {
        self.containers.remove(name)
    }

    /// Drop every registered container.
    pub fn clear(&mut self) {
        self.containers.clear();
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// Number of registered containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut registry = ContainerRegistry::new();
        registry.insert("app", Container::new()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("app").is_some());
        assert!(registry.get("other").is_none());
        assert!(registry.remove("app").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ContainerRegistry::new();
        registry.insert("app", Container::new()).unwrap();
        let err = registry.insert("app", Container::new()).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("app".into()));
    }

    #[test]
    fn clear_tears_everything_down() {
        let mut registry = ContainerRegistry::new();
        registry.insert("a", Container::new()).unwrap();
        registry.insert("b", Container::new()).unwrap();
        registry.clear();
        assert!(registry.is_empty());
    }
}
