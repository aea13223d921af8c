//! container::cache
//!
//! Shared-instance storage.
//!
//! Populated only while the container seals: every shared module gets
//! exactly one entry, built in ascending priority order. Logically
//! immutable afterward, so post-seal reads are safe for concurrent
//! callers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::recipe::Instance;
use crate::core::types::ModuleId;

/// id → instance for every shared module.
#[derive(Default)]
pub struct SingletonCache {
    instances: HashMap<ModuleId, Instance>,
}

impl SingletonCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: ModuleId, instance: Instance) {
        self.instances.insert(id, instance);
    }

    /// The cached instance for `id`, if one was built.
    pub fn get(&self, id: &ModuleId) -> Option<Instance> {
        self.instances.get(id).map(Arc::clone)
    }

    /// Whether `id` has a cached instance.
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.instances.contains_key(id)
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl fmt::Debug for SingletonCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.instances.keys()).finish()
    }
}
