//! core::table
//!
//! The declaration-ordered module table.
//!
//! # Invariants
//!
//! - One record per id; duplicate declarations are rejected
//! - Iteration order is declaration order (the stable tiebreak for the
//!   priority index)
//! - The table never changes after the container seals

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::ContainerError;
use super::recipe::Recipe;
use super::types::{Lifecycle, ModuleId};

/// A declared module. All fields are fixed at declaration time.
#[derive(Debug)]
pub struct ModuleRecord {
    id: ModuleId,
    recipe: Recipe,
    lifecycle: Lifecycle,
}

impl ModuleRecord {
    /// Bundle an id, its build recipe, and its lifecycle.
    pub fn new(id: ModuleId, recipe: Recipe, lifecycle: Lifecycle) -> Self {
        Self {
            id,
            recipe,
            lifecycle,
        }
    }

    /// The module's capability id.
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// The module's build recipe.
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// The module's lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

/// The serializable half of a declaration: id plus lifecycle.
///
/// Declaration/loading layers ship module tables as manifest data; the
/// recipe is attached programmatically, since factories do not
/// serialize.
///
/// # Example
///
/// ```
/// use armature::core::table::ModuleManifest;
///
/// let manifest: ModuleManifest =
///     serde_json::from_str(r#"{"id": "db.pool", "lifecycle": "shared"}"#).unwrap();
/// assert_eq!(manifest.id.as_str(), "db.pool");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// The declared capability id.
    pub id: ModuleId,
    /// The declared lifecycle.
    pub lifecycle: Lifecycle,
}

/// Module records keyed by id, kept in declaration order.
#[derive(Debug, Default)]
pub struct ModuleTable {
    records: Vec<ModuleRecord>,
    index: HashMap<ModuleId, usize>,
}

impl ModuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::Declaration` if the id is already
    /// declared.
    pub fn declare(&mut self, record: ModuleRecord) -> Result<(), ContainerError> {
        if self.index.contains_key(record.id()) {
            return Err(ContainerError::Declaration(format!(
                "module '{}' is already declared",
                record.id()
            )));
        }
        self.index.insert(record.id().clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Look up a record by id.
    pub fn get(&self, id: &ModuleId) -> Option<&ModuleRecord> {
        self.index.get(id).map(|&at| &self.records[at])
    }

    /// Whether an id is declared.
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.index.contains_key(id)
    }

    /// The lifecycle of a declared module.
    pub fn lifecycle_of(&self, id: &ModuleId) -> Option<Lifecycle> {
        self.get(id).map(ModuleRecord::lifecycle)
    }

    /// Number of declared modules.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::Built;

    fn id(raw: &str) -> ModuleId {
        ModuleId::new(raw).unwrap()
    }

    fn record(raw: &str, lifecycle: Lifecycle) -> ModuleRecord {
        ModuleRecord::new(id(raw), Recipe::leaf(|| Ok(Built::ready(()))), lifecycle)
    }

    #[test]
    fn declare_and_look_up() {
        let mut table = ModuleTable::new();
        table.declare(record("a", Lifecycle::Shared)).unwrap();
        table.declare(record("b", Lifecycle::PerRequest)).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.contains(&id("a")));
        assert_eq!(table.lifecycle_of(&id("b")), Some(Lifecycle::PerRequest));
        assert!(table.get(&id("c")).is_none());
    }

    #[test]
    fn duplicate_declaration_is_rejected() {
        let mut table = ModuleTable::new();
        table.declare(record("a", Lifecycle::Shared)).unwrap();
        let err = table.declare(record("a", Lifecycle::PerRequest)).unwrap_err();
        assert!(matches!(err, ContainerError::Declaration(_)));
        // the original record survives
        assert_eq!(table.lifecycle_of(&id("a")), Some(Lifecycle::Shared));
    }

    #[test]
    fn iteration_keeps_declaration_order() {
        let mut table = ModuleTable::new();
        for raw in ["z", "m", "a"] {
            table.declare(record(raw, Lifecycle::Shared)).unwrap();
        }
        let order: Vec<&str> = table.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(order, vec!["z", "m", "a"]);
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let manifest = ModuleManifest {
            id: id("db.pool"),
            lifecycle: Lifecycle::PerRequest,
        };
        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: ModuleManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
