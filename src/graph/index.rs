//! graph::index
//!
//! The ascending-priority construction order.
//!
//! # Guarantee
//!
//! When a module is processed in index order, every module it depends
//! on (directly or transitively) has already been processed: a module's
//! priority strictly exceeds each direct dependency's priority, and the
//! sort is ascending. Ties keep declaration order, so the full ordering
//! is deterministic.

use std::collections::HashMap;

use crate::core::errors::ContainerError;
use crate::core::table::ModuleTable;
use crate::core::types::{Lifecycle, ModuleId};

/// One module's place in the construction order.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    id: ModuleId,
    priority: usize,
    lifecycle: Lifecycle,
}

impl IndexEntry {
    /// The module's id.
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// The module's distinct transitive dependency count.
    pub fn priority(&self) -> usize {
        self.priority
    }

    /// The module's lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

/// All declared modules, ascending by priority.
#[derive(Debug, Default)]
pub struct PriorityIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<ModuleId, usize>,
}

impl PriorityIndex {
    /// Build the index from a table and its computed priorities.
    ///
    /// # Errors
    ///
    /// Returns `ModuleNotFound` if the priority map is missing a
    /// declared module (a defensive invariant; the counter computes a
    /// priority for every record).
    pub fn build(
        table: &ModuleTable,
        priorities: &HashMap<ModuleId, usize>,
    ) -> Result<Self, ContainerError> {
        let mut entries = Vec::with_capacity(table.len());
        for record in table.iter() {
            let priority = *priorities
                .get(record.id())
                .ok_or_else(|| ContainerError::not_found(record.id(), "the priority map"))?;
            entries.push(IndexEntry {
                id: record.id().clone(),
                priority,
                lifecycle: record.lifecycle(),
            });
        }
        // stable sort: entries arrive in declaration order, which is
        // therefore the tiebreak
        entries.sort_by_key(IndexEntry::priority);

        let positions = entries
            .iter()
            .enumerate()
            .map(|(at, entry)| (entry.id.clone(), at))
            .collect();
        Ok(Self { entries, positions })
    }

    /// All entries, ascending by priority.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// A module's position in the order.
    pub fn position(&self, id: &ModuleId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// A module's priority.
    pub fn priority_of(&self, id: &ModuleId) -> Option<usize> {
        self.position(id).map(|at| self.entries[at].priority)
    }

    /// The order prefix up to and including `id`.
    pub fn prefix_through(&self, id: &ModuleId) -> Option<&[IndexEntry]> {
        self.position(id).map(|at| &self.entries[..=at])
    }

    /// Number of indexed modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
