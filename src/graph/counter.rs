//! graph::counter
//!
//! Distinct transitive dependency counting.
//!
//! # Algorithm
//!
//! A module's priority is the number of distinct modules reachable from
//! its direct dependencies, the module itself excluded. The walk is
//! breadth-first over a growing distinct-id set: every dequeued id is
//! compared against the origin (a match at any depth is a cycle, not
//! just at the immediate hop) and looked up in the table (a miss is an
//! undeclared reference, reported with the edge that named it).
//!
//! # Invariants
//!
//! - Diamond-shaped shared dependencies count once
//! - priority(m) = 0 iff m takes no dependencies
//! - priority(m) > priority(d) for every direct dependency d of m,
//!   given acyclicity

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::errors::ContainerError;
use crate::core::table::ModuleTable;
use crate::core::types::ModuleId;

/// Computes module priorities over a finished table.
pub struct DependencyCounter<'a> {
    table: &'a ModuleTable,
}

impl<'a> DependencyCounter<'a> {
    /// Borrow a table for analysis.
    pub fn new(table: &'a ModuleTable) -> Self {
        Self { table }
    }

    /// The priority of one module: the size of its distinct transitive
    /// dependency closure, excluding the module itself.
    ///
    /// # Errors
    ///
    /// - `CyclicDependency` if the closure contains the module itself
    /// - `UndeclaredDependency` if any reached id is not declared
    pub fn priority_of(&self, origin: &ModuleId) -> Result<usize, ContainerError> {
        Ok(self.closure_of(origin)?.len())
    }

    /// Priorities for every declared module.
    pub fn priorities(&self) -> Result<HashMap<ModuleId, usize>, ContainerError> {
        let mut priorities = HashMap::with_capacity(self.table.len());
        for record in self.table.iter() {
            priorities.insert(record.id().clone(), self.priority_of(record.id())?);
        }
        Ok(priorities)
    }

    /// The distinct set of modules reachable from `origin`'s direct
    /// dependencies.
    fn closure_of(&self, origin: &ModuleId) -> Result<HashSet<ModuleId>, ContainerError> {
        let record = self
            .table
            .get(origin)
            .ok_or_else(|| ContainerError::not_found(origin, "the module table"))?;

        // zero-dependency modules short-circuit to an empty closure
        if record.recipe().dependencies().is_empty() {
            return Ok(HashSet::new());
        }

        let mut reached: HashSet<ModuleId> = HashSet::new();
        // (reached id, the module whose recipe named it)
        let mut frontier: VecDeque<(ModuleId, ModuleId)> = VecDeque::new();
        for dependency in record.recipe().dependencies() {
            frontier.push_back((dependency.clone(), origin.clone()));
        }

        while let Some((current, via)) = frontier.pop_front() {
            if current == *origin {
                return Err(ContainerError::CyclicDependency {
                    module: origin.clone(),
                    via,
                });
            }
            let Some(current_record) = self.table.get(&current) else {
                return Err(ContainerError::UndeclaredDependency {
                    module: via,
                    dependency: current,
                });
            };
            if !reached.insert(current.clone()) {
                continue;
            }
            for dependency in current_record.recipe().dependencies() {
                frontier.push_back((dependency.clone(), current.clone()));
            }
        }

        Ok(reached)
    }
}
