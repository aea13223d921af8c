//! assembler
//!
//! Strategies that turn a sealed module graph into wired instances.
//!
//! # Strategies
//!
//! - [`recursive`] - Depth-first, singleton-cache-aware recursion
//! - [`priority_batch`] - One linear pass over a pruned,
//!   priority-sorted prefix (the default)
//!
//! Both produce equivalent wiring for the same graph and target: the
//! same shared reuse and the same per-request multiplicity. They differ
//! only in traversal shape.
//!
//! # Invariants
//!
//! - Strategies hold no state of their own; all in-flight bookkeeping
//!   is local to one `assemble` call, so concurrent requests cannot
//!   corrupt each other
//! - Strategies never write to the singleton cache; the container owns
//!   cache population during sealing

pub mod priority_batch;
pub mod recursive;

pub use priority_batch::PriorityBatchAssembler;
pub use recursive::RecursiveAssembler;

use crate::container::SingletonCache;
use crate::core::errors::ContainerError;
use crate::core::recipe::Instance;
use crate::core::table::{ModuleRecord, ModuleTable};
use crate::core::types::ModuleId;
use crate::graph::PriorityIndex;

/// Borrowed view of the sealed world handed to a strategy.
pub struct AssemblyContext<'a> {
    /// The finished module table.
    pub table: &'a ModuleTable,
    /// The ascending construction order.
    pub index: &'a PriorityIndex,
    /// Instances of shared modules built so far.
    pub singletons: &'a SingletonCache,
}

/// A strategy converting a recipe graph into wired instances.
pub trait Assembler: Send + Sync {
    /// Build a fully wired instance of `target`.
    fn assemble(
        &self,
        target: &ModuleId,
        ctx: &AssemblyContext<'_>,
    ) -> Result<Instance, ContainerError>;
}

/// Which assembler a container uses. Fixed before sealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Depth-first recursive assembly.
    Recursive,
    /// Linear ascending-priority assembly.
    #[default]
    PriorityBatch,
}

impl Strategy {
    pub(crate) fn assembler(self) -> &'static dyn Assembler {
        match self {
            Strategy::Recursive => &RecursiveAssembler,
            Strategy::PriorityBatch => &PriorityBatchAssembler,
        }
    }
}

/// Look up a record, translating absence into the defensive invariant
/// error.
pub(crate) fn record_of<'a>(
    ctx: &AssemblyContext<'a>,
    id: &ModuleId,
    context: &str,
) -> Result<&'a ModuleRecord, ContainerError> {
    ctx.table
        .get(id)
        .ok_or_else(|| ContainerError::not_found(id, context))
}

/// Invoke a recipe with resolved inputs, collapsing a deferred builder
/// and tagging any failure with the originating module id.
pub(crate) fn invoke_recipe(
    record: &ModuleRecord,
    inputs: &[Instance],
) -> Result<Instance, ContainerError> {
    record
        .recipe()
        .invoke(inputs)
        .map_err(|source| ContainerError::Instantiation {
            module: record.id().clone(),
            source,
        })
}
