//! assembler::priority_batch
//!
//! Linear ascending-priority assembly.
//!
//! # Algorithm
//!
//! One `assemble` call makes a single forward pass instead of
//! recursing:
//!
//! 1. **Prune** ("reverse check"): grow a worklist from the target,
//!    expanding each per-request member and each not-yet-cached shared
//!    member into its direct dependencies. A cached shared member is
//!    reused verbatim, so expansion stops there. A per-request module
//!    is pushed once per consumer edge: every occurrence in the list is
//!    one fresh instance the walk must produce.
//! 2. **Sort** the pruned list back into index order; every dependency
//!    then precedes its consumers.
//! 3. **Walk** ascending. Cached shared entries are skipped. Everything
//!    else is built, pulling shared inputs from the singleton cache and
//!    per-request inputs from that id's FIFO queue of instances
//!    produced earlier in the walk, one per use. Every freshly built
//!    instance, the target's included, is enqueued under its own id.
//! 4. **Pop** the target's queue.
//!
//! The pruning in step 1 bounds the pass to the target's actual
//! dependency footprint instead of the full priority-ordered prefix; it
//! changes which modules are touched, never the resulting wiring.
//!
//! # Invariants
//!
//! - The queues live in a per-call `Walk` value, never in the
//!   assembler, so concurrent requests cannot see each other's scratch
//!   state
//! - A missing queue or cache entry mid-walk is `ModuleNotFound`:
//!   broken internal bookkeeping, not a user error

use std::collections::{HashMap, HashSet, VecDeque};

use super::{invoke_recipe, record_of, Assembler, AssemblyContext};
use crate::core::errors::ContainerError;
use crate::core::recipe::Instance;
use crate::core::table::ModuleRecord;
use crate::core::types::ModuleId;

/// The linear-pass strategy.
#[derive(Debug, Default)]
pub struct PriorityBatchAssembler;

impl Assembler for PriorityBatchAssembler {
    fn assemble(
        &self,
        target: &ModuleId,
        ctx: &AssemblyContext<'_>,
    ) -> Result<Instance, ContainerError> {
        let order = self.pruned_order(target, ctx)?;
        let mut walk = Walk::default();
        for id in &order {
            let record = record_of(ctx, id, "the pruned construction order")?;
            if record.lifecycle().is_shared() && ctx.singletons.contains(id) {
                continue;
            }
            let instance = self.build(record, ctx, &mut walk)?;
            walk.enqueue(record.id().clone(), instance);
        }
        walk.dequeue(target)
            .ok_or_else(|| ContainerError::not_found(target, "the walk's own queue after the pass"))
    }
}

impl PriorityBatchAssembler {
    /// The reverse check: the minimal multiset of modules this request
    /// has to touch, sorted into index order.
    ///
    /// Shared modules appear at most once (one instance serves every
    /// consumer); per-request modules appear once per consumer edge,
    /// including edges from other per-request occurrences, so the walk
    /// produces exactly as many fresh instances as the request consumes.
    fn pruned_order(
        &self,
        target: &ModuleId,
        ctx: &AssemblyContext<'_>,
    ) -> Result<Vec<ModuleId>, ContainerError> {
        let mut needed: Vec<ModuleId> = vec![target.clone()];
        let mut seen_shared: HashSet<ModuleId> = HashSet::new();
        if record_of(ctx, target, "the module table")?.lifecycle().is_shared() {
            seen_shared.insert(target.clone());
        }

        let mut at = 0;
        while at < needed.len() {
            let current = needed[at].clone();
            at += 1;
            let record = record_of(ctx, &current, "the module table during the reverse check")?;
            if record.lifecycle().is_shared() && ctx.singletons.contains(&current) {
                // reused verbatim; its dependencies were consumed when
                // the cache entry was built
                continue;
            }
            for dependency in record.recipe().dependencies() {
                let dep_record = record_of(ctx, dependency, "the module table during the reverse check")?;
                if dep_record.lifecycle().is_shared() {
                    if seen_shared.insert(dependency.clone()) {
                        needed.push(dependency.clone());
                    }
                } else {
                    needed.push(dependency.clone());
                }
            }
        }

        // back into index order; the sort is stable, so duplicate
        // per-request occurrences stay adjacent
        let mut order: Vec<(usize, ModuleId)> = Vec::with_capacity(needed.len());
        for id in needed {
            let position = ctx
                .index
                .position(&id)
                .ok_or_else(|| ContainerError::not_found(&id, "the priority index"))?;
            order.push((position, id));
        }
        order.sort_by_key(|(position, _)| *position);
        Ok(order.into_iter().map(|(_, id)| id).collect())
    }

    /// Build one module from inputs produced earlier in the walk.
    fn build(
        &self,
        record: &ModuleRecord,
        ctx: &AssemblyContext<'_>,
        walk: &mut Walk,
    ) -> Result<Instance, ContainerError> {
        let dependencies = record.recipe().dependencies();
        let mut inputs = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let dep_record = record_of(ctx, dependency, "the module table")?;
            let instance = if dep_record.lifecycle().is_shared() {
                // cache first; a shared module built earlier in this
                // same walk (the seal-time target) sits in its queue
                ctx.singletons
                    .get(dependency)
                    .or_else(|| walk.shared_front(dependency))
                    .ok_or_else(|| {
                        ContainerError::not_found(dependency, "the singleton cache")
                    })?
            } else {
                walk.dequeue(dependency).ok_or_else(|| {
                    ContainerError::not_found(dependency, "the fresh-instance queue")
                })?
            };
            inputs.push(instance);
        }
        invoke_recipe(record, &inputs)
    }
}

/// Call-local bookkeeping for one pass: per-id FIFO queues of freshly
/// built instances.
#[derive(Default)]
struct Walk {
    queues: HashMap<ModuleId, VecDeque<Instance>>,
}

impl Walk {
    fn enqueue(&mut self, id: ModuleId, instance: Instance) {
        self.queues.entry(id).or_default().push_back(instance);
    }

    fn dequeue(&mut self, id: &ModuleId) -> Option<Instance> {
        self.queues.get_mut(id)?.pop_front()
    }

    /// A shared instance is handed to every consumer, so reading one
    /// from the walk does not consume it.
    fn shared_front(&self, id: &ModuleId) -> Option<Instance> {
        self.queues.get(id)?.front().cloned()
    }
}
