//! assembler::recursive
//!
//! Depth-first, singleton-cache-aware assembly.
//!
//! For each dependency of the module being built: a shared dependency
//! with a cached instance is reused as-is; anything else is built by
//! recursing. Recursion depth is bounded by the dependency graph's
//! depth, which acyclicity keeps finite.

use super::{invoke_recipe, record_of, Assembler, AssemblyContext};
use crate::core::errors::ContainerError;
use crate::core::recipe::Instance;
use crate::core::table::ModuleRecord;
use crate::core::types::ModuleId;

/// The recursive strategy.
#[derive(Debug, Default)]
pub struct RecursiveAssembler;

impl Assembler for RecursiveAssembler {
    fn assemble(
        &self,
        target: &ModuleId,
        ctx: &AssemblyContext<'_>,
    ) -> Result<Instance, ContainerError> {
        let record = record_of(ctx, target, "the module table")?;
        self.build(record, ctx)
    }
}

impl RecursiveAssembler {
    fn build(
        &self,
        record: &ModuleRecord,
        ctx: &AssemblyContext<'_>,
    ) -> Result<Instance, ContainerError> {
        let dependencies = record.recipe().dependencies();
        let mut inputs = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let dep_record = record_of(ctx, dependency, "the module table")?;
            let instance = if dep_record.lifecycle().is_shared() {
                match ctx.singletons.get(dependency) {
                    Some(cached) => cached,
                    // not cached yet: only possible mid-seal, while the
                    // container builds shared modules in ascending order
                    None => self.build(dep_record, ctx)?,
                }
            } else {
                self.build(dep_record, ctx)?
            };
            inputs.push(instance);
        }
        invoke_recipe(record, &inputs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::container::SingletonCache;
    use crate::core::recipe::{Built, InstanceExt, Recipe};
    use crate::core::table::ModuleTable;
    use crate::core::types::Lifecycle;
    use crate::graph::{DependencyCounter, PriorityIndex};

    fn id(raw: &str) -> ModuleId {
        ModuleId::new(raw).unwrap()
    }

    struct Node {
        inputs: Vec<Instance>,
    }

    fn node_recipe(deps: &[&str]) -> Recipe {
        let deps: Vec<ModuleId> = deps.iter().map(|d| id(d)).collect();
        Recipe::new(deps, |inputs| {
            Ok(Built::ready(Node {
                inputs: inputs.to_vec(),
            }))
        })
    }

    fn world(modules: &[(&str, &[&str], Lifecycle)]) -> (ModuleTable, PriorityIndex) {
        let mut table = ModuleTable::new();
        for (name, deps, lifecycle) in modules {
            table
                .declare(crate::core::table::ModuleRecord::new(
                    id(name),
                    node_recipe(deps),
                    *lifecycle,
                ))
                .unwrap();
        }
        let priorities = DependencyCounter::new(&table).priorities().unwrap();
        let index = PriorityIndex::build(&table, &priorities).unwrap();
        (table, index)
    }

    #[test]
    fn builds_leaves_then_consumers() {
        let (table, index) = world(&[
            ("leaf", &[], Lifecycle::PerRequest),
            ("top", &["leaf"], Lifecycle::PerRequest),
        ]);
        let singletons = SingletonCache::new();
        let ctx = AssemblyContext {
            table: &table,
            index: &index,
            singletons: &singletons,
        };

        let top = RecursiveAssembler.assemble(&id("top"), &ctx).unwrap();
        let top = top.downcast_arc::<Node>().unwrap();
        assert_eq!(top.inputs.len(), 1);
        assert!(top.inputs[0].downcast_arc::<Node>().is_some());
    }

    #[test]
    fn cached_shared_dependency_is_reused_not_rebuilt() {
        let builds = Arc::new(AtomicUsize::new(0));
        let mut table = ModuleTable::new();
        let counting = Arc::clone(&builds);
        table
            .declare(crate::core::table::ModuleRecord::new(
                id("base"),
                Recipe::leaf(move || {
                    counting.fetch_add(1, Ordering::SeqCst);
                    Ok(Built::ready(()))
                }),
                Lifecycle::Shared,
            ))
            .unwrap();
        table
            .declare(crate::core::table::ModuleRecord::new(
                id("top"),
                node_recipe(&["base"]),
                Lifecycle::PerRequest,
            ))
            .unwrap();
        let priorities = DependencyCounter::new(&table).priorities().unwrap();
        let index = PriorityIndex::build(&table, &priorities).unwrap();

        let mut singletons = SingletonCache::new();
        let base: Instance = Arc::new(());
        singletons.insert(id("base"), Arc::clone(&base));

        let ctx = AssemblyContext {
            table: &table,
            index: &index,
            singletons: &singletons,
        };
        let top = RecursiveAssembler.assemble(&id("top"), &ctx).unwrap();
        let top = top.downcast_arc::<Node>().unwrap();
        assert!(Arc::ptr_eq(&top.inputs[0], &base));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn factory_failure_is_tagged_with_the_module() {
        let mut table = ModuleTable::new();
        table
            .declare(crate::core::table::ModuleRecord::new(
                id("broken"),
                Recipe::leaf(|| Err(anyhow::anyhow!("boom"))),
                Lifecycle::PerRequest,
            ))
            .unwrap();
        let priorities = DependencyCounter::new(&table).priorities().unwrap();
        let index = PriorityIndex::build(&table, &priorities).unwrap();
        let singletons = SingletonCache::new();
        let ctx = AssemblyContext {
            table: &table,
            index: &index,
            singletons: &singletons,
        };

        match RecursiveAssembler.assemble(&id("broken"), &ctx).unwrap_err() {
            ContainerError::Instantiation { module, source } => {
                assert_eq!(module, id("broken"));
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("expected an instantiation error, got {other:?}"),
        }
    }
}
