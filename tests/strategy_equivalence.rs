//! Wiring equivalence between the two assembly strategies.
//!
//! The recursive and priority-batch assemblers traverse the graph in
//! different orders, but for any graph and target they must produce
//! equivalent object graphs: the same shared instances reused in the
//! same places, and the same number of distinct fresh instances per
//! per-request module.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use armature::assembler::Strategy;
use armature::container::Container;
use armature::core::recipe::{Built, Instance, InstanceExt, Recipe};
use armature::core::types::{Lifecycle, ModuleId};

fn id(raw: &str) -> ModuleId {
    ModuleId::new(raw).unwrap()
}

/// A wired node that remembers which module produced it.
struct Node {
    label: String,
    inputs: Vec<Instance>,
}

fn node_recipe(label: &str, deps: &[&str]) -> Recipe {
    let label = label.to_string();
    let deps: Vec<ModuleId> = deps.iter().map(|d| id(d)).collect();
    Recipe::new(deps, move |inputs| {
        Ok(Built::ready(Node {
            label: label.clone(),
            inputs: inputs.to_vec(),
        }))
    })
}

fn build_container(strategy: Strategy, modules: &[(&str, &[&str], Lifecycle)]) -> Container {
    let mut container = Container::with_strategy(strategy);
    for (name, deps, lifecycle) in modules {
        container
            .declare(id(name), node_recipe(name, deps), *lifecycle)
            .unwrap();
    }
    container.seal().unwrap();
    container
}

/// Distinct instances per module label, over the whole object graph
/// hanging off `root`.
fn census(root: &Instance) -> HashMap<String, usize> {
    fn walk(instance: &Instance, seen: &mut HashMap<String, HashSet<*const ()>>) {
        let node = instance.downcast_arc::<Node>().expect("a Node instance");
        let pointer = Arc::as_ptr(instance) as *const ();
        if !seen.entry(node.label.clone()).or_default().insert(pointer) {
            return;
        }
        for input in &node.inputs {
            walk(input, seen);
        }
    }
    let mut seen = HashMap::new();
    walk(root, &mut seen);
    seen.into_iter()
        .map(|(label, pointers)| (label, pointers.len()))
        .collect()
}

/// The graphs both strategies are asked to agree on.
fn fixtures() -> Vec<Vec<(&'static str, &'static [&'static str], Lifecycle)>> {
    vec![
        // diamond, all shared
        vec![
            ("d", &[], Lifecycle::Shared),
            ("b", &["d"], Lifecycle::Shared),
            ("c", &["d"], Lifecycle::Shared),
            ("a", &["b", "c"], Lifecycle::Shared),
        ],
        // diamond, all fresh: d is built once per consumer
        vec![
            ("d", &[], Lifecycle::PerRequest),
            ("b", &["d"], Lifecycle::PerRequest),
            ("c", &["d"], Lifecycle::PerRequest),
            ("a", &["b", "c"], Lifecycle::PerRequest),
        ],
        // mixed: shared spine, fresh consumers
        vec![
            ("cfg", &[], Lifecycle::Shared),
            ("log", &["cfg"], Lifecycle::Shared),
            ("worker", &["cfg", "log"], Lifecycle::PerRequest),
            ("svc", &["worker", "worker", "log"], Lifecycle::PerRequest),
            ("a", &["svc", "worker"], Lifecycle::PerRequest),
        ],
        // deep chain alternating lifecycles
        vec![
            ("e", &[], Lifecycle::Shared),
            ("d", &["e"], Lifecycle::PerRequest),
            ("c", &["d", "e"], Lifecycle::Shared),
            ("b", &["c", "d"], Lifecycle::PerRequest),
            ("a", &["b", "b", "c"], Lifecycle::PerRequest),
        ],
    ]
}

#[test]
fn both_strategies_agree_on_instance_counts() {
    for modules in fixtures() {
        let batch = build_container(Strategy::PriorityBatch, &modules);
        let recursive = build_container(Strategy::Recursive, &modules);

        let target = id("a");
        let batch_census = census(&batch.get(&target).unwrap());
        let recursive_census = census(&recursive.get(&target).unwrap());
        assert_eq!(
            batch_census, recursive_census,
            "strategies disagree on {modules:?}"
        );
    }
}

#[test]
fn shared_modules_are_single_instances_under_both_strategies() {
    for modules in fixtures() {
        for strategy in [Strategy::PriorityBatch, Strategy::Recursive] {
            let container = build_container(strategy, &modules);
            let counts = census(&container.get(&id("a")).unwrap());
            for (name, _, lifecycle) in &modules {
                if lifecycle.is_shared() {
                    if let Some(count) = counts.get(*name) {
                        assert_eq!(
                            *count, 1,
                            "shared '{name}' must be one instance ({strategy:?})"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn fresh_diamond_multiplicity_matches_consumer_edges() {
    // d is consumed by b and c, once each: two distinct d's
    let modules = &[
        ("d", &[][..], Lifecycle::PerRequest),
        ("b", &["d"][..], Lifecycle::PerRequest),
        ("c", &["d"][..], Lifecycle::PerRequest),
        ("a", &["b", "c"][..], Lifecycle::PerRequest),
    ];
    for strategy in [Strategy::PriorityBatch, Strategy::Recursive] {
        let container = build_container(strategy, modules);
        let counts = census(&container.get(&id("a")).unwrap());
        assert_eq!(counts["d"], 2, "{strategy:?}");
        assert_eq!(counts["b"], 1, "{strategy:?}");
        assert_eq!(counts["c"], 1, "{strategy:?}");
    }
}

#[test]
fn pruning_changes_touched_modules_never_wiring() {
    // an expensive unrelated module sits low in the priority order;
    // only the unpruned baseline would touch it
    for strategy in [Strategy::PriorityBatch, Strategy::Recursive] {
        let touched = Arc::new(AtomicUsize::new(0));
        let mut container = Container::with_strategy(strategy);
        let counting = Arc::clone(&touched);
        container
            .declare(
                id("unrelated"),
                Recipe::leaf(move || {
                    counting.fetch_add(1, Ordering::SeqCst);
                    Ok(Built::ready(()))
                }),
                Lifecycle::PerRequest,
            )
            .unwrap();
        container
            .declare(id("leaf"), node_recipe("leaf", &[]), Lifecycle::PerRequest)
            .unwrap();
        container
            .declare(id("top"), node_recipe("top", &["leaf"]), Lifecycle::PerRequest)
            .unwrap();
        container.seal().unwrap();

        let top = container.get(&id("top")).unwrap();
        assert_eq!(
            touched.load(Ordering::SeqCst),
            0,
            "unrelated module was never built ({strategy:?})"
        );
        let counts = census(&top);
        assert_eq!(counts["top"], 1);
        assert_eq!(counts["leaf"], 1);
    }
}
