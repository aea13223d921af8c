//! graph
//!
//! Dependency graph analysis.
//!
//! # Architecture
//!
//! Sealing runs this layer over the finished module table:
//!
//! 1. **Count**: [`counter`] computes each module's priority, the size of
//!    its distinct transitive dependency closure, detecting cycles and
//!    undeclared references along the way
//! 2. **Order**: [`index`] sorts all modules ascending by priority, so
//!    that every module appears after everything it depends on
//!
//! # Invariants
//!
//! - Priorities count distinct reachable modules, not paths: diamonds are
//!   never double-counted
//! - A module's priority is strictly greater than the priority of each of
//!   its direct dependencies
//! - Analysis never invokes a factory

pub mod counter;
pub mod index;

pub use counter::DependencyCounter;
pub use index::{IndexEntry, PriorityIndex};
