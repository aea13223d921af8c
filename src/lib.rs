//! Armature - a priority-ordered dependency injection container
//!
//! Armature assembles applications from explicitly declared modules. Each
//! module is an opaque capability id, a build recipe (an ordered dependency
//! list plus a factory), and a lifecycle: shared singleton or fresh per
//! request. Before serving anything, the container verifies the whole
//! dependency graph and computes a safe construction order from each
//! module's count of distinct transitive dependencies (its "priority").
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types: ids, lifecycles, recipes, the module table,
//!   and the error taxonomy
//! - [`graph`] - Dependency analysis: priority counting and the ascending
//!   construction order
//! - [`assembler`] - Interchangeable strategies that turn a sealed graph
//!   into wired instances
//! - [`container`] - The sealing state machine, singleton cache, and the
//!   application-owned container registry
//!
//! # Correctness Invariants
//!
//! Armature maintains the following invariants:
//!
//! 1. Every dependency referenced by any recipe is a declared module
//! 2. No module reaches itself through its own dependency closure, at any
//!    depth
//! 3. Every direct dependency of a module has strictly smaller priority
//!    than the module itself
//! 4. After sealing, exactly one cached instance exists per shared module
//!    and none for per-request modules
//!
//! # Example
//!
//! ```
//! use armature::container::Container;
//! use armature::core::recipe::{Built, InstanceExt, Recipe};
//! use armature::core::types::{Lifecycle, ModuleId};
//!
//! struct Config { url: String }
//! struct Pool { config: std::sync::Arc<Config> }
//!
//! # fn main() -> Result<(), armature::core::errors::ContainerError> {
//! let config = ModuleId::new("app.config")?;
//! let pool = ModuleId::new("app.pool")?;
//!
//! let mut container = Container::new();
//! container.declare(
//!     config.clone(),
//!     Recipe::leaf(|| Ok(Built::ready(Config { url: "localhost".into() }))),
//!     Lifecycle::Shared,
//! )?;
//! container.declare(
//!     pool.clone(),
//!     Recipe::new(vec![config.clone()], |deps| {
//!         let config = deps[0].downcast_arc::<Config>().expect("config instance");
//!         Ok(Built::ready(Pool { config }))
//!     }),
//!     Lifecycle::Shared,
//! )?;
//! container.seal()?;
//!
//! let pool = container.get(&pool)?.downcast_arc::<Pool>().expect("pool instance");
//! assert_eq!(pool.config.url, "localhost");
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod container;
pub mod core;
pub mod graph;
