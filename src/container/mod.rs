//! container
//!
//! The sealing state machine and instance serving.
//!
//! # Lifecycle
//!
//! ```text
//! Open --seal()--> Sealed
//!   \
//!    `--failed seal--> Poisoned
//! ```
//!
//! A container accepts declarations while open, seals exactly once, and
//! serves instances afterward. Sealing is atomic: it verifies the whole
//! dependency graph, computes the construction order, and eagerly
//! builds every shared module in ascending priority; any failure leaves
//! the container poisoned with no partially-sealed state observable.
//!
//! # Invariants
//!
//! - Declarations are accepted only while open, and only in one mode
//!   (incremental or manifest) per container
//! - After sealing, the singleton cache holds exactly one entry per
//!   shared module and none for per-request modules
//! - `get` never mutates the container; per-request assembly keeps its
//!   bookkeeping call-local, so concurrent `get` calls are safe
//!
//! # Example
//!
//! ```
//! use armature::container::Container;
//! use armature::core::recipe::{Built, Recipe};
//! use armature::core::types::{Lifecycle, ModuleId};
//!
//! # fn main() -> Result<(), armature::core::errors::ContainerError> {
//! let clock = ModuleId::new("clock")?;
//! let mut container = Container::new();
//! container.declare(
//!     clock.clone(),
//!     Recipe::leaf(|| Ok(Built::ready("tick".to_string()))),
//!     Lifecycle::Shared,
//! )?;
//! container.seal()?;
//! assert!(container.is_sealed());
//! let first = container.get(&clock)?;
//! let second = container.get(&clock)?;
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod registry;

pub use cache::SingletonCache;
pub use registry::{ContainerRegistry, RegistryError};

use crate::assembler::{AssemblyContext, Strategy};
use crate::core::errors::ContainerError;
use crate::core::recipe::{Instance, Recipe};
use crate::core::table::{ModuleManifest, ModuleRecord, ModuleTable};
use crate::core::types::{Lifecycle, ModuleId};
use crate::graph::{DependencyCounter, PriorityIndex};

/// How modules were declared. The two modes cannot be mixed on one
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationMode {
    /// `declare` calls, one module at a time.
    Incremental,
    /// A manifest batch handed to the constructor.
    Manifest,
}

/// Everything a sealed container serves from.
#[derive(Debug)]
struct SealedWorld {
    table: ModuleTable,
    index: PriorityIndex,
    singletons: SingletonCache,
}

#[derive(Debug)]
enum State {
    Open { table: ModuleTable },
    Sealed { world: SealedWorld },
    /// A seal attempt failed; the container is permanently unusable.
    Poisoned,
}

/// The dependency-injection container.
#[derive(Debug)]
pub struct Container {
    state: State,
    strategy: Strategy,
    mode: Option<DeclarationMode>,
}

impl Container {
    /// An open container using the default assembly strategy.
    pub fn new() -> Self {
        Self::with_strategy(Strategy::default())
    }

    /// An open container using an explicit assembly strategy.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            state: State::Open {
                table: ModuleTable::new(),
            },
            strategy,
            mode: None,
        }
    }

    /// An open container declared from a manifest batch.
    ///
    /// The container is locked to manifest mode: later `declare` calls
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns `Declaration` for duplicate ids in the batch.
    pub fn from_manifests<I>(strategy: Strategy, declarations: I) -> Result<Self, ContainerError>
    where
        I: IntoIterator<Item = (ModuleManifest, Recipe)>,
    {
        let mut table = ModuleTable::new();
        for (manifest, recipe) in declarations {
            table.declare(ModuleRecord::new(manifest.id, recipe, manifest.lifecycle))?;
        }
        Ok(Self {
            state: State::Open { table },
            strategy,
            mode: Some(DeclarationMode::Manifest),
        })
    }

    /// Declare one module.
    ///
    /// # Errors
    ///
    /// - `ForbiddenDeclaration` after sealing, after a failed seal, or
    ///   on a manifest-mode container
    /// - `Declaration` for a duplicate id
    pub fn declare(
        &mut self,
        id: ModuleId,
        recipe: Recipe,
        lifecycle: Lifecycle,
    ) -> Result<(), ContainerError> {
        let table = match &mut self.state {
            State::Open { table } => table,
            State::Sealed { .. } => {
                return Err(ContainerError::ForbiddenDeclaration(
                    "the container is already sealed".into(),
                ))
            }
            State::Poisoned => {
                return Err(ContainerError::ForbiddenDeclaration(
                    "a failed seal left the container unusable".into(),
                ))
            }
        };
        match self.mode {
            Some(DeclarationMode::Manifest) => {
                return Err(ContainerError::ForbiddenDeclaration(
                    "this container was declared from manifests; \
                     incremental declaration is not allowed"
                        .into(),
                ))
            }
            Some(DeclarationMode::Incremental) => {}
            None => self.mode = Some(DeclarationMode::Incremental),
        }
        table.declare(ModuleRecord::new(id, recipe, lifecycle))
    }

    /// Verify the graph, fix the construction order, and eagerly build
    /// every shared module.
    ///
    /// One-shot: a second call fails, and any failure poisons the
    /// container.
    ///
    /// # Errors
    ///
    /// - `Declaration` if nothing was declared
    /// - `UndeclaredDependency` / `CyclicDependency` from graph
    ///   verification
    /// - `Instantiation` if a shared module's recipe fails
    pub fn seal(&mut self) -> Result<(), ContainerError> {
        let table = match std::mem::replace(&mut self.state, State::Poisoned) {
            State::Open { table } => table,
            sealed @ State::Sealed { .. } => {
                self.state = sealed;
                return Err(ContainerError::ForbiddenDeclaration(
                    "the container is already sealed".into(),
                ));
            }
            State::Poisoned => {
                return Err(ContainerError::ForbiddenDeclaration(
                    "a failed seal left the container unusable".into(),
                ))
            }
        };
        if table.is_empty() {
            return Err(ContainerError::Declaration(
                "no modules have been declared".into(),
            ));
        }

        // the state stays Poisoned on every early return below, so a
        // failed seal never leaves partial results behind
        let priorities = DependencyCounter::new(&table).priorities()?;
        let index = PriorityIndex::build(&table, &priorities)?;

        let shared: Vec<ModuleId> = index
            .iter()
            .filter(|entry| entry.lifecycle().is_shared())
            .map(|entry| entry.id().clone())
            .collect();

        let assembler = self.strategy.assembler();
        let mut singletons = SingletonCache::new();
        for id in shared {
            let instance = {
                let ctx = AssemblyContext {
                    table: &table,
                    index: &index,
                    singletons: &singletons,
                };
                assembler.assemble(&id, &ctx)?
            };
            singletons.insert(id, instance);
        }

        self.state = State::Sealed {
            world: SealedWorld {
                table,
                index,
                singletons,
            },
        };
        Ok(())
    }

    /// Whether the container has sealed successfully.
    pub fn is_sealed(&self) -> bool {
        matches!(self.state, State::Sealed { .. })
    }

    /// A fully wired instance of `id`.
    ///
    /// Shared modules return the cached instance; per-request modules
    /// are assembled fresh on every call.
    ///
    /// # Errors
    ///
    /// - `NotSealed` before (or after a failed) seal
    /// - `ModuleNotFound` for an undeclared id
    /// - `Instantiation` if a recipe fails mid-assembly
    pub fn get(&self, id: &ModuleId) -> Result<Instance, ContainerError> {
        let world = match &self.state {
            State::Sealed { world } => world,
            State::Open { .. } | State::Poisoned => return Err(ContainerError::NotSealed),
        };
        let record = world
            .table
            .get(id)
            .ok_or_else(|| ContainerError::not_found(id, "this container's declarations"))?;
        match record.lifecycle() {
            Lifecycle::Shared => world
                .singletons
                .get(id)
                .ok_or_else(|| ContainerError::not_found(id, "the singleton cache")),
            Lifecycle::PerRequest => {
                let ctx = AssemblyContext {
                    table: &world.table,
                    index: &world.index,
                    singletons: &world.singletons,
                };
                self.strategy.assembler().assemble(id, &ctx)
            }
        }
    }

    /// The assembly strategy this container uses.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The lifecycle of a declared module, sealed or not.
    pub fn lifecycle_of(&self, id: &ModuleId) -> Option<Lifecycle> {
        match &self.state {
            State::Open { table } => table.lifecycle_of(id),
            State::Sealed { world } => world.table.lifecycle_of(id),
            State::Poisoned => None,
        }
    }

    /// Number of declared modules.
    pub fn len(&self) -> usize {
        match &self.state {
            State::Open { table } => table.len(),
            State::Sealed { world } => world.table.len(),
            State::Poisoned => 0,
        }
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
