//! core::recipe
//!
//! Build recipes: ordered dependency lists plus type-erased factories.
//!
//! # Protocol
//!
//! A recipe's factory receives the resolved dependency instances, in the
//! order the dependency list declares them, and yields [`Built`]: either
//! a finished instance or a deferred one-shot builder that is invoked
//! once, with no arguments, to produce the final instance. The deferred
//! form exists for implementations that stage their construction behind
//! a companion builder object.
//!
//! Factories are registered once, at declaration time. Resolving a
//! textual implementation name to a factory is the registration layer's
//! job; the engine only ever invokes closures it was handed.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::types::ModuleId;

/// A type-erased, reference-counted module instance.
///
/// Reference identity (`Arc::ptr_eq`) is the observable notion of
/// "the same instance" throughout the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A one-shot builder yielded by a factory in place of a finished
/// instance.
pub type DeferredBuild = Box<dyn FnOnce() -> anyhow::Result<Instance> + Send + Sync>;

/// The outcome of one factory invocation.
pub enum Built {
    /// A finished instance.
    Ready(Instance),
    /// An intermediate builder, invoked once with no arguments to yield
    /// the final instance.
    Deferred(DeferredBuild),
}

impl Built {
    /// Wrap a concrete value as a finished instance.
    ///
    /// # Example
    ///
    /// ```
    /// use armature::core::recipe::Built;
    ///
    /// struct Clock;
    /// let built = Built::ready(Clock);
    /// assert!(matches!(built, Built::Ready(_)));
    /// ```
    pub fn ready<T: Send + Sync + 'static>(value: T) -> Self {
        Built::Ready(Arc::new(value))
    }

    /// Defer construction to a one-shot builder.
    pub fn deferred<T, F>(build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Built::Deferred(Box::new(move || Ok(Arc::new(build()?) as Instance)))
    }

    /// Collapse into a finished instance, running the deferred builder
    /// if one was yielded.
    pub(crate) fn finish(self) -> anyhow::Result<Instance> {
        match self {
            Built::Ready(instance) => Ok(instance),
            Built::Deferred(build) => build(),
        }
    }
}

impl fmt::Debug for Built {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Built::Ready(_) => f.write_str("Built::Ready(..)"),
            Built::Deferred(_) => f.write_str("Built::Deferred(..)"),
        }
    }
}

/// Factory closure: resolved dependency instances to a build outcome.
pub type Factory = Box<dyn Fn(&[Instance]) -> anyhow::Result<Built> + Send + Sync>;

/// A module build recipe: an ordered dependency list plus the factory
/// that consumes the resolved instances.
pub struct Recipe {
    dependencies: Vec<ModuleId>,
    factory: Factory,
}

impl Recipe {
    /// Create a recipe from a dependency list and a factory.
    ///
    /// The factory receives instances in the same order as
    /// `dependencies`. The list may name the same id more than once;
    /// each position is resolved independently, so a per-request
    /// dependency named twice yields two distinct instances.
    pub fn new<F>(dependencies: Vec<ModuleId>, factory: F) -> Self
    where
        F: Fn(&[Instance]) -> anyhow::Result<Built> + Send + Sync + 'static,
    {
        Self {
            dependencies,
            factory: Box::new(factory),
        }
    }

    /// Recipe for a module with no dependencies.
    pub fn leaf<F>(factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Built> + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| factory())
    }

    /// The ordered dependency ids this recipe consumes.
    pub fn dependencies(&self) -> &[ModuleId] {
        &self.dependencies
    }

    /// Invoke the factory and collapse a deferred builder.
    pub(crate) fn invoke(&self, inputs: &[Instance]) -> anyhow::Result<Instance> {
        (self.factory)(inputs)?.finish()
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Downcast helper for type-erased instances.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use armature::core::recipe::{Instance, InstanceExt};
///
/// struct Config { retries: u32 }
///
/// let instance: Instance = Arc::new(Config { retries: 3 });
/// let config = instance.downcast_arc::<Config>().expect("a Config");
/// assert_eq!(config.retries, 3);
/// assert!(instance.downcast_arc::<String>().is_none());
/// ```
pub trait InstanceExt {
    /// Recover the concrete type behind an instance handle, sharing
    /// ownership with the container.
    fn downcast_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>>;
}

impl InstanceExt for Instance {
    fn downcast_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(self).downcast::<T>().ok()
    }
}
