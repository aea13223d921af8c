//! core::errors
//!
//! The container error taxonomy.
//!
//! # Design
//!
//! Every variant is fatal to the operation that raised it. The container
//! is a one-shot bootstrap component: there is no retry, recovery, or
//! logging layer, so each failure aborts the in-flight `seal` or `get`
//! and surfaces directly to the caller.

use thiserror::Error;

use super::types::ModuleId;

/// Errors from declaration, sealing, and assembly.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Malformed, duplicate, or missing declaration (pre-seal).
    #[error("declaration error: {0}")]
    Declaration(String),

    /// A declaration arrived after sealing, or mixed declaration modes
    /// on one container.
    #[error("declaration rejected: {0}")]
    ForbiddenDeclaration(String),

    /// A recipe references an id that was never declared.
    ///
    /// `module` is the edge origin: the declared module whose recipe
    /// names the missing dependency.
    #[error("module '{module}' depends on undeclared module '{dependency}'")]
    UndeclaredDependency {
        /// The module whose recipe references the missing id.
        module: ModuleId,
        /// The id that is not declared in the table.
        dependency: ModuleId,
    },

    /// A module reaches itself through its own dependency closure.
    #[error("cyclic dependency: '{module}' reaches itself through '{via}'")]
    CyclicDependency {
        /// The module whose closure contains itself.
        module: ModuleId,
        /// The direct dependency through which the cycle closed.
        via: ModuleId,
    },

    /// `get` was called before the container was sealed, or after a
    /// failed seal left it unusable.
    #[error("container is not sealed")]
    NotSealed,

    /// An expected module instance could not be located.
    ///
    /// At `get`, this means the id was never declared. Anywhere else it
    /// is a defensive invariant: internal bookkeeping failed to produce
    /// an instance the construction order guarantees.
    #[error("module '{module}' not found in {context}")]
    ModuleNotFound {
        /// The id that could not be located.
        module: ModuleId,
        /// Which lookup missed.
        context: String,
    },

    /// A build recipe failed while being invoked.
    #[error("instantiation of module '{module}' failed")]
    Instantiation {
        /// The module whose recipe failed.
        module: ModuleId,
        /// The underlying failure, preserved as the error source.
        #[source]
        source: anyhow::Error,
    },
}

impl ContainerError {
    /// Defensive lookup failure, tagged with the bookkeeping location
    /// that missed.
    pub(crate) fn not_found(module: &ModuleId, context: impl Into<String>) -> Self {
        ContainerError::ModuleNotFound {
            module: module.clone(),
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ModuleId {
        ModuleId::new(raw).unwrap()
    }

    #[test]
    fn undeclared_dependency_names_the_edge_origin() {
        let err = ContainerError::UndeclaredDependency {
            module: id("app.service"),
            dependency: id("app.missing"),
        };
        let message = err.to_string();
        assert!(message.contains("app.service"));
        assert!(message.contains("app.missing"));
    }

    #[test]
    fn instantiation_preserves_the_cause() {
        use std::error::Error as _;

        let err = ContainerError::Instantiation {
            module: id("app.pool"),
            source: anyhow::anyhow!("connection refused"),
        };
        let cause = err.source().expect("cause is preserved");
        assert!(cause.to_string().contains("connection refused"));
    }
}
