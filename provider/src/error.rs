//! Provider wiring errors.

use metakit_registry::RegistryError;
use thiserror::Error;

/// Errors raised while assembling or applying a provider set.
///
/// All of these are startup-time configuration bugs; none is
/// recoverable at the point it is raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Two providers claim the same id.
    #[error("Duplicate provider id: {id}")]
    DuplicateProvider { id: String },

    /// A provider depends on an id no provider in the set carries.
    #[error("Provider '{id}' depends on unknown provider '{dependency}'")]
    UnknownDependency { id: String, dependency: String },

    /// The dependency graph contains a cycle.
    #[error("Provider dependency cycle involving: {ids}")]
    DependencyCycle { ids: String },

    /// A provider's registration call failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ProviderError {
    pub fn duplicate_provider(id: impl Into<String>) -> Self {
        Self::DuplicateProvider { id: id.into() }
    }

    pub fn unknown_dependency(id: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::UnknownDependency {
            id: id.into(),
            dependency: dependency.into(),
        }
    }

    pub fn dependency_cycle(ids: &[&str]) -> Self {
        Self::DependencyCycle {
            ids: ids.join(", "),
        }
    }
}

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
