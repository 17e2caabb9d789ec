//! Shared fixtures for MetaKit integration tests.
//!
//! [`TestNode`] is an owned metadata node good enough to exercise
//! placement, value, and uniqueness checks; the providers in
//! [`providers`] register the canonical field/object/attr hierarchy
//! the scenario tests build on.

mod node;
pub mod providers;

pub use node::TestNode;

pub mod prelude {
    pub use crate::providers::{CoreTypesProvider, DatabaseExtensionProvider};
    pub use crate::TestNode;
    pub use metakit_constraint::ConstraintEnforcer;
    pub use metakit_core::{MetaNode, NodeInfo, TypeKey, Value};
    pub use metakit_provider::{bootstrap, Provider, ProviderSet};
    pub use metakit_registry::{
        ChildRequirement, NodePredicate, PlacementConstraint, Registry, RegistryBuilder,
        RegistryError, UniquenessConstraint, ValidationConstraint,
    };
}
