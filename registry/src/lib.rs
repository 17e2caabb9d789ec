//! MetaKit Registry
//!
//! Runtime type lookup. Single source of truth for type definitions,
//! child-acceptance rules, and constraints. The registry is immutable
//! after construction via RegistryBuilder.

mod builder;
mod constraint;
mod error;
mod global;
mod registry;
mod types;

pub use builder::{RegistryBuilder, TypeDefBuilder, TypeExtension, TypeScope};
pub use constraint::{
    Constraint, NodePredicate, PlacementConstraint, UniquenessConstraint, ValidationConstraint,
};
pub use error::{RegistryError, RegistryResult};
pub use global::{global, install_global, reset_global};
pub use registry::{HealthReport, Registry, RegistryStats};
pub use types::{ChildRequirement, TypeDef};
