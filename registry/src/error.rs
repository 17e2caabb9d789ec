//! Registry error types.

use metakit_core::TypeKey;
use thiserror::Error;

/// Errors raised while assembling or querying a registry.
///
/// Registration-time variants are fatal: they mean the type system is
/// misconfigured and startup should abort. `UnknownType` is the one
/// query-time variant, returned only by APIs that mandate existence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Same qualified name registered with a conflicting implementation.
    #[error("Duplicate type {key}: already registered with implementation '{existing}', conflicting with '{conflicting}'")]
    DuplicateType {
        key: String,
        existing: String,
        conflicting: String,
    },

    /// A definition names a parent that is not registered yet.
    #[error("Unknown parent type {parent} for {key}: parents must be registered first")]
    UnknownParent { key: String, parent: String },

    /// The parent chain does not terminate.
    #[error("Inheritance cycle detected involving type {key}")]
    InheritanceCycle { key: String },

    /// A type that must exist does not.
    #[error("Unknown type: {key}")]
    UnknownType { key: String },

    /// A type or subtype segment was empty or the wildcard.
    #[error("Invalid type key '{key}': {reason}")]
    InvalidTypeKey { key: String, reason: String },

    /// A constraint id was registered twice.
    #[error("Duplicate constraint id: {constraint_id}")]
    DuplicateConstraint { constraint_id: String },

    /// An alias names a child requirement that does not exist.
    #[error("Type {key} has no child requirement named '{name}'")]
    UnknownRequirement { key: String, name: String },

    /// An extension tried to re-parent a type that already has a parent.
    #[error("Type {key} already inherits from {existing}")]
    ParentConflict { key: String, existing: String },
}

impl RegistryError {
    pub fn duplicate_type(
        key: &TypeKey,
        existing: impl Into<String>,
        conflicting: impl Into<String>,
    ) -> Self {
        Self::DuplicateType {
            key: key.qualified_name(),
            existing: existing.into(),
            conflicting: conflicting.into(),
        }
    }

    pub fn unknown_parent(key: &TypeKey, parent: &TypeKey) -> Self {
        Self::UnknownParent {
            key: key.qualified_name(),
            parent: parent.qualified_name(),
        }
    }

    pub fn inheritance_cycle(key: &TypeKey) -> Self {
        Self::InheritanceCycle {
            key: key.qualified_name(),
        }
    }

    pub fn unknown_type(key: &TypeKey) -> Self {
        Self::UnknownType {
            key: key.qualified_name(),
        }
    }

    pub fn invalid_type_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypeKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate_constraint(constraint_id: impl Into<String>) -> Self {
        Self::DuplicateConstraint {
            constraint_id: constraint_id.into(),
        }
    }

    pub fn unknown_requirement(key: &TypeKey, name: impl Into<String>) -> Self {
        Self::UnknownRequirement {
            key: key.qualified_name(),
            name: name.into(),
        }
    }

    pub fn parent_conflict(key: &TypeKey, existing: &TypeKey) -> Self {
        Self::ParentConflict {
            key: key.qualified_name(),
            existing: existing.qualified_name(),
        }
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
