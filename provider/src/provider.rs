//! The provider contract.

use metakit_registry::{RegistryBuilder, RegistryResult};

/// A unit of code with types or constraints to contribute.
///
/// Registration must be pure with respect to the builder: a provider
/// may assume nothing about what other providers have registered,
/// except the providers it names in [`dependencies`](Self::dependencies)
/// (typically the ones defining the parent types it derives from).
/// Registration must also be idempotent; applying a provider twice is
/// legal because type re-registration with the same implementation is
/// a no-op.
pub trait Provider {
    /// Unique identifier, e.g. `"metakit.core"`. Used for dependency
    /// declarations and duplicate detection.
    fn id(&self) -> &str;

    /// One-line summary for logs and compliance reports.
    fn description(&self) -> &str {
        ""
    }

    /// Ids of providers that must be applied before this one.
    fn dependencies(&self) -> &[&str] {
        &[]
    }

    /// Contribute type definitions. Runs before any provider's
    /// constraint registration.
    fn register_types(&self, builder: &mut RegistryBuilder) -> RegistryResult<()> {
        let _ = builder;
        Ok(())
    }

    /// Contribute constraints. Runs after every provider's type
    /// registration, so constraints may reference types from any
    /// provider without declaring a dependency on it.
    fn register_constraints(&self, builder: &mut RegistryBuilder) -> RegistryResult<()> {
        let _ = builder;
        Ok(())
    }
}
