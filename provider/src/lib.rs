//! MetaKit Provider
//!
//! Provider registration: the entry point by which independent modules
//! contribute type definitions and constraints to a registry, decoupled
//! from any particular discovery mechanism. Discovery (scanning,
//! explicit wiring, or test-time manual calls) hands a [`ProviderSet`]
//! its providers in any order; the set applies them in dependency order
//! and freezes the result.

mod error;
mod loader;
mod provider;

pub use error::{ProviderError, ProviderResult};
pub use loader::{bootstrap, ProviderSet};
pub use provider::Provider;
