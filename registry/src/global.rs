//! Process-wide registry slot.
//!
//! Applications that thread a `Registry` through their call graph never
//! need this module. It exists for hosts built around global lookup,
//! where handlers resolve types without a registry parameter.

use crate::Registry;
use std::sync::{Arc, OnceLock, RwLock};

fn slot() -> &'static RwLock<Option<Arc<Registry>>> {
    static GLOBAL: OnceLock<RwLock<Option<Arc<Registry>>>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(None))
}

/// Install a registry as the process-wide instance, returning the one
/// it replaced.
pub fn install_global(registry: Arc<Registry>) -> Option<Arc<Registry>> {
    // A poisoned lock means a panic elsewhere while swapping; the slot
    // itself is still a valid Option, so keep going.
    let mut guard = slot().write().unwrap_or_else(|e| e.into_inner());
    guard.replace(registry)
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<Arc<Registry>> {
    let guard = slot().read().unwrap_or_else(|e| e.into_inner());
    guard.clone()
}

/// Clear the process-wide slot, returning the registry it held.
pub fn reset_global() -> Option<Arc<Registry>> {
    let mut guard = slot().write().unwrap_or_else(|e| e.into_inner());
    guard.take()
}
