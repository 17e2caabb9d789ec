//! Provider ordering and application.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::Provider;
use metakit_registry::{Registry, RegistryBuilder};
use std::collections::{HashMap, HashSet};

/// An ordered collection of providers.
///
/// Providers may be added in any order; [`apply`](Self::apply) sorts
/// them so that every provider runs after the providers it depends on,
/// then runs all type registration before any constraint registration.
/// Among providers with no ordering relation, insertion order is kept,
/// so a set built the same way applies the same way every time.
#[derive(Default)]
pub struct ProviderSet {
    providers: Vec<Box<dyn Provider>>,
    ids: HashSet<String>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider. A reused id is a `DuplicateProvider` error.
    pub fn add(&mut self, provider: impl Provider + 'static) -> ProviderResult<()> {
        self.add_boxed(Box::new(provider))
    }

    /// Add an already-boxed provider, as handed over by a discovery
    /// mechanism.
    pub fn add_boxed(&mut self, provider: Box<dyn Provider>) -> ProviderResult<()> {
        if !self.ids.insert(provider.id().to_string()) {
            return Err(ProviderError::duplicate_provider(provider.id()));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Number of providers in the set.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider ids in dependency order, without applying anything.
    /// Useful for compliance reports and wiring diagnostics.
    pub fn resolution_order(&self) -> ProviderResult<Vec<&str>> {
        let order = self.sorted_indices()?;
        Ok(order.iter().map(|&i| self.providers[i].id()).collect())
    }

    /// Apply every provider to the builder in dependency order:
    /// all type registration first, then all constraint registration.
    pub fn apply(&self, builder: &mut RegistryBuilder) -> ProviderResult<()> {
        let order = self.sorted_indices()?;

        for &i in &order {
            let provider = &self.providers[i];
            log::debug!("applying types from provider '{}'", provider.id());
            provider.register_types(builder)?;
        }
        for &i in &order {
            let provider = &self.providers[i];
            log::debug!("applying constraints from provider '{}'", provider.id());
            provider.register_constraints(builder)?;
        }

        log::info!("applied {} provider(s)", order.len());
        Ok(())
    }

    /// Apply the set to a fresh builder and freeze the registry.
    pub fn bootstrap(&self) -> ProviderResult<Registry> {
        let mut builder = RegistryBuilder::new();
        self.apply(&mut builder)?;
        Ok(builder.build()?)
    }

    /// Kahn's algorithm over the dependency graph, stable with respect
    /// to insertion order: among providers whose dependencies are all
    /// satisfied, the earliest-added runs first.
    fn sorted_indices(&self) -> ProviderResult<Vec<usize>> {
        let index_of: HashMap<&str, usize> = self
            .providers
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id(), i))
            .collect();

        let mut pending: Vec<HashSet<usize>> = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let mut deps = HashSet::new();
            for dep in provider.dependencies() {
                match index_of.get(dep) {
                    Some(&i) => {
                        deps.insert(i);
                    }
                    None => {
                        return Err(ProviderError::unknown_dependency(provider.id(), *dep));
                    }
                }
            }
            pending.push(deps);
        }

        let mut order = Vec::with_capacity(self.providers.len());
        let mut placed = vec![false; self.providers.len()];
        while order.len() < self.providers.len() {
            let next = (0..self.providers.len())
                .find(|&i| !placed[i] && pending[i].iter().all(|&dep| placed[dep]));
            match next {
                Some(i) => {
                    placed[i] = true;
                    order.push(i);
                }
                None => {
                    let stuck: Vec<&str> = (0..self.providers.len())
                        .filter(|&i| !placed[i])
                        .map(|i| self.providers[i].id())
                        .collect();
                    return Err(ProviderError::dependency_cycle(&stuck));
                }
            }
        }
        Ok(order)
    }
}

/// Run a sequence of providers against a fresh registry.
///
/// Sugar over building a [`ProviderSet`] by hand; fails on the first
/// duplicate id, unresolvable dependency, or registration error.
pub fn bootstrap(
    providers: impl IntoIterator<Item = Box<dyn Provider>>,
) -> ProviderResult<Registry> {
    let mut set = ProviderSet::new();
    for provider in providers {
        set.add_boxed(provider)?;
    }
    set.bootstrap()
}
