//! The Registry - immutable type and constraint lookup.

use crate::error::{RegistryError, RegistryResult};
use crate::types::{ChildRequirement, TypeDef};
use crate::{Constraint, PlacementConstraint, UniquenessConstraint, ValidationConstraint};
use metakit_core::TypeKey;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The Registry provides runtime lookup of type definitions and
/// constraints. It is immutable after construction: queries take `&self`
/// and may run concurrently from any number of threads.
#[derive(Debug)]
pub struct Registry {
    /// Type definitions by key, inheritance fully resolved.
    types: HashMap<TypeKey, TypeDef>,
    /// Keys in registration order, for stable enumeration.
    order: Vec<TypeKey>,

    /// All constraints, in registration order.
    constraints: Vec<Constraint>,
    /// Indices into `constraints` per variant.
    placement_idx: Vec<usize>,
    validation_idx: Vec<usize>,
    uniqueness_idx: Vec<usize>,
}

impl Registry {
    /// Assemble a frozen registry (use RegistryBuilder for construction).
    pub(crate) fn from_parts(
        types: HashMap<TypeKey, TypeDef>,
        order: Vec<TypeKey>,
        constraints: Vec<Constraint>,
        placement_idx: Vec<usize>,
        validation_idx: Vec<usize>,
        uniqueness_idx: Vec<usize>,
    ) -> Self {
        Self {
            types,
            order,
            constraints,
            placement_idx,
            validation_idx,
            uniqueness_idx,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by key.
    pub fn get_type(&self, key: &TypeKey) -> Option<&TypeDef> {
        self.types.get(key)
    }

    /// Get a type definition by its two name segments.
    pub fn get(&self, type_name: &str, sub_type: &str) -> Option<&TypeDef> {
        self.types.get(&TypeKey::new(type_name, sub_type))
    }

    /// Check whether a type is registered.
    pub fn has_type(&self, key: &TypeKey) -> bool {
        self.types.contains_key(key)
    }

    /// All type definitions, in registration order.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.order.iter().filter_map(|key| self.types.get(key))
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All definitions sharing a type name, in registration order.
    pub fn types_of<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a TypeDef> {
        self.all_types()
            .filter(move |def| def.key().type_name() == type_name)
    }

    // ==================== Child Acceptance ====================

    /// Whether `parent` accepts a child of the given type under the
    /// given name. An unregistered parent accepts nothing.
    pub fn accepts_child(
        &self,
        parent: &TypeKey,
        child_type: &str,
        child_sub_type: &str,
        child_name: &str,
    ) -> bool {
        self.types
            .get(parent)
            .map(|def| def.accepts(child_type, child_sub_type, child_name))
            .unwrap_or(false)
    }

    /// Required children of `parent` not satisfied by any name in
    /// `existing`, sorted by name.
    pub fn missing_required_children(
        &self,
        parent: &TypeKey,
        existing: &HashSet<String>,
    ) -> RegistryResult<Vec<&ChildRequirement>> {
        let def = self
            .types
            .get(parent)
            .ok_or_else(|| RegistryError::unknown_type(parent))?;
        Ok(def.missing_required_children(existing))
    }

    /// Human-readable summary of what `parent` accepts.
    pub fn describe_supported_children(&self, parent: &TypeKey) -> RegistryResult<String> {
        let def = self
            .types
            .get(parent)
            .ok_or_else(|| RegistryError::unknown_type(parent))?;
        Ok(def.supported_children_description())
    }

    // ==================== Constraint Lookups ====================

    /// All constraints, in registration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of registered constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// All placement constraints, in registration order.
    pub fn placement_constraints(&self) -> impl Iterator<Item = &PlacementConstraint> {
        self.placement_idx
            .iter()
            .filter_map(|&i| match &self.constraints[i] {
                Constraint::Placement(c) => Some(c),
                _ => None,
            })
    }

    /// All validation constraints, in registration order.
    pub fn validation_constraints(&self) -> impl Iterator<Item = &ValidationConstraint> {
        self.validation_idx
            .iter()
            .filter_map(|&i| match &self.constraints[i] {
                Constraint::Validation(c) => Some(c),
                _ => None,
            })
    }

    /// All uniqueness constraints, in registration order.
    pub fn uniqueness_constraints(&self) -> impl Iterator<Item = &UniquenessConstraint> {
        self.uniqueness_idx
            .iter()
            .filter_map(|&i| match &self.constraints[i] {
                Constraint::Uniqueness(c) => Some(c),
                _ => None,
            })
    }

    // ==================== Introspection ====================

    /// Summary counts for dashboards and logs.
    pub fn stats(&self) -> RegistryStats {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for def in self.all_types() {
            *by_name.entry(def.key().type_name()).or_insert(0) += 1;
        }
        let mut types_by_type_name: Vec<(String, usize)> = by_name
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        types_by_type_name.sort();

        RegistryStats {
            type_count: self.type_count(),
            constraint_count: self.constraint_count(),
            placement_constraint_count: self.placement_idx.len(),
            validation_constraint_count: self.validation_idx.len(),
            uniqueness_constraint_count: self.uniqueness_idx.len(),
            types_by_type_name,
        }
    }

    /// Sanity-check the frozen registry and report anything suspicious.
    ///
    /// The checks are advisory; a built registry is always usable. They
    /// catch configurations that are legal but almost certainly not what
    /// the author meant.
    pub fn verify(&self) -> HealthReport {
        let mut issues = Vec::new();

        // Requirements with a wildcard name cannot be satisfied by any
        // concrete child, so marking one required guarantees a
        // missing-children report.
        for def in self.all_types() {
            if def.has_required_wildcard() {
                issues.push(format!(
                    "type {} declares a required wildcard child; wildcard requirements cannot be satisfied",
                    def.key()
                ));
            }
        }

        // Two names pointing at one implementation is usually a
        // copy-paste slip in a provider.
        let mut by_impl: HashMap<&str, Vec<&TypeKey>> = HashMap::new();
        for def in self.all_types() {
            by_impl
                .entry(def.implementation().as_str())
                .or_default()
                .push(def.key());
        }
        let mut shared: Vec<(&str, Vec<&TypeKey>)> = by_impl
            .into_iter()
            .filter(|(_, keys)| keys.len() > 1)
            .collect();
        shared.sort_by_key(|(id, _)| *id);
        for (id, mut keys) in shared {
            keys.sort();
            let names: Vec<String> = keys.iter().map(|key| key.qualified_name()).collect();
            issues.push(format!(
                "implementation '{}' is shared by {}",
                id,
                names.join(", ")
            ));
        }

        let mut max_inheritance_depth = 0;
        let mut deepest_types = Vec::new();
        for def in self.all_types() {
            let depth = self.inheritance_depth(def);
            if depth > max_inheritance_depth {
                max_inheritance_depth = depth;
                deepest_types.clear();
            }
            if depth == max_inheritance_depth {
                deepest_types.push(def.key().qualified_name());
            }
        }

        HealthReport {
            healthy: issues.is_empty(),
            issues,
            max_inheritance_depth,
            deepest_types,
        }
    }

    fn inheritance_depth(&self, def: &TypeDef) -> usize {
        let mut depth = 0;
        let mut current = def.parent();
        while let Some(parent_key) = current {
            depth += 1;
            current = self.types.get(parent_key).and_then(|p| p.parent());
        }
        depth
    }
}

/// Counts describing a frozen registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub type_count: usize,
    pub constraint_count: usize,
    pub placement_constraint_count: usize,
    pub validation_constraint_count: usize,
    pub uniqueness_constraint_count: usize,
    /// Type counts grouped by type name, sorted by name.
    pub types_by_type_name: Vec<(String, usize)>,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} types, {} constraints ({} placement, {} validation, {} uniqueness)",
            self.type_count,
            self.constraint_count,
            self.placement_constraint_count,
            self.validation_constraint_count,
            self.uniqueness_constraint_count
        )?;
        for (name, count) in &self.types_by_type_name {
            writeln!(f, "  {}: {}", name, count)?;
        }
        Ok(())
    }
}

/// Result of [`Registry::verify`].
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// True when no issues were found.
    pub healthy: bool,
    /// Descriptions of suspicious configurations.
    pub issues: Vec<String>,
    /// Length of the longest parent chain.
    pub max_inheritance_depth: usize,
    /// Qualified names of the types at that depth.
    pub deepest_types: Vec<String>,
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.healthy {
            writeln!(f, "registry healthy")?;
        } else {
            writeln!(f, "registry has {} issue(s):", self.issues.len())?;
            for issue in &self.issues {
                writeln!(f, "  - {}", issue)?;
            }
        }
        write!(
            f,
            "max inheritance depth {} ({})",
            self.max_inheritance_depth,
            self.deepest_types.join(", ")
        )
    }
}
