//! Registry construction.
//!
//! A [`RegistryBuilder`] collects type definitions and constraints, then
//! freezes them into an immutable [`Registry`](crate::Registry) with
//! [`build`](RegistryBuilder::build). All registration is fail-fast: a
//! misconfigured type system is reported at the call that introduced it,
//! except inheritance cycles, which only become visible when the chain
//! is walked at freeze time.

use crate::error::{RegistryError, RegistryResult};
use crate::registry::Registry;
use crate::types::{ChildRequirement, TypeDef};
use crate::Constraint;
use metakit_core::{is_wildcard, ImplId, TypeKey};
use std::collections::{HashMap, HashSet};

/// Fluent builder for a single type definition.
///
/// The implementation identifier defaults to the qualified name, which
/// is right for types with no concrete behavior to point at.
#[derive(Debug, Clone)]
pub struct TypeDefBuilder {
    type_name: String,
    sub_type: String,
    description: String,
    implementation: Option<ImplId>,
    parent: Option<TypeKey>,
    requirements: Vec<ChildRequirement>,
    aliases: Vec<(String, String)>,
}

impl TypeDefBuilder {
    pub fn new(type_name: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            sub_type: sub_type.into(),
            description: String::new(),
            implementation: None,
            parent: None,
            requirements: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn implementation(mut self, id: impl Into<ImplId>) -> Self {
        self.implementation = Some(id.into());
        self
    }

    pub fn inherits_from(
        mut self,
        type_name: impl Into<String>,
        sub_type: impl Into<String>,
    ) -> Self {
        self.parent = Some(TypeKey::new(type_name, sub_type));
        self
    }

    /// Declare a child that must be present.
    pub fn required_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.requirements
            .push(ChildRequirement::required(name, child_type, child_sub_type));
        self
    }

    /// Declare a child that may be present.
    pub fn optional_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.requirements
            .push(ChildRequirement::optional(name, child_type, child_sub_type));
        self
    }

    /// Accept any child of the given type, under any name.
    pub fn accepts_any_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
    ) -> Self {
        self.requirements
            .push(ChildRequirement::any(child_type, child_sub_type));
        self
    }

    /// Declare an alternate name for a previously or later declared
    /// child. Resolved when the definition is built; an alias whose
    /// target never appears is an `UnknownRequirement` error.
    pub fn child_alias(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.push((name.into(), alias.into()));
        self
    }

    /// Add a requirement built by hand.
    pub fn requirement(mut self, req: ChildRequirement) -> Self {
        self.requirements.push(req);
        self
    }

    /// Validate and produce the definition.
    pub fn build(self) -> RegistryResult<TypeDef> {
        validate_segment(&self.type_name, &self.sub_type, "type name", &self.type_name)?;
        validate_segment(&self.type_name, &self.sub_type, "subtype", &self.sub_type)?;

        let key = TypeKey::new(self.type_name, self.sub_type);
        let implementation = self
            .implementation
            .unwrap_or_else(|| ImplId::new(key.qualified_name()));

        let mut requirements = self.requirements;
        for (name, alias) in self.aliases {
            let target = requirements
                .iter_mut()
                .find(|req| req.is_named() && req.name == name);
            match target {
                Some(req) => req.aliases.push(alias),
                None => return Err(RegistryError::unknown_requirement(&key, name)),
            }
        }

        let mut def = TypeDef::new(key, self.description, implementation, self.parent);
        for req in requirements {
            def.add_requirement(req);
        }
        Ok(def)
    }
}

fn validate_segment(
    type_name: &str,
    sub_type: &str,
    which: &str,
    segment: &str,
) -> RegistryResult<()> {
    let shown = format!("{}.{}", type_name, sub_type);
    if segment.is_empty() {
        return Err(RegistryError::invalid_type_key(
            shown,
            format!("{} must not be empty", which),
        ));
    }
    if is_wildcard(segment) {
        return Err(RegistryError::invalid_type_key(
            shown,
            format!("{} must not be the wildcard", which),
        ));
    }
    Ok(())
}

/// Additions applied to an already-registered type.
///
/// Built inside the closure passed to [`RegistryBuilder::extend_type`].
/// A parent may be introduced only when the type has none yet.
#[derive(Debug, Clone, Default)]
pub struct TypeExtension {
    requirements: Vec<ChildRequirement>,
    aliases: Vec<(String, String)>,
    parent: Option<TypeKey>,
}

impl TypeExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.requirements
            .push(ChildRequirement::required(name, child_type, child_sub_type));
        self
    }

    pub fn optional_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.requirements
            .push(ChildRequirement::optional(name, child_type, child_sub_type));
        self
    }

    pub fn accepts_any_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
    ) -> Self {
        self.requirements
            .push(ChildRequirement::any(child_type, child_sub_type));
        self
    }

    /// Alias for a child declared on the type or in this extension.
    pub fn child_alias(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.push((name.into(), alias.into()));
        self
    }

    pub fn requirement(mut self, req: ChildRequirement) -> Self {
        self.requirements.push(req);
        self
    }

    pub fn inherits_from(
        mut self,
        type_name: impl Into<String>,
        sub_type: impl Into<String>,
    ) -> Self {
        self.parent = Some(TypeKey::new(type_name, sub_type));
        self
    }
}

/// Scoped sugar over [`TypeDefBuilder`] that registers on
/// [`done`](TypeScope::done).
pub struct TypeScope<'a> {
    builder: &'a mut RegistryBuilder,
    def: TypeDefBuilder,
}

impl<'a> TypeScope<'a> {
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.def = self.def.description(text);
        self
    }

    pub fn implementation(mut self, id: impl Into<ImplId>) -> Self {
        self.def = self.def.implementation(id);
        self
    }

    pub fn inherits_from(
        mut self,
        type_name: impl Into<String>,
        sub_type: impl Into<String>,
    ) -> Self {
        self.def = self.def.inherits_from(type_name, sub_type);
        self
    }

    pub fn required_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.def = self.def.required_child(child_type, child_sub_type, name);
        self
    }

    pub fn optional_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.def = self.def.optional_child(child_type, child_sub_type, name);
        self
    }

    pub fn accepts_any_child(
        mut self,
        child_type: impl Into<String>,
        child_sub_type: impl Into<String>,
    ) -> Self {
        self.def = self.def.accepts_any_child(child_type, child_sub_type);
        self
    }

    pub fn child_alias(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.def = self.def.child_alias(name, alias);
        self
    }

    pub fn requirement(mut self, req: ChildRequirement) -> Self {
        self.def = self.def.requirement(req);
        self
    }

    /// Validate the definition and register it.
    pub fn done(self) -> RegistryResult<()> {
        let def = self.def.build()?;
        self.builder.register_type(def)
    }
}

/// Collects type definitions and constraints, then freezes them into a
/// [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: HashMap<TypeKey, TypeDef>,
    order: Vec<TypeKey>,
    constraints: Vec<Constraint>,
    constraint_ids: HashSet<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a scoped type definition; call `.done()` to register it.
    pub fn type_def(
        &mut self,
        type_name: impl Into<String>,
        sub_type: impl Into<String>,
    ) -> TypeScope<'_> {
        TypeScope {
            def: TypeDefBuilder::new(type_name, sub_type),
            builder: self,
        }
    }

    /// Register a built definition.
    ///
    /// Registering the same qualified name again with the same
    /// implementation identifier is a no-op, so providers may be applied
    /// repeatedly. A different implementation is a `DuplicateType`
    /// error. A declared parent must already be registered: providers
    /// register base types before derived ones, and in exchange the
    /// parent chain is known-good at every point during registration.
    pub fn register_type(&mut self, def: TypeDef) -> RegistryResult<()> {
        if let Some(existing) = self.types.get(def.key()) {
            if existing.implementation() == def.implementation() {
                log::debug!(
                    "type {} re-registered with the same implementation, keeping existing",
                    def.key()
                );
                return Ok(());
            }
            return Err(RegistryError::duplicate_type(
                def.key(),
                existing.implementation().as_str(),
                def.implementation().as_str(),
            ));
        }
        if let Some(parent) = def.parent() {
            if !self.types.contains_key(parent) {
                return Err(RegistryError::unknown_parent(def.key(), parent));
            }
        }
        log::debug!("registered type {} ({})", def.key(), def.implementation());
        self.order.push(def.key().clone());
        self.types.insert(def.key().clone(), def);
        Ok(())
    }

    /// Register a constraint of any variant. Ids are global: a reused id
    /// is a `DuplicateConstraint` error.
    pub fn register_constraint(&mut self, constraint: impl Into<Constraint>) -> RegistryResult<()> {
        let constraint = constraint.into();
        if !self.constraint_ids.insert(constraint.id().to_string()) {
            return Err(RegistryError::duplicate_constraint(constraint.id()));
        }
        log::debug!("registered constraint '{}'", constraint.id());
        self.constraints.push(constraint);
        Ok(())
    }

    /// Apply additions to a type registered earlier, possibly by another
    /// provider. The closure shapes a [`TypeExtension`]:
    ///
    /// ```ignore
    /// builder.extend_type(&TypeKey::new("field", "string"), |ext| {
    ///     ext.optional_child("attr", "string", "columnName")
    /// })?;
    /// ```
    pub fn extend_type<F>(&mut self, key: &TypeKey, f: F) -> RegistryResult<()>
    where
        F: FnOnce(TypeExtension) -> TypeExtension,
    {
        let ext = f(TypeExtension::new());

        let def = match self.types.get(key) {
            Some(def) => def,
            None => return Err(RegistryError::unknown_type(key)),
        };
        if let Some(parent) = &ext.parent {
            if let Some(existing) = def.parent() {
                return Err(RegistryError::parent_conflict(key, existing));
            }
            if !self.types.contains_key(parent) {
                return Err(RegistryError::unknown_parent(key, parent));
            }
        }
        for (name, _) in &ext.aliases {
            let known = def.direct_named().contains_key(name)
                || ext
                    .requirements
                    .iter()
                    .any(|req| req.is_named() && req.name == *name);
            if !known {
                return Err(RegistryError::unknown_requirement(key, name));
            }
        }

        let def = match self.types.get_mut(key) {
            Some(def) => def,
            None => return Err(RegistryError::unknown_type(key)),
        };
        if let Some(parent) = ext.parent {
            def.set_parent(parent);
        }
        let added = ext.requirements.len();
        for req in ext.requirements {
            def.add_requirement(req);
        }
        for (name, alias) in ext.aliases {
            def.add_alias(&name, alias);
        }
        log::debug!("extended type {} with {} requirements", key, added);
        Ok(())
    }

    /// Resolve inheritance for every type and freeze the result.
    ///
    /// Requirements accumulate farthest ancestor first, so a closer
    /// ancestor's rule for the same key overrides a farther one, and the
    /// type's own direct rules shadow everything inherited. The walk is
    /// bounded by the number of registered types; exceeding the bound
    /// means `extend_type` introduced a parent cycle.
    pub fn build(self) -> RegistryResult<Registry> {
        let RegistryBuilder {
            mut types,
            order,
            constraints,
            ..
        } = self;

        let mut resolved = Vec::with_capacity(order.len());
        for key in &order {
            let chain = ancestor_chain(&types, key)?;
            if chain.is_empty() {
                continue;
            }

            let mut named: HashMap<String, ChildRequirement> = HashMap::new();
            let mut wildcard: Vec<ChildRequirement> = Vec::new();
            for ancestor_key in chain.iter().rev() {
                let ancestor = match types.get(ancestor_key) {
                    Some(ancestor) => ancestor,
                    None => return Err(RegistryError::unknown_type(ancestor_key)),
                };
                for req in ancestor.direct_named().values() {
                    named.insert(req.name.clone(), req.clone());
                }
                for req in ancestor.direct_wildcard() {
                    merge_wildcard(&mut wildcard, req.clone());
                }
            }

            let own = match types.get(key) {
                Some(own) => own,
                None => return Err(RegistryError::unknown_type(key)),
            };
            for name in own.direct_named().keys() {
                named.remove(name);
            }
            let own_wildcards: HashSet<(String, String)> = own
                .direct_wildcard()
                .iter()
                .map(|req| req.wildcard_key())
                .collect();
            wildcard.retain(|req| !own_wildcards.contains(&req.wildcard_key()));
            wildcard.sort_by(|a, b| a.wildcard_key().cmp(&b.wildcard_key()));

            resolved.push((key.clone(), named, wildcard));
        }

        for (key, named, wildcard) in resolved {
            if let Some(def) = types.get_mut(&key) {
                def.set_inherited(named, wildcard);
            }
        }

        let mut placement_idx = Vec::new();
        let mut validation_idx = Vec::new();
        let mut uniqueness_idx = Vec::new();
        for (i, constraint) in constraints.iter().enumerate() {
            match constraint {
                Constraint::Placement(_) => placement_idx.push(i),
                Constraint::Validation(_) => validation_idx.push(i),
                Constraint::Uniqueness(_) => uniqueness_idx.push(i),
            }
        }

        log::debug!(
            "registry built: {} types, {} constraints",
            types.len(),
            constraints.len()
        );
        Ok(Registry::from_parts(
            types,
            order,
            constraints,
            placement_idx,
            validation_idx,
            uniqueness_idx,
        ))
    }
}

/// Walk the parent chain of `key`, closest ancestor first.
fn ancestor_chain(
    types: &HashMap<TypeKey, TypeDef>,
    key: &TypeKey,
) -> RegistryResult<Vec<TypeKey>> {
    let mut chain = Vec::new();
    let mut current = match types.get(key) {
        Some(def) => def.parent().cloned(),
        None => return Err(RegistryError::unknown_type(key)),
    };
    let bound = types.len();
    while let Some(parent_key) = current {
        if chain.len() >= bound {
            return Err(RegistryError::inheritance_cycle(key));
        }
        let parent = types
            .get(&parent_key)
            .ok_or_else(|| RegistryError::unknown_parent(key, &parent_key))?;
        chain.push(parent_key);
        current = parent.parent().cloned();
    }
    Ok(chain)
}

/// Replace the wildcard rule with the same type pair, or append.
fn merge_wildcard(list: &mut Vec<ChildRequirement>, req: ChildRequirement) {
    let key = req.wildcard_key();
    match list.iter_mut().find(|r| r.wildcard_key() == key) {
        Some(existing) => *existing = req,
        None => list.push(req),
    }
}
