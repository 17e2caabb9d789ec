//! Type definitions and child requirements.

use metakit_core::{is_wildcard, segment_matches, ImplId, MetaNode, TypeKey, WILDCARD};
use std::collections::{HashMap, HashSet};

/// A rule stating that a type may (or must) contain a matching child.
///
/// `name` is either a concrete child name or the wildcard `*`. The
/// expected type is usually concrete; `*` accepts any type. A named rule
/// only speaks for children of its expected type: a child with a
/// matching name but a different type falls through to wildcard rules
/// instead of being rejected outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRequirement {
    /// Child name this rule speaks for, or `*`.
    pub name: String,
    /// Alternate names that also satisfy this rule. Meaningless on
    /// wildcard rules.
    pub aliases: Vec<String>,
    /// Expected child type name, or `*`.
    pub expected_type: String,
    /// Expected child subtype, or `*`.
    pub expected_sub_type: String,
    /// Whether a matching child must be present.
    pub required: bool,
}

impl ChildRequirement {
    pub fn new(
        name: impl Into<String>,
        expected_type: impl Into<String>,
        expected_sub_type: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            expected_type: expected_type.into(),
            expected_sub_type: expected_sub_type.into(),
            required,
        }
    }

    /// A child that must be present.
    pub fn required(
        name: impl Into<String>,
        expected_type: impl Into<String>,
        expected_sub_type: impl Into<String>,
    ) -> Self {
        Self::new(name, expected_type, expected_sub_type, true)
    }

    /// A child that may be present.
    pub fn optional(
        name: impl Into<String>,
        expected_type: impl Into<String>,
        expected_sub_type: impl Into<String>,
    ) -> Self {
        Self::new(name, expected_type, expected_sub_type, false)
    }

    /// A wildcard rule accepting any child of the given type, under any name.
    pub fn any(expected_type: impl Into<String>, expected_sub_type: impl Into<String>) -> Self {
        Self::new(WILDCARD, expected_type, expected_sub_type, false)
    }

    /// Add an alternate accepted name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Whether this rule names a concrete child (not the wildcard).
    pub fn is_named(&self) -> bool {
        !is_wildcard(&self.name)
    }

    /// Whether a child of the given type and subtype is in scope.
    pub fn matches_type(&self, child_type: &str, child_sub_type: &str) -> bool {
        segment_matches(&self.expected_type, child_type)
            && segment_matches(&self.expected_sub_type, child_sub_type)
    }

    /// Whether a child name satisfies this rule's name or one of its aliases.
    pub fn matches_name(&self, child_name: &str) -> bool {
        is_wildcard(&self.name) || self.satisfied_by(child_name)
    }

    /// Whether a concrete existing-child name counts as this rule's child.
    pub fn satisfied_by(&self, child_name: &str) -> bool {
        self.name == child_name || self.aliases.iter().any(|a| a == child_name)
    }

    /// Whether a candidate child matches this rule in full.
    pub fn matches(&self, child: &dyn MetaNode) -> bool {
        self.matches_type(child.type_name(), child.sub_type()) && self.matches_name(child.name())
    }

    /// Key under which wildcard rules merge during inheritance resolution.
    pub(crate) fn wildcard_key(&self) -> (String, String) {
        (self.expected_type.clone(), self.expected_sub_type.clone())
    }

    /// Human-readable form, e.g. "required attribute 'maxLength' of type int".
    pub fn describe(&self) -> String {
        let requirement = if self.required { "required" } else { "optional" };
        let noun = match self.expected_type.as_str() {
            "attr" => "attribute",
            WILDCARD => "child",
            other => other,
        };
        let mut out = format!("{} {}", requirement, noun);
        if self.is_named() {
            out.push_str(&format!(" '{}'", self.name));
        }
        if !is_wildcard(&self.expected_sub_type) {
            out.push_str(&format!(" of type {}", self.expected_sub_type));
        }
        if !self.aliases.is_empty() {
            out.push_str(&format!(" (aliases: {})", self.aliases.join(", ")));
        }
        out
    }
}

/// A registered type definition.
///
/// Child requirements live in two layers: those authored directly on
/// this type, and those inherited from its resolved parent chain. Each
/// layer keeps named rules in a map and wildcard rules in a list, so a
/// lookup never scans rules that cannot apply. Lookup priority is:
/// direct named, direct wildcard, inherited named, inherited wildcard.
#[derive(Debug, Clone)]
pub struct TypeDef {
    key: TypeKey,
    description: String,
    implementation: ImplId,
    parent: Option<TypeKey>,
    direct_named: HashMap<String, ChildRequirement>,
    direct_wildcard: Vec<ChildRequirement>,
    inherited_named: HashMap<String, ChildRequirement>,
    inherited_wildcard: Vec<ChildRequirement>,
}

impl TypeDef {
    pub(crate) fn new(
        key: TypeKey,
        description: String,
        implementation: ImplId,
        parent: Option<TypeKey>,
    ) -> Self {
        Self {
            key,
            description,
            implementation,
            parent,
            direct_named: HashMap::new(),
            direct_wildcard: Vec::new(),
            inherited_named: HashMap::new(),
            inherited_wildcard: Vec::new(),
        }
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn type_name(&self) -> &str {
        self.key.type_name()
    }

    pub fn sub_type(&self) -> &str {
        self.key.sub_type()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn implementation(&self) -> &ImplId {
        &self.implementation
    }

    pub fn parent(&self) -> Option<&TypeKey> {
        self.parent.as_ref()
    }

    // ==================== Construction (crate-internal) ====================

    /// Route a direct requirement into the named map or the wildcard list.
    /// A later rule for the same name, or for the same wildcard type pair,
    /// replaces the earlier one.
    pub(crate) fn add_requirement(&mut self, req: ChildRequirement) {
        if req.is_named() {
            self.direct_named.insert(req.name.clone(), req);
        } else {
            let key = req.wildcard_key();
            if let Some(existing) = self
                .direct_wildcard
                .iter_mut()
                .find(|r| r.wildcard_key() == key)
            {
                *existing = req;
            } else {
                self.direct_wildcard.push(req);
            }
        }
    }

    pub(crate) fn set_parent(&mut self, parent: TypeKey) {
        self.parent = Some(parent);
    }

    /// Add an alias to a direct named requirement. Returns false when no
    /// requirement of that name exists; callers validate first.
    pub(crate) fn add_alias(&mut self, name: &str, alias: String) -> bool {
        match self.direct_named.get_mut(name) {
            Some(req) => {
                req.aliases.push(alias);
                true
            }
            None => false,
        }
    }

    /// Install the merged requirements computed from the parent chain.
    /// Called once, when the registry is frozen.
    pub(crate) fn set_inherited(
        &mut self,
        named: HashMap<String, ChildRequirement>,
        wildcard: Vec<ChildRequirement>,
    ) {
        self.inherited_named = named;
        self.inherited_wildcard = wildcard;
    }

    pub(crate) fn direct_named(&self) -> &HashMap<String, ChildRequirement> {
        &self.direct_named
    }

    pub(crate) fn direct_wildcard(&self) -> &[ChildRequirement] {
        &self.direct_wildcard
    }

    // ==================== Requirement Queries ====================

    /// Requirements authored on this type itself.
    pub fn direct_requirements(&self) -> impl Iterator<Item = &ChildRequirement> {
        self.direct_named.values().chain(self.direct_wildcard.iter())
    }

    /// Requirements merged in from the resolved parent chain.
    pub fn inherited_requirements(&self) -> impl Iterator<Item = &ChildRequirement> {
        self.inherited_named
            .values()
            .chain(self.inherited_wildcard.iter())
    }

    /// The first rule accepting the candidate child, in priority order:
    /// direct named, direct wildcard, inherited named, inherited wildcard.
    ///
    /// A named rule is consulted for a child of its name (or alias) but
    /// only accepts an exact type match; on a type mismatch the child
    /// falls through to the wildcard tiers. This is what lets two
    /// same-named children of different types both be legal.
    pub fn matching_requirement(
        &self,
        child_type: &str,
        child_sub_type: &str,
        child_name: &str,
    ) -> Option<&ChildRequirement> {
        find_named(&self.direct_named, child_type, child_sub_type, child_name)
            .or_else(|| find_wildcard(&self.direct_wildcard, child_type, child_sub_type))
            .or_else(|| find_named(&self.inherited_named, child_type, child_sub_type, child_name))
            .or_else(|| find_wildcard(&self.inherited_wildcard, child_type, child_sub_type))
    }

    /// Whether a child of the given type, subtype, and name may be placed
    /// under nodes of this type.
    pub fn accepts(&self, child_type: &str, child_sub_type: &str, child_name: &str) -> bool {
        self.matching_requirement(child_type, child_sub_type, child_name)
            .is_some()
    }

    /// Whether the candidate child node may be placed under nodes of this type.
    pub fn accepts_child(&self, child: &dyn MetaNode) -> bool {
        self.accepts(child.type_name(), child.sub_type(), child.name())
    }

    /// Required named rules (direct and inherited) not satisfied by any
    /// name in `existing`. An alias satisfies its rule. Wildcard rules
    /// carry no specific name and can never be missing. Sorted by name.
    pub fn missing_required_children(&self, existing: &HashSet<String>) -> Vec<&ChildRequirement> {
        let mut missing: Vec<&ChildRequirement> = self
            .direct_named
            .values()
            .chain(self.inherited_named.values())
            .filter(|req| req.required)
            .filter(|req| !existing.iter().any(|name| req.satisfied_by(name)))
            .collect();
        missing.sort_by(|a, b| a.name.cmp(&b.name));
        missing
    }

    /// Human-readable summary of every effective rule, for diagnostics.
    pub fn supported_children_description(&self) -> String {
        let mut lines: Vec<String> = self
            .direct_requirements()
            .chain(self.inherited_requirements())
            .map(|req| req.describe())
            .collect();
        if lines.is_empty() {
            return "No children supported".to_string();
        }
        lines.sort();
        lines.dedup();
        format!("Supports: {}", lines.join(", "))
    }

    /// Whether any wildcard rule is marked required. Such a rule can
    /// never be reported missing, so `verify()` flags it as suspicious.
    pub fn has_required_wildcard(&self) -> bool {
        self.direct_wildcard
            .iter()
            .chain(self.inherited_wildcard.iter())
            .any(|req| req.required)
    }
}

fn find_named<'a>(
    map: &'a HashMap<String, ChildRequirement>,
    child_type: &str,
    child_sub_type: &str,
    child_name: &str,
) -> Option<&'a ChildRequirement> {
    if let Some(req) = map.get(child_name) {
        if req.matches_type(child_type, child_sub_type) {
            return Some(req);
        }
    }
    // The child may arrive under an alias rather than a primary name.
    map.values().find(|req| {
        req.aliases.iter().any(|a| a == child_name)
            && req.matches_type(child_type, child_sub_type)
    })
}

fn find_wildcard<'a>(
    list: &'a [ChildRequirement],
    child_type: &str,
    child_sub_type: &str,
) -> Option<&'a ChildRequirement> {
    list.iter()
        .find(|req| req.matches_type(child_type, child_sub_type))
}
