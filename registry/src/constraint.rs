//! Constraint definitions held by the registry.
//!
//! These are definitions only: the matching helpers here say whether a
//! constraint is in scope for a node, and evaluation order lives in the
//! enforcer crate.

use metakit_core::{segment_matches, MetaNode, Value, WILDCARD};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A labelled predicate over nodes.
///
/// The label travels into diagnostics, so prefer the `pattern`
/// constructor where a pattern can express the test.
#[derive(Clone)]
pub struct NodePredicate {
    label: String,
    test: Arc<dyn Fn(&dyn MetaNode) -> bool + Send + Sync>,
}

impl NodePredicate {
    pub fn new(
        label: impl Into<String>,
        test: impl Fn(&dyn MetaNode) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Predicate from a `type.subType[name]` pattern with `*` wildcards.
    ///
    /// The subtype and the `[name]` suffix may be omitted; each omitted
    /// part matches anything. `"field"` matches every field node,
    /// `"field.string"` every string field, `"attr.int[maxLength]"` only
    /// int attributes named maxLength.
    pub fn pattern(pattern: &str) -> Self {
        let (type_part, name) = match pattern.find('[') {
            Some(open) if pattern.ends_with(']') => (
                &pattern[..open],
                pattern[open + 1..pattern.len() - 1].to_string(),
            ),
            _ => (pattern, WILDCARD.to_string()),
        };
        let (type_name, sub_type) = match type_part.split_once('.') {
            Some((t, s)) => (t.to_string(), s.to_string()),
            None => (type_part.to_string(), WILDCARD.to_string()),
        };
        let label = format!("{}.{}[{}]", type_name, sub_type, name);
        Self {
            label,
            test: Arc::new(move |node: &dyn MetaNode| {
                segment_matches(&type_name, node.type_name())
                    && segment_matches(&sub_type, node.sub_type())
                    && segment_matches(&name, node.name())
            }),
        }
    }

    /// Predicate matching every node.
    pub fn any() -> Self {
        Self::new("*", |_| true)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, node: &dyn MetaNode) -> bool {
        (self.test)(node)
    }
}

impl fmt::Debug for NodePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePredicate")
            .field("label", &self.label)
            .finish()
    }
}

/// Allows or forbids a parent/child pairing, independently of the
/// parent's own child requirements.
#[derive(Debug, Clone)]
pub struct PlacementConstraint {
    id: String,
    description: String,
    parent: NodePredicate,
    child: NodePredicate,
    allowed: bool,
}

impl PlacementConstraint {
    /// A constraint permitting the pairing.
    pub fn allow(
        id: impl Into<String>,
        description: impl Into<String>,
        parent: NodePredicate,
        child: NodePredicate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            parent,
            child,
            allowed: true,
        }
    }

    /// A constraint rejecting the pairing. Forbid constraints win over
    /// allow constraints.
    pub fn forbid(
        id: impl Into<String>,
        description: impl Into<String>,
        parent: NodePredicate,
        child: NodePredicate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            parent,
            child,
            allowed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_allow(&self) -> bool {
        self.allowed
    }

    pub fn applies_to_parent(&self, parent: &dyn MetaNode) -> bool {
        self.parent.test(parent)
    }

    pub fn matches_child(&self, child: &dyn MetaNode) -> bool {
        self.child.test(child)
    }
}

/// Judges a value proposed for a node. All applicable validation
/// constraints must pass; there is no priority among them.
#[derive(Clone)]
pub struct ValidationConstraint {
    id: String,
    description: String,
    applies_to: NodePredicate,
    check: Arc<dyn Fn(&dyn MetaNode, &Value) -> bool + Send + Sync>,
}

impl ValidationConstraint {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        applies_to: NodePredicate,
        check: impl Fn(&dyn MetaNode, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            applies_to,
            check: Arc::new(check),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn applies_to(&self, node: &dyn MetaNode) -> bool {
        self.applies_to.test(node)
    }

    /// True when the value is acceptable.
    pub fn check(&self, node: &dyn MetaNode, value: &Value) -> bool {
        (self.check)(node, value)
    }
}

impl fmt::Debug for ValidationConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationConstraint")
            .field("id", &self.id)
            .field("applies_to", &self.applies_to.label)
            .finish()
    }
}

/// Requires values extracted from a node (typically its child names)
/// to be free of duplicates.
#[derive(Clone)]
pub struct UniquenessConstraint {
    id: String,
    description: String,
    applies_to: NodePredicate,
    /// Plural noun for the extracted values, used in messages
    /// ("duplicate child names: ...").
    value_noun: String,
    extract: Arc<dyn Fn(&dyn MetaNode) -> Vec<String> + Send + Sync>,
}

impl UniquenessConstraint {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        applies_to: NodePredicate,
        value_noun: impl Into<String>,
        extract: impl Fn(&dyn MetaNode) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            applies_to,
            value_noun: value_noun.into(),
            extract: Arc::new(extract),
        }
    }

    /// The common case: a node's direct children must have unique names.
    pub fn of_child_names(
        id: impl Into<String>,
        description: impl Into<String>,
        applies_to: NodePredicate,
    ) -> Self {
        Self::new(id, description, applies_to, "child names", |node| {
            node.child_names()
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value_noun(&self) -> &str {
        &self.value_noun
    }

    pub fn applies_to(&self, node: &dyn MetaNode) -> bool {
        self.applies_to.test(node)
    }

    /// Every value extracted from the node that occurs more than once,
    /// sorted, each reported once.
    pub fn find_duplicates(&self, node: &dyn MetaNode) -> Vec<String> {
        let values = (self.extract)(node);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in &values {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }
        let mut duplicates: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(value, _)| value.to_string())
            .collect();
        duplicates.sort();
        duplicates
    }
}

impl fmt::Debug for UniquenessConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniquenessConstraint")
            .field("id", &self.id)
            .field("applies_to", &self.applies_to.label)
            .finish()
    }
}

/// Any registrable constraint.
#[derive(Debug, Clone)]
pub enum Constraint {
    Placement(PlacementConstraint),
    Validation(ValidationConstraint),
    Uniqueness(UniquenessConstraint),
}

impl Constraint {
    pub fn id(&self) -> &str {
        match self {
            Constraint::Placement(c) => c.id(),
            Constraint::Validation(c) => c.id(),
            Constraint::Uniqueness(c) => c.id(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Constraint::Placement(c) => c.description(),
            Constraint::Validation(c) => c.description(),
            Constraint::Uniqueness(c) => c.description(),
        }
    }
}

impl From<PlacementConstraint> for Constraint {
    fn from(c: PlacementConstraint) -> Self {
        Constraint::Placement(c)
    }
}

impl From<ValidationConstraint> for Constraint {
    fn from(c: ValidationConstraint) -> Self {
        Constraint::Validation(c)
    }
}

impl From<UniquenessConstraint> for Constraint {
    fn from(c: UniquenessConstraint) -> Self {
        Constraint::Uniqueness(c)
    }
}
