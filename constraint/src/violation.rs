//! Constraint violation types.

use std::fmt;

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The constraint that was violated.
    pub constraint_id: String,
    /// Human-readable message describing the violation.
    pub message: String,
    /// Display name of the node involved, when known.
    pub node: Option<String>,
}

impl Violation {
    /// Create a new violation.
    pub fn new(constraint_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            constraint_id: constraint_id.into(),
            message: message.into(),
            node: None,
        }
    }

    /// Add the offending node's display name to the violation context.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "[{}] {} ({})", self.constraint_id, self.message, node),
            None => write!(f, "[{}] {}", self.constraint_id, self.message),
        }
    }
}

/// A collection of violations from checking one or more nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Absorb another collection.
    pub fn extend(&mut self, other: Violations) {
        self.violations.extend(other.violations);
    }

    /// Check if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// All violations as a slice.
    pub fn all(&self) -> &[Violation] {
        &self.violations
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}
