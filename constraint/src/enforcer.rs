//! Constraint enforcement.

use metakit_core::{MetaNode, Value};
use metakit_registry::Registry;

use crate::error::{ConstraintError, ConstraintResult};
use crate::violation::{Violation, Violations};

/// Constraint id reported when a placement is rejected by the registry
/// shape rather than by an explicit placement constraint.
const PLACEMENT_FALLBACK_ID: &str = "placement";

/// Constraint enforcer.
///
/// Placement checks answer "may this child go under this parent";
/// value and uniqueness checks answer "is this node's content valid".
/// The fail-fast `check_*` methods suit mutation paths that abort on
/// the first problem; [`collect_violations`](Self::collect_violations)
/// gathers everything for reporting.
pub struct ConstraintEnforcer<'r> {
    registry: &'r Registry,
}

impl<'r> ConstraintEnforcer<'r> {
    /// Create a new constraint enforcer.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Check whether `child` may be placed under `parent`.
    ///
    /// Explicit placement constraints are consulted first: any matching
    /// forbid rejects immediately, otherwise any matching allow accepts.
    /// When no explicit constraint matches, the parent type's
    /// child-acceptance rules decide.
    pub fn check_placement(
        &self,
        parent: &dyn MetaNode,
        child: &dyn MetaNode,
    ) -> ConstraintResult<()> {
        let mut allowed = false;
        for constraint in self.registry.placement_constraints() {
            if constraint.applies_to_parent(parent) && constraint.matches_child(child) {
                if !constraint.is_allow() {
                    return Err(ConstraintError::violation(
                        constraint.id(),
                        format!(
                            "{} may not be placed under {}: {}",
                            child.display_name(),
                            parent.display_name(),
                            constraint.description()
                        ),
                    ));
                }
                allowed = true;
            }
        }
        if allowed {
            return Ok(());
        }

        match self.registry.get_type(&parent.type_key()) {
            Some(def) => {
                if def.accepts_child(child) {
                    Ok(())
                } else {
                    Err(ConstraintError::violation(
                        PLACEMENT_FALLBACK_ID,
                        format!(
                            "{} does not accept {}; {}",
                            parent.display_name(),
                            child.display_name(),
                            def.supported_children_description()
                        ),
                    ))
                }
            }
            None => Err(ConstraintError::violation(
                PLACEMENT_FALLBACK_ID,
                format!("unknown parent type {}", parent.type_key()),
            )),
        }
    }

    /// Check `value` against every validation constraint that applies to
    /// `node`, failing on the first violation.
    pub fn check_value(&self, node: &dyn MetaNode, value: &Value) -> ConstraintResult<()> {
        for constraint in self.registry.validation_constraints() {
            if constraint.applies_to(node) && !constraint.check(node, value) {
                return Err(ConstraintError::violation(
                    constraint.id(),
                    format!("{} (got {})", constraint.description(), value),
                ));
            }
        }
        Ok(())
    }

    /// Check `node` against every uniqueness constraint that applies to
    /// it, failing on the first set of duplicates.
    pub fn check_uniqueness(&self, node: &dyn MetaNode) -> ConstraintResult<()> {
        for constraint in self.registry.uniqueness_constraints() {
            if constraint.applies_to(node) {
                let duplicates = constraint.find_duplicates(node);
                if !duplicates.is_empty() {
                    return Err(ConstraintError::violation(
                        constraint.id(),
                        format!(
                            "duplicate {}: {}",
                            constraint.value_noun(),
                            duplicates.join(", ")
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Run every applicable validation and uniqueness constraint and
    /// gather all violations instead of stopping at the first.
    pub fn collect_violations(&self, node: &dyn MetaNode, value: &Value) -> Violations {
        let mut violations = Violations::new();

        for constraint in self.registry.validation_constraints() {
            if constraint.applies_to(node) && !constraint.check(node, value) {
                violations.push(
                    Violation::new(
                        constraint.id(),
                        format!("{} (got {})", constraint.description(), value),
                    )
                    .with_node(node.display_name()),
                );
            }
        }

        for constraint in self.registry.uniqueness_constraints() {
            if constraint.applies_to(node) {
                let duplicates = constraint.find_duplicates(node);
                if !duplicates.is_empty() {
                    violations.push(
                        Violation::new(
                            constraint.id(),
                            format!(
                                "duplicate {}: {}",
                                constraint.value_noun(),
                                duplicates.join(", ")
                            ),
                        )
                        .with_node(node.display_name()),
                    );
                }
            }
        }

        violations
    }
}
