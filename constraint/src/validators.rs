//! Ready-made validation constraints for string-valued attributes.
//!
//! All three treat `Null` as passing: absence is the business of
//! required-child checks, not value validation. Non-string values fail,
//! since a node carrying an int where a string belongs is exactly what
//! these exist to catch.

use metakit_core::Value;
use metakit_registry::{NodePredicate, ValidationConstraint};
use regex_lite::Regex;

use crate::error::{ConstraintError, ConstraintResult};

/// Values must match a regular expression. The pattern is compiled up
/// front, so a malformed one is reported at registration time rather
/// than on first check.
pub fn matches_pattern(
    id: impl Into<String>,
    description: impl Into<String>,
    applies_to: NodePredicate,
    pattern: &str,
) -> ConstraintResult<ValidationConstraint> {
    let regex = Regex::new(pattern)
        .map_err(|e| ConstraintError::invalid_pattern(pattern, e.to_string()))?;
    Ok(ValidationConstraint::new(
        id,
        description,
        applies_to,
        move |_, value| match value {
            Value::Null => true,
            Value::String(s) => regex.is_match(s),
            _ => false,
        },
    ))
}

/// String length must fall within `min..=max`, counted in characters.
pub fn length_between(
    id: impl Into<String>,
    description: impl Into<String>,
    applies_to: NodePredicate,
    min: usize,
    max: usize,
) -> ValidationConstraint {
    ValidationConstraint::new(id, description, applies_to, move |_, value| match value {
        Value::Null => true,
        Value::String(s) => {
            let len = s.chars().count();
            min <= len && len <= max
        }
        _ => false,
    })
}

/// Values must be one of a fixed set of strings.
pub fn one_of(
    id: impl Into<String>,
    description: impl Into<String>,
    applies_to: NodePredicate,
    allowed: Vec<String>,
) -> ValidationConstraint {
    ValidationConstraint::new(id, description, applies_to, move |_, value| match value {
        Value::Null => true,
        Value::String(s) => allowed.iter().any(|a| a == s),
        _ => false,
    })
}
