//! MetaKit Constraint
//!
//! Enforce registry constraints against live nodes.
//!
//! Responsibilities:
//! - Decide node placement: explicit allow/forbid rules first, then the
//!   parent type's child-acceptance shape
//! - Check values against validation constraints
//! - Detect duplicates under uniqueness constraints
//! - Produce meaningful violation messages

mod enforcer;
mod error;
mod validators;
mod violation;

pub use enforcer::ConstraintEnforcer;
pub use error::{ConstraintError, ConstraintResult};
pub use validators::{length_between, matches_pattern, one_of};
pub use violation::{Violation, Violations};
