//! Wildcard matching for type and name patterns.

/// The wildcard segment. Matches any value wherever a pattern is accepted.
pub const WILDCARD: &str = "*";

/// Check whether a pattern segment is the wildcard.
pub fn is_wildcard(segment: &str) -> bool {
    segment == WILDCARD
}

/// Match a concrete value against a pattern segment.
///
/// The wildcard matches anything; any other pattern must match exactly.
pub fn segment_matches(pattern: &str, value: &str) -> bool {
    is_wildcard(pattern) || pattern == value
}
