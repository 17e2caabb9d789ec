//! Type identity.

use std::fmt;
use thiserror::Error;

/// Error raised when a qualified type name cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Empty type key")]
    Empty,
    #[error("Expected 'type.subType', got '{0}'")]
    MissingSubType(String),
    #[error("Empty segment in type key '{0}'")]
    EmptySegment(String),
}

/// Identity of a type definition: primary type name plus subtype name.
///
/// A key like `field.string` names the `string` subtype of the `field`
/// type. Keys are plain values; two keys name the same type exactly when
/// both segments are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    type_name: String,
    sub_type: String,
}

impl TypeKey {
    pub fn new(type_name: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            sub_type: sub_type.into(),
        }
    }

    /// Primary type name (e.g. `field`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Subtype name (e.g. `string`).
    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    /// The `type.subType` form used as the unique key and in messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.type_name, self.sub_type)
    }

    /// Parse a qualified `type.subType` name.
    pub fn parse(qualified: &str) -> Result<Self, ParseKeyError> {
        if qualified.is_empty() {
            return Err(ParseKeyError::Empty);
        }
        let (type_name, sub_type) = qualified
            .split_once('.')
            .ok_or_else(|| ParseKeyError::MissingSubType(qualified.to_string()))?;
        if type_name.is_empty() || sub_type.is_empty() {
            return Err(ParseKeyError::EmptySegment(qualified.to_string()));
        }
        Ok(Self::new(type_name, sub_type))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.sub_type)
    }
}

/// Opaque identifier of the implementation backing a type definition.
///
/// The registry never inspects or invokes the behavior behind this
/// identifier; it only stores it and compares it to tell re-registration
/// of the same definition apart from a genuine clash. Resolving the
/// identifier to concrete behavior is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImplId(String);

impl ImplId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImplId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImplId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ImplId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
