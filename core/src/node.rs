//! The registry's view of a metadata node.

use crate::TypeKey;

/// A typed node as the registry sees it.
///
/// The registry never owns nodes; the metadata tree (or a test double)
/// hands in anything that can report its type, subtype, and name.
pub trait MetaNode {
    /// Primary type name (e.g. `field`).
    fn type_name(&self) -> &str;

    /// Subtype name (e.g. `string`).
    fn sub_type(&self) -> &str;

    /// Node name (e.g. `maxLength`).
    fn name(&self) -> &str;

    /// Names of this node's direct children.
    ///
    /// Empty when the implementor does not track children; uniqueness
    /// checks over child names then see nothing to compare.
    fn child_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Key of this node's type.
    fn type_key(&self) -> TypeKey {
        TypeKey::new(self.type_name(), self.sub_type())
    }

    /// The `type.subType[name]` form used in messages.
    fn display_name(&self) -> String {
        format!("{}.{}[{}]", self.type_name(), self.sub_type(), self.name())
    }
}

/// Plain-data node description.
///
/// Lets a caller ask placement questions about a node that does not
/// exist yet (e.g. "would a maxLength attribute be accepted here?").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub type_name: String,
    pub sub_type: String,
    pub name: String,
}

impl NodeInfo {
    pub fn new(
        type_name: impl Into<String>,
        sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            sub_type: sub_type.into(),
            name: name.into(),
        }
    }
}

impl MetaNode for NodeInfo {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn sub_type(&self) -> &str {
        &self.sub_type
    }

    fn name(&self) -> &str {
        &self.name
    }
}
