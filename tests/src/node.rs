//! An owned metadata node for tests.

use metakit_core::MetaNode;

/// A metadata node that owns its children.
///
/// The production metadata tree is out of scope for this workspace;
/// this stand-in reports exactly what the registry consumes: identity
/// plus direct child names.
#[derive(Debug, Clone)]
pub struct TestNode {
    type_name: String,
    sub_type: String,
    name: String,
    children: Vec<TestNode>,
}

impl TestNode {
    pub fn new(
        type_name: impl Into<String>,
        sub_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            sub_type: sub_type.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Attach a child, without consulting any registry. Tests decide
    /// which trees to build, legal or not.
    pub fn child(mut self, child: TestNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(&self) -> &[TestNode] {
        &self.children
    }
}

impl MetaNode for TestNode {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn sub_type(&self) -> &str {
        &self.sub_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== TEST: fixture basics ==========

    #[test]
    fn test_node_reports_identity_and_children() {
        // GIVEN
        let node = TestNode::new("object", "pojo", "user")
            .child(TestNode::new("field", "string", "name"))
            .child(TestNode::new("field", "int", "age"));

        // THEN
        assert_eq!(node.display_name(), "object.pojo[user]");
        assert_eq!(node.child_names(), ["name", "age"]);
        assert_eq!(node.children().len(), 2);
    }
}
