//! Fluent assertion API for AST nodes

use crate::rosetta::ast::{Ast, AttributeValue, NodeId};
use crate::rosetta::scanner::IDENTIFIER_NODE;

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder rooted at the tree's root node
pub fn assert_ast(ast: &Ast) -> NodeAssertion<'_> {
    NodeAssertion {
        ast,
        id: ast.root(),
        context: "root".to_string(),
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    ast: &'a Ast,
    id: NodeId,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        let actual = self.ast.node(self.id).name();
        assert_eq!(
            actual, expected,
            "{}: Expected node '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn attribute(self, key: &str, expected: impl Into<AttributeValue>) -> Self {
        let expected = expected.into();
        match self.ast.node(self.id).attribute(key) {
            Some(actual) => assert_eq!(
                actual, &expected,
                "{}: Expected attribute {}={}, found {}={}",
                self.context, key, expected, key, actual
            ),
            None => panic!(
                "{}: Expected attribute {}={}, but it is missing ({})",
                self.context,
                key,
                expected,
                summarize_attributes(self.ast, self.id)
            ),
        }
        self
    }

    pub fn no_attribute(self, key: &str) -> Self {
        assert!(
            self.ast.node(self.id).attribute(key).is_none(),
            "{}: Expected no attribute '{}' ({})",
            self.context,
            key,
            summarize_attributes(self.ast, self.id)
        );
        self
    }

    /// Shortcut for an `identifier` node with its kind and value
    pub fn identifier(self, kind: &str, value: &str) -> Self {
        self.name(IDENTIFIER_NODE)
            .attribute("kind", kind)
            .attribute("value", value)
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.ast.node(self.id).children().len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {} children: [{}]",
            self.context,
            expected,
            actual,
            self.ast.child_names(self.id).join(", ")
        );
        self
    }

    pub fn child_names(self, expected: &[&str]) -> Self {
        let actual = self.ast.child_names(self.id);
        assert_eq!(
            actual, expected,
            "{}: Unexpected children",
            self.context
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.ast.node(self.id).children();
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds (node has {} children)",
            self.context,
            index,
            children.len()
        );
        assertion(NodeAssertion {
            ast: self.ast,
            id: children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }
}

fn summarize_attributes(ast: &Ast, id: NodeId) -> String {
    let attributes = ast.node(id).attributes();
    if attributes.is_empty() {
        return "no attributes".to_string();
    }
    attributes
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ast() -> Ast {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let function = ast.create_child(root, "function");
        ast.set_attribute(function, "name", "check");
        let ident = ast.create_child(function, IDENTIFIER_NODE);
        ast.set_attribute(ident, "kind", "type");
        ast.set_attribute(ident, "value", "Bool");
        ast
    }

    #[test]
    fn test_passing_assertions() {
        assert_ast(&sample_ast())
            .name("rosetta")
            .child_names(&["function"])
            .child(0, |function| {
                function
                    .attribute("name", "check")
                    .no_attribute("access")
                    .child_count(1)
                    .child(0, |ident| {
                        ident.identifier("type", "Bool");
                    });
            });
    }

    #[test]
    #[should_panic(expected = "root.children[0]: Expected node 'body', found 'function'")]
    fn test_failure_names_the_path() {
        assert_ast(&sample_ast()).child(0, |node| {
            node.name("body");
        });
    }

    #[test]
    #[should_panic(expected = "but it is missing")]
    fn test_missing_attribute() {
        assert_ast(&sample_ast()).attribute("name", "x");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_child_out_of_bounds() {
        assert_ast(&sample_ast()).child(3, |_| {});
    }
}
