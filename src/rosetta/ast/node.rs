//! Arena-backed AST nodes
//!
//! A parse grows exactly one [`Ast`]. The root is created with the tree and
//! keyword actions append children under whichever scope the scanner is in.

use super::error::StructuralError;
use super::snapshot::AstSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Index of a node inside its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Scalar value stored under an attribute key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(value) => write!(f, "{}", value),
            AttributeValue::Number(value) => write!(f, "{}", value),
            AttributeValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Whether `name` can be used as a node name or attribute key
///
/// Names end up as tag and attribute names in the tag format, so they follow
/// XML's rules restricted to ASCII: a letter or `_`, then letters, digits,
/// `_`, `-` or `.`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        }
        _ => false,
    }
}

/// A named node with attributes and ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    attributes: BTreeMap<String, AttributeValue>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Children in the order they were appended
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Most recently appended child
    pub fn last_child(&self) -> Option<NodeId> {
        self.children.last().copied()
    }
}

/// The tree produced by one parse
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// Create a tree holding only a root node
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_name.into(), None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Look up a node
    ///
    /// Ids are only ever handed out by the tree they index, so a foreign id
    /// is a caller bug and panics.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a new child under `parent` and return it
    ///
    /// The new node becomes `parent`'s last child.
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a new child under `parent`'s last child
    pub fn create_nested_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, StructuralError> {
        let last = self
            .last_child(parent)
            .ok_or_else(|| StructuralError::NoLastChild {
                parent: self.node(parent).name.clone(),
            })?;
        Ok(self.create_child(last, name))
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child()
    }

    /// Store an attribute, returning the value it replaced
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.nodes[id.0].attributes.insert(key.into(), value.into())
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).parent;
        }
        depth
    }

    /// Child names of `id`, in order
    pub fn child_names(&self, id: NodeId) -> Vec<&str> {
        self.node(id)
            .children
            .iter()
            .map(|child| self.node(*child).name())
            .collect()
    }

    /// Owned copy of the subtree rooted at `id`
    ///
    /// Built with an explicit work stack; nesting depth is bounded only by
    /// the input, so the walk must not use the call stack.
    pub fn snapshot_of(&self, id: NodeId) -> AstSnapshot {
        let mut built = vec![self.bare_snapshot(id)];
        let mut pending = vec![(id, 0usize)];

        while let Some(&(current, next)) = pending.last() {
            match self.node(current).children.get(next).copied() {
                Some(child) => {
                    let top = pending.len() - 1;
                    pending[top].1 += 1;
                    built.push(self.bare_snapshot(child));
                    pending.push((child, 0));
                }
                None => {
                    pending.pop();
                    if built.len() > 1 {
                        if let Some(done) = built.pop() {
                            if let Some(parent) = built.last_mut() {
                                parent.children.push(done);
                            }
                        }
                    }
                }
            }
        }

        // the frame for `id` is never popped
        built.remove(0)
    }

    fn bare_snapshot(&self, id: NodeId) -> AstSnapshot {
        let node = self.node(id);
        let mut snapshot = AstSnapshot::new(node.name.clone());
        snapshot.attributes = node.attributes.clone();
        snapshot
    }

    /// Owned copy of the whole tree
    pub fn snapshot(&self) -> AstSnapshot {
        self.snapshot_of(self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["rosetta", "function", "_x", "a-b.c", "Node2"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
        for name in ["", "a b", "<x", "2nd", "-a", "a\"b", "ünïcode"] {
            assert!(!is_valid_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let ast = Ast::new("rosetta");
        assert_eq!(ast.node(ast.root()).name(), "rosetta");
        assert_eq!(ast.node_count(), 1);
        assert_eq!(ast.last_child(ast.root()), None);
        assert_eq!(ast.node(ast.root()).parent(), None);
    }

    #[test]
    fn test_create_child_becomes_last_child() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let a = ast.create_child(root, "a");
        assert_eq!(ast.last_child(root), Some(a));
        assert_eq!(ast.node(a).name(), "a");

        let b = ast.create_child(root, "b");
        assert_eq!(ast.last_child(root), Some(b));
        assert_eq!(ast.child_names(root), vec!["a", "b"]);
    }

    #[test]
    fn test_create_nested_child_descends_into_last_child() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let a = ast.create_child(root, "a");
        let b = ast.create_nested_child(root, "b").unwrap();

        assert_eq!(ast.child_names(root), vec!["a"]);
        assert_eq!(ast.child_names(a), vec!["b"]);
        assert_eq!(ast.node(b).parent(), Some(a));
        assert_eq!(ast.depth(b), 2);
    }

    #[test]
    fn test_create_nested_child_without_children_fails() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        assert_eq!(
            ast.create_nested_child(root, "b"),
            Err(StructuralError::NoLastChild {
                parent: "rosetta".to_string()
            })
        );
        assert_eq!(ast.node_count(), 1);
    }

    #[test]
    fn test_attribute_last_write_wins() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        assert_eq!(ast.set_attribute(root, "access", "public"), None);
        let previous = ast.set_attribute(root, "access", "private");
        assert_eq!(previous, Some(AttributeValue::from("public")));
        assert_eq!(
            ast.node(root).attribute("access").and_then(AttributeValue::as_text),
            Some("private")
        );
    }

    #[test]
    fn test_attribute_scalar_kinds() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        ast.set_attribute(root, "count", 2.0);
        ast.set_attribute(root, "meta", true);
        assert_eq!(ast.node(root).attribute("count"), Some(&AttributeValue::Number(2.0)));
        assert_eq!(ast.node(root).attribute("meta"), Some(&AttributeValue::Bool(true)));
        assert_eq!(ast.node(root).attribute("meta").unwrap().to_string(), "true");
    }

    #[test]
    fn test_snapshot_mirrors_tree() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let function = ast.create_child(root, "function");
        ast.set_attribute(function, "name", "is_valid_color");
        ast.create_child(function, "parameter");

        let snapshot = ast.snapshot();
        assert_eq!(snapshot.name, "rosetta");
        assert_eq!(snapshot.children.len(), 1);
        assert_eq!(snapshot.children[0].name, "function");
        assert_eq!(snapshot.children[0].children[0].name, "parameter");
        assert_eq!(
            snapshot.children[0].attributes.get("name"),
            Some(&AttributeValue::from("is_valid_color"))
        );
    }

    #[test]
    fn test_snapshot_keeps_sibling_order_below_nested_scopes() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let a = ast.create_child(root, "a");
        let a1 = ast.create_child(a, "a1");
        ast.create_child(a1, "a1x");
        ast.create_child(a, "a2");
        ast.create_child(root, "b");

        let snapshot = ast.snapshot();
        let names: Vec<_> = snapshot.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        let nested: Vec<_> = snapshot.children[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(nested, vec!["a1", "a2"]);
        assert_eq!(snapshot.children[0].children[0].children[0].name, "a1x");
        assert_eq!(snapshot.count(), 6);

        let subtree = ast.snapshot_of(a1);
        assert_eq!(subtree.name, "a1");
        assert_eq!(subtree.count(), 2);
    }

    #[test]
    fn test_snapshot_of_deep_chain() {
        let mut ast = Ast::new("rosetta");
        let mut current = ast.root();
        for _ in 0..100_000 {
            current = ast.create_child(current, "function");
        }
        assert_eq!(ast.depth(current), 100_000);

        let snapshot = ast.snapshot();
        assert_eq!(snapshot.count(), 100_001);
    }
}
