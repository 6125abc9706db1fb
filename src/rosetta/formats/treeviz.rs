//! Treeviz formatter for parsed trees

use crate::rosetta::ast::{Ast, Node, NodeId};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn label(node: &Node) -> String {
    if node.attributes().is_empty() {
        return node.name().to_string();
    }
    let attributes = node
        .attributes()
        .iter()
        .map(|(key, value)| format!("{}={}", key, truncate(&value.to_string(), 30)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({})", node.name(), attributes)
}

pub fn to_treeviz_str(ast: &Ast) -> String {
    let root = ast.node(ast.root());
    let mut result = format!("{}\n", label(root));

    // (node, prefix of its line, last among its siblings)
    let mut pending: Vec<(NodeId, String, bool)> = Vec::new();
    push_children(&mut pending, root.children(), "");

    while let Some((id, prefix, is_last)) = pending.pop() {
        let connector = if is_last { "└─" } else { "├─" };
        let node = ast.node(id);
        result.push_str(&format!("{}{} {}\n", prefix, connector, label(node)));

        let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        push_children(&mut pending, node.children(), &new_prefix);
    }
    result
}

/// Queue children so the first one is popped first
fn push_children(pending: &mut Vec<(NodeId, String, bool)>, children: &[NodeId], prefix: &str) {
    for (i, child) in children.iter().enumerate().rev() {
        let is_last = i == children.len() - 1;
        pending.push((*child, prefix.to_string(), is_last));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only() {
        assert_eq!(to_treeviz_str(&Ast::new("rosetta")), "rosetta\n");
    }

    #[test]
    fn test_nested_tree() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let function = ast.create_child(root, "function");
        ast.set_attribute(function, "name", "is_valid");
        let ident = ast.create_child(function, "identifier");
        ast.set_attribute(ident, "kind", "type");
        ast.set_attribute(ident, "value", "Bool");
        ast.create_child(function, "body");
        ast.create_child(root, "trailer");

        insta::assert_snapshot!(to_treeviz_str(&ast), @r###"
        rosetta
        ├─ function (name=is_valid)
        │ ├─ identifier (kind=type, value=Bool)
        │ └─ body
        └─ trailer
        "###);
    }

    #[test]
    fn test_long_attribute_values_are_truncated() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let ident = ast.create_child(root, "identifier");
        ast.set_attribute(ident, "value", "a".repeat(40));
        let output = to_treeviz_str(&ast);
        assert!(output.contains(&format!("value={}...", "a".repeat(30))));
    }

    #[test]
    fn test_prefixes_continue_past_nested_subtree() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let outer = ast.create_child(root, "outer");
        let inner = ast.create_child(outer, "inner");
        ast.create_child(inner, "leaf");
        ast.create_child(outer, "after");
        let last = ast.create_child(root, "last");
        ast.create_child(last, "tail");

        insta::assert_snapshot!(to_treeviz_str(&ast), @r###"
        rosetta
        ├─ outer
        │ ├─ inner
        │ │ └─ leaf
        │ └─ after
        └─ last
          └─ tail
        "###);
    }
}
