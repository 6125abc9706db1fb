//! XML-like AST tag serialization
//!
//! ## Format
//!
//! - Node name → tag name
//! - Attributes → XML attributes, in key order
//! - Children → nested tags, two spaces per level
//! - A node without children is a self-closing tag
//!
//! ## Example
//!
//! ```text
//! <rosetta>
//!   <function name="is_valid">
//!     <identifier kind="type" value="Bool"/>
//!   </function>
//! </rosetta>
//! ```

use crate::rosetta::ast::{Ast, Node, NodeId};

/// Serialize a tree to tag format
pub fn serialize_ast_tag(ast: &Ast) -> String {
    let mut result = String::new();
    let mut pending = vec![Step::Open(ast.root(), 0)];

    while let Some(step) = pending.pop() {
        match step {
            Step::Open(id, indent_level) => {
                let node = ast.node(id);
                open_tag(node, indent_level, &mut result);
                if node.children().is_empty() {
                    result.push_str("/>\n");
                    continue;
                }
                result.push_str(">\n");
                pending.push(Step::Close(id, indent_level));
                for child in node.children().iter().rev() {
                    pending.push(Step::Open(*child, indent_level + 1));
                }
            }
            Step::Close(id, indent_level) => {
                let indent = "  ".repeat(indent_level);
                result.push_str(&format!("{}</{}>\n", indent, ast.node(id).name()));
            }
        }
    }

    if result.ends_with('\n') {
        result.pop();
    }
    result
}

/// Pending work while walking the tree
enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

fn open_tag(node: &Node, indent_level: usize, output: &mut String) {
    let indent = "  ".repeat(indent_level);
    output.push_str(&format!("{}<{}", indent, node.name()));
    for (key, value) in node.attributes() {
        output.push_str(&format!(" {}=\"{}\"", key, escape_xml(&value.to_string())));
    }
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_empty_tree() {
        let ast = Ast::new("rosetta");
        assert_eq!(serialize_ast_tag(&ast), "<rosetta/>");
    }

    #[test]
    fn test_serialize_nested_nodes() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let function = ast.create_child(root, "function");
        ast.set_attribute(function, "name", "is_valid");
        let ident = ast.create_child(function, "identifier");
        ast.set_attribute(ident, "value", "Bool");
        ast.set_attribute(ident, "kind", "type");

        insta::assert_snapshot!(serialize_ast_tag(&ast), @r###"
        <rosetta>
          <function name="is_valid">
            <identifier kind="type" value="Bool"/>
          </function>
        </rosetta>
        "###);
    }

    #[test]
    fn test_non_text_attributes() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        ast.set_attribute(root, "strict", true);
        ast.set_attribute(root, "version", 2.5);
        assert_eq!(
            serialize_ast_tag(&ast),
            "<rosetta strict=\"true\" version=\"2.5\"/>"
        );
    }

    #[test]
    fn test_xml_escaping() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        ast.set_attribute(root, "note", "a <b> & \"c\"");

        let result = serialize_ast_tag(&ast);
        assert!(result.contains("&lt;b&gt;"));
        assert!(result.contains("&amp;"));
        assert!(result.contains("&quot;c&quot;"));
    }

    #[test]
    fn test_siblings_after_nested_subtree() {
        let mut ast = Ast::new("rosetta");
        let root = ast.root();
        let outer = ast.create_child(root, "outer");
        let inner = ast.create_child(outer, "inner");
        ast.create_child(inner, "leaf");
        ast.create_child(outer, "after");
        ast.create_child(root, "last");

        insta::assert_snapshot!(serialize_ast_tag(&ast), @r###"
        <rosetta>
          <outer>
            <inner>
              <leaf/>
            </inner>
            <after/>
          </outer>
          <last/>
        </rosetta>
        "###);
    }
}
