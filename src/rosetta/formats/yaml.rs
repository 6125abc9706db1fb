//! YAML output
//!
//! Block-style YAML with the layout serde_yaml gives an
//! [`AstSnapshot`](crate::rosetta::ast::AstSnapshot):
//!
//! ```text
//! name: rosetta
//! children:
//! - name: function
//!   attributes:
//!     name: is_valid
//! ```
//!
//! Lines are written from an explicit work stack so deep trees do not
//! recurse. Every scalar goes through serde_yaml, which decides on quoting.

use super::FormatError;
use crate::rosetta::ast::{Ast, NodeId};
use serde::Serialize;

fn yaml_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::SerializationError(e.to_string())
}

/// A scalar as serde_yaml writes it, kept on a single line
fn scalar<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    let text = serde_yaml::to_string(value).map_err(yaml_error)?;
    let text = text.trim_end_matches('\n');
    if text.contains('\n') {
        // block scalars need their own indentation; a JSON string is a
        // valid double-quoted YAML scalar
        serde_json::to_string(value).map_err(yaml_error)
    } else {
        Ok(text.to_string())
    }
}

/// Serialize a tree to YAML
pub fn to_yaml_str(ast: &Ast) -> Result<String, FormatError> {
    let mut result = String::new();
    // (node, column of its keys, written as a sequence item)
    let mut pending: Vec<(NodeId, usize, bool)> = vec![(ast.root(), 0, false)];

    while let Some((id, column, is_item)) = pending.pop() {
        let node = ast.node(id);
        let indent = " ".repeat(column);
        if is_item {
            result.push_str(&" ".repeat(column - 2));
            result.push_str("- ");
        } else {
            result.push_str(&indent);
        }
        result.push_str(&format!("name: {}\n", scalar(node.name())?));

        if !node.attributes().is_empty() {
            result.push_str(&format!("{}attributes:\n", indent));
            for (key, value) in node.attributes() {
                result.push_str(&format!("{}  {}: {}\n", indent, scalar(key)?, scalar(value)?));
            }
        }

        if !node.children().is_empty() {
            result.push_str(&format!("{}children:\n", indent));
            for child in node.children().iter().rev() {
                pending.push((*child, column + 2, true));
            }
        }
    }
    Ok(result)
}
