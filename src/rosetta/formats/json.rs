//! JSON output
//!
//! The document has the shape of an [`AstSnapshot`](crate::rosetta::ast::AstSnapshot)
//! (`name`, then `attributes` and `children` when they are not empty) and
//! reads back into one. It is streamed through serde_json's
//! [`PrettyFormatter`] node by node instead of serializing a nested
//! snapshot, which would recurse once per level.

use super::FormatError;
use crate::rosetta::ast::{Ast, NodeId};
use serde::Serialize;
use serde_json::ser::{Formatter as _, PrettyFormatter};

enum Step {
    /// Write a node; the flag marks the first element of its parent's array
    Open { id: NodeId, first: bool },
    /// Close the children array and the object holding it
    Close { in_array: bool },
}

fn json_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::SerializationError(e.to_string())
}

fn write_value<T: Serialize + ?Sized>(out: &mut Vec<u8>, value: &T) -> Result<(), FormatError> {
    serde_json::to_writer(&mut *out, value).map_err(json_error)
}

fn write_entry<T: Serialize + ?Sized>(
    formatter: &mut PrettyFormatter,
    out: &mut Vec<u8>,
    key: &str,
    first: bool,
    value: &T,
) -> Result<(), FormatError> {
    formatter.begin_object_key(out, first).map_err(json_error)?;
    write_value(out, key)?;
    formatter.end_object_key(out).map_err(json_error)?;
    formatter.begin_object_value(out).map_err(json_error)?;
    write_value(out, value)?;
    formatter.end_object_value(out).map_err(json_error)
}

fn begin_key(formatter: &mut PrettyFormatter, out: &mut Vec<u8>, key: &str) -> Result<(), FormatError> {
    formatter.begin_object_key(out, false).map_err(json_error)?;
    write_value(out, key)?;
    formatter.end_object_key(out).map_err(json_error)?;
    formatter.begin_object_value(out).map_err(json_error)
}

/// Serialize a tree to pretty-printed JSON
pub fn to_json_str(ast: &Ast) -> Result<String, FormatError> {
    let mut out = Vec::new();
    let mut formatter = PrettyFormatter::new();
    let root = ast.root();
    let mut pending = vec![Step::Open {
        id: root,
        first: true,
    }];

    while let Some(step) = pending.pop() {
        match step {
            Step::Open { id, first } => {
                let in_array = id != root;
                if in_array {
                    formatter.begin_array_value(&mut out, first).map_err(json_error)?;
                }
                let node = ast.node(id);
                formatter.begin_object(&mut out).map_err(json_error)?;
                write_entry(&mut formatter, &mut out, "name", true, node.name())?;

                if !node.attributes().is_empty() {
                    begin_key(&mut formatter, &mut out, "attributes")?;
                    formatter.begin_object(&mut out).map_err(json_error)?;
                    for (i, (key, value)) in node.attributes().iter().enumerate() {
                        write_entry(&mut formatter, &mut out, key, i == 0, value)?;
                    }
                    formatter.end_object(&mut out).map_err(json_error)?;
                    formatter.end_object_value(&mut out).map_err(json_error)?;
                }

                if node.children().is_empty() {
                    formatter.end_object(&mut out).map_err(json_error)?;
                    if in_array {
                        formatter.end_array_value(&mut out).map_err(json_error)?;
                    }
                    continue;
                }

                begin_key(&mut formatter, &mut out, "children")?;
                formatter.begin_array(&mut out).map_err(json_error)?;
                pending.push(Step::Close { in_array });
                for (i, child) in node.children().iter().enumerate().rev() {
                    pending.push(Step::Open {
                        id: *child,
                        first: i == 0,
                    });
                }
            }
            Step::Close { in_array } => {
                formatter.end_array(&mut out).map_err(json_error)?;
                formatter.end_object_value(&mut out).map_err(json_error)?;
                formatter.end_object(&mut out).map_err(json_error)?;
                if in_array {
                    formatter.end_array_value(&mut out).map_err(json_error)?;
                }
            }
        }
    }

    String::from_utf8(out).map_err(json_error)
}
