//! AST definitions for rosetta sources
//!
//! The tree lives in an arena ([`Ast`]) and nodes refer to each other through
//! [`NodeId`] indices. Every node is owned by the arena, children are listed
//! in source order, and nodes are never removed once attached.
//!
//! ## Modules
//!
//! - `node` - the arena, nodes and attribute values
//! - `snapshot` - owned, serializable copy of a tree
//! - `error` - structural errors raised while growing the tree

pub mod error;
pub mod node;
pub mod snapshot;

pub use error::StructuralError;
pub use node::{is_valid_name, Ast, AttributeValue, Node, NodeId};
pub use snapshot::AstSnapshot;
