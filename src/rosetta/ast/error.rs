//! Error types for AST operations

use std::fmt;

/// Errors raised when descending or ascending through scopes that do not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Nested append on a node that has no children to descend into
    NoLastChild { parent: String },
    /// Attempt to close the root scope
    ScopeUnderflow,
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::NoLastChild { parent } => {
                write!(f, "Node '{}' has no child to descend into", parent)
            }
            StructuralError::ScopeUnderflow => write!(f, "Cannot close the root scope"),
        }
    }
}

impl std::error::Error for StructuralError {}
