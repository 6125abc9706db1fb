//! AST Snapshot - an owned, serializable copy of a tree
//!
//! The json and yaml formats serialize snapshots so they never see the
//! arena. Attributes are kept in key order.

use super::node::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A snapshot of an AST node and everything below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstSnapshot {
    /// Node name (the tag in the tag format)
    pub name: String,

    /// Scalar attributes, sorted by key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,

    /// Child nodes in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: AstSnapshot) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of nodes in this snapshot
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(snapshot) = pending.pop() {
            count += 1;
            pending.extend(snapshot.children.iter());
        }
        count
    }
}

// Drop children level by level instead of recursively, so a deeply nested
// snapshot cannot exhaust the stack when it goes away.
impl Drop for AstSnapshot {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_count() {
        let snapshot = AstSnapshot::new("rosetta")
            .with_child(AstSnapshot::new("identifier").with_attribute("value", "Bool"))
            .with_child(AstSnapshot::new("function").with_child(AstSnapshot::new("body")));
        assert_eq!(snapshot.count(), 4);
    }

    #[test]
    fn test_json_omits_empty_collections() {
        let snapshot = AstSnapshot::new("rosetta").with_attribute("version", 1.0);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"name":"rosetta","attributes":{"version":1.0}}"#);

        let back: AstSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
