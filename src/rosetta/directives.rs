//! Parse directives
//!
//! A keyword does not get to run arbitrary code against the scanner. Its
//! action is a [`Directive`]: plain data describing how scanning and the tree
//! should change once the keyword is recognized. The scanner is the only
//! place that interprets directives, which keeps every possible state change
//! listed in one enum.
//!
//! Directives deserialize from configuration, tagged by `op`:
//!
//! ```toml
//! directives = [
//!     { op = "open-scope", name = "function" },
//!     { op = "set-transition", transition = { kind = "capture", attribute = "name" } },
//! ]
//! ```

use crate::rosetta::ast::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether `ch` can close a token
///
/// Identifier characters are read into the token before anything else could
/// see them.
pub fn is_valid_boundary(ch: char) -> bool {
    !(ch.is_alphanumeric() || ch == '_')
}

/// What the scanner does with a token once it reaches a boundary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Transition {
    /// Look the token up in the keyword registry and apply its action
    #[default]
    Dispatch,
    /// Store the token as an attribute of the current scope, then go back to `Dispatch`
    Capture { attribute: String },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Dispatch => write!(f, "dispatch"),
            Transition::Capture { attribute } => write!(f, "capture({})", attribute),
        }
    }
}

/// A single change to scanner state or to the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Directive {
    /// Change the character that closes the next token
    SetBoundary { boundary: char },
    /// Change what happens to the next token
    SetTransition { transition: Transition },
    SetIgnoreWhitespace { enabled: bool },
    /// Append a child to the current scope without entering it
    AppendChild { name: String },
    /// Append a child under the current scope's last child
    AppendNested { name: String },
    /// Append a child to the current scope and enter it
    OpenScope { name: String },
    /// Leave the current scope
    CloseScope,
    /// Set an attribute on the current scope node
    SetAttribute { key: String, value: AttributeValue },
    /// Apply several directives in order
    Sequence { steps: Vec<Directive> },
}

impl Directive {
    pub fn set_boundary(boundary: char) -> Self {
        Directive::SetBoundary { boundary }
    }

    pub fn capture(attribute: impl Into<String>) -> Self {
        Directive::SetTransition {
            transition: Transition::Capture {
                attribute: attribute.into(),
            },
        }
    }

    pub fn open_scope(name: impl Into<String>) -> Self {
        Directive::OpenScope { name: name.into() }
    }

    pub fn append_child(name: impl Into<String>) -> Self {
        Directive::AppendChild { name: name.into() }
    }

    pub fn set_attribute(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Directive::SetAttribute {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Combine directives, collapsing a single step into itself
    pub fn sequence(steps: impl IntoIterator<Item = Directive>) -> Self {
        let mut steps: Vec<_> = steps.into_iter().collect();
        if steps.len() == 1 {
            steps.remove(0)
        } else {
            Directive::Sequence { steps }
        }
    }

    /// Leaf directives in application order
    pub fn flatten(&self) -> Vec<&Directive> {
        match self {
            Directive::Sequence { steps } => steps.iter().flat_map(Directive::flatten).collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::SetBoundary { boundary } => write!(f, "set-boundary {:?}", boundary),
            Directive::SetTransition { transition } => write!(f, "set-transition {}", transition),
            Directive::SetIgnoreWhitespace { enabled } => {
                write!(f, "set-ignore-whitespace {}", enabled)
            }
            Directive::AppendChild { name } => write!(f, "append-child {}", name),
            Directive::AppendNested { name } => write!(f, "append-nested {}", name),
            Directive::OpenScope { name } => write!(f, "open-scope {}", name),
            Directive::CloseScope => write!(f, "close-scope"),
            Directive::SetAttribute { key, value } => write!(f, "set-attribute {}={}", key, value),
            Directive::Sequence { steps } => {
                write!(f, "[")?;
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", step)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_collapses_single_step() {
        assert_eq!(
            Directive::sequence([Directive::set_boundary(' ')]),
            Directive::set_boundary(' ')
        );
        assert!(matches!(
            Directive::sequence([Directive::CloseScope, Directive::CloseScope]),
            Directive::Sequence { .. }
        ));
    }

    #[test]
    fn test_flatten_nested_sequences() {
        let directive = Directive::sequence([
            Directive::open_scope("function"),
            Directive::sequence([Directive::capture("name"), Directive::set_boundary('(')]),
        ]);
        let flat = directive.flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0], &Directive::open_scope("function"));
        assert_eq!(flat[2], &Directive::set_boundary('('));
    }

    #[test]
    fn test_display() {
        let directive = Directive::sequence([
            Directive::open_scope("function"),
            Directive::capture("name"),
        ]);
        assert_eq!(
            directive.to_string(),
            "[open-scope function, set-transition capture(name)]"
        );
        assert_eq!(Directive::set_boundary(' ').to_string(), "set-boundary ' '");
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"[
            {"op": "set-boundary", "boundary": " "},
            {"op": "set-transition", "transition": {"kind": "capture", "attribute": "type"}},
            {"op": "set-attribute", "key": "meta", "value": true},
            {"op": "close-scope"}
        ]"#;
        let directives: Vec<Directive> = serde_json::from_str(json).unwrap();
        assert_eq!(
            directives,
            vec![
                Directive::set_boundary(' '),
                Directive::capture("type"),
                Directive::set_attribute("meta", true),
                Directive::CloseScope,
            ]
        );
    }

    #[test]
    fn test_default_transition_is_dispatch() {
        assert_eq!(Transition::default(), Transition::Dispatch);
    }
}
