//! Keyword registry
//!
//! The registry maps keyword names to their definitions. A definition carries
//! a [`Scope`] and an optional [`Directive`] that the scanner applies when the
//! keyword closes at a boundary.
//!
//! Scanners borrow a registry explicitly. For callers that want a single
//! process-wide instance there is [`KeywordRegistry::shared`], created lazily
//! on first access and seeded with the built-in keywords exactly once.
//!
//! ## Built-in keywords
//!
//! - `public` (global): `set-boundary ' '`. In `public:Bool name` the access
//!   modifier is closed by the colon, and the type that follows is closed by
//!   a space instead of another colon.

use crate::rosetta::ast::is_valid_name;
use crate::rosetta::directives::{is_valid_boundary, Directive, Transition};
use crate::rosetta::error::ConfigurationError;
use crate::rosetta::patterns::{PatternTable, COMMON_VARIABLE, TYPING};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Where a keyword may be recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Recognized at any depth
    Global,
    /// Recognized only inside an opened scope
    Local,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Local => write!(f, "local"),
        }
    }
}

/// A registered keyword
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordDefinition {
    name: String,
    scope: Scope,
    action: Option<Directive>,
}

impl KeywordDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn action(&self) -> Option<&Directive> {
        self.action.as_ref()
    }

    /// Whether the keyword may be recognized at the given scope depth
    ///
    /// Depth 0 is the root of the tree.
    pub fn visible_at(&self, depth: usize) -> bool {
        match self.scope {
            Scope::Global => true,
            Scope::Local => depth > 0,
        }
    }
}

impl fmt::Display for KeywordDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword name: {}", self.name)
    }
}

static SHARED: Lazy<RwLock<KeywordRegistry>> = Lazy::new(|| RwLock::new(KeywordRegistry::new()));

/// Keyword name to definition mapping
#[derive(Debug, Clone)]
pub struct KeywordRegistry {
    keywords: HashMap<String, KeywordDefinition>,
}

impl KeywordRegistry {
    /// Create a registry seeded with the built-in keywords
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.seed_builtins();
        registry
    }

    /// Create a registry without any keywords
    pub fn empty() -> Self {
        KeywordRegistry {
            keywords: HashMap::new(),
        }
    }

    /// The process-wide registry
    pub fn shared() -> &'static RwLock<KeywordRegistry> {
        &SHARED
    }

    fn seed_builtins(&mut self) {
        self.keywords.insert(
            "public".to_string(),
            KeywordDefinition {
                name: "public".to_string(),
                scope: Scope::Global,
                action: Some(Directive::set_boundary(' ')),
            },
        );
    }

    /// Exact, case-sensitive lookup; `None` means the token is not a keyword
    pub fn get_keyword(&self, name: &str) -> Option<&KeywordDefinition> {
        self.keywords.get(name)
    }

    /// Register or overwrite a keyword
    ///
    /// The name must read as an identifier under the standard patterns; use
    /// [`set_keyword_with`](Self::set_keyword_with) when scanning with
    /// overridden ones.
    pub fn set_keyword(
        &mut self,
        name: &str,
        scope: Scope,
        action: Option<Directive>,
    ) -> Result<&KeywordDefinition, ConfigurationError> {
        self.set_keyword_with(PatternTable::standard(), name, scope, action)
    }

    /// Register or overwrite a keyword whose name is checked against `patterns`
    pub fn set_keyword_with(
        &mut self,
        patterns: &PatternTable,
        name: &str,
        scope: Scope,
        action: Option<Directive>,
    ) -> Result<&KeywordDefinition, ConfigurationError> {
        validate_name(name, patterns)?;
        if let Some(action) = &action {
            validate_action(name, action)?;
        }

        let definition = KeywordDefinition {
            name: name.to_string(),
            scope,
            action,
        };
        self.keywords.insert(name.to_string(), definition);
        Ok(&self.keywords[name])
    }

    /// Fail on the first keyword (by name) that `patterns` cannot accumulate
    pub fn check_names(&self, patterns: &PatternTable) -> Result<(), ConfigurationError> {
        self.names()
            .into_iter()
            .try_for_each(|name| validate_name(name, patterns))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keywords.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.keywords.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions sorted by name
    pub fn definitions(&self) -> Vec<&KeywordDefinition> {
        let mut definitions: Vec<_> = self.keywords.values().collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A keyword has to be something the scanner can accumulate
fn validate_name(name: &str, patterns: &PatternTable) -> Result<(), ConfigurationError> {
    if patterns.matches(TYPING, name)? || patterns.matches(COMMON_VARIABLE, name)? {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidKeywordName(name.to_string()))
    }
}

fn validate_action(keyword: &str, action: &Directive) -> Result<(), ConfigurationError> {
    let malformed = |reason: String| ConfigurationError::MalformedAction {
        keyword: keyword.to_string(),
        reason,
    };

    for step in action.flatten() {
        match step {
            Directive::SetBoundary { boundary } if !is_valid_boundary(*boundary) => {
                return Err(malformed(format!(
                    "boundary {:?} would be read as part of a token",
                    boundary
                )));
            }
            Directive::SetTransition {
                transition: Transition::Capture { attribute },
            } if !is_valid_name(attribute) => {
                return Err(malformed(format!(
                    "capture attribute {:?} is not a valid attribute name",
                    attribute
                )));
            }
            Directive::AppendChild { name }
            | Directive::AppendNested { name }
            | Directive::OpenScope { name }
                if !is_valid_name(name) =>
            {
                return Err(malformed(format!("{:?} is not a valid node name", name)));
            }
            Directive::SetAttribute { key, .. } if !is_valid_name(key) => {
                return Err(malformed(format!(
                    "{:?} is not a valid attribute name",
                    key
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_public_keyword() {
        let registry = KeywordRegistry::new();
        let public = registry.get_keyword("public").unwrap();
        assert_eq!(public.name(), "public");
        assert_eq!(public.scope(), Scope::Global);
        assert_eq!(public.action(), Some(&Directive::set_boundary(' ')));
        assert_eq!(public.to_string(), "Keyword name: public");
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let registry = KeywordRegistry::new();
        assert!(registry.get_keyword("private").is_none());
        assert!(registry.get_keyword("Public").is_none());
        assert!(registry.get_keyword("").is_none());
    }

    #[test]
    fn test_set_then_get() {
        let mut registry = KeywordRegistry::new();
        let created = registry.set_keyword("x", Scope::Local, None).unwrap();
        assert_eq!(created.name(), "x");

        let found = registry.get_keyword("x").unwrap();
        assert_eq!(found.name(), "x");
        assert_eq!(found.scope(), Scope::Local);
        assert!(found.action().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut registry = KeywordRegistry::new();
        registry
            .set_keyword("public", Scope::Local, Some(Directive::set_boundary(';')))
            .unwrap();
        assert_eq!(registry.len(), 1);
        let public = registry.get_keyword("public").unwrap();
        assert_eq!(public.scope(), Scope::Local);
        assert_eq!(public.action(), Some(&Directive::set_boundary(';')));
    }

    #[test]
    fn test_empty_registry_has_no_builtins() {
        let registry = KeywordRegistry::empty();
        assert!(registry.is_empty());
        assert!(!registry.contains("public"));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut registry = KeywordRegistry::new();
        for name in ["", "9lives", "has space", "dash-ed"] {
            assert_eq!(
                registry.set_keyword(name, Scope::Global, None).map(|_| ()),
                Err(ConfigurationError::InvalidKeywordName(name.to_string()))
            );
        }
    }

    #[test]
    fn test_malformed_actions_rejected() {
        let mut registry = KeywordRegistry::new();
        let bad = [
            Directive::set_boundary('a'),
            Directive::sequence([Directive::CloseScope, Directive::set_boundary('_')]),
            Directive::capture(""),
            Directive::open_scope(""),
            Directive::set_attribute("", true),
            Directive::append_child("a b"),
            Directive::open_scope("<x"),
            Directive::sequence([Directive::CloseScope, Directive::capture("two words")]),
            Directive::set_attribute("x=\"1\"", true),
        ];
        for action in bad {
            let result = registry.set_keyword("broken", Scope::Global, Some(action));
            assert!(
                matches!(result, Err(ConfigurationError::MalformedAction { .. })),
                "expected malformed action, got {:?}",
                result
            );
        }
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_names_checked_against_given_patterns() {
        let digits_first =
            PatternTable::with_overrides([(COMMON_VARIABLE, r"^[a-z0-9_][a-z0-9_]*$")]).unwrap();
        let mut registry = KeywordRegistry::empty();
        assert!(registry.set_keyword("2d", Scope::Global, None).is_err());
        registry
            .set_keyword_with(&digits_first, "2d", Scope::Global, None)
            .unwrap();
        assert!(registry.contains("2d"));

        assert_eq!(registry.check_names(&digits_first), Ok(()));
        assert_eq!(
            registry.check_names(PatternTable::standard()),
            Err(ConfigurationError::InvalidKeywordName("2d".to_string()))
        );
    }

    #[test]
    fn test_builtin_name_rejected_by_narrower_patterns() {
        let uppercase_only =
            PatternTable::with_overrides([(COMMON_VARIABLE, r"^[A-Z]+$")]).unwrap();
        assert_eq!(
            KeywordRegistry::new().check_names(&uppercase_only),
            Err(ConfigurationError::InvalidKeywordName("public".to_string()))
        );
    }

    #[test]
    fn test_visibility_by_scope() {
        let mut registry = KeywordRegistry::empty();
        registry.set_keyword("ret", Scope::Local, None).unwrap();
        registry.set_keyword("fn_", Scope::Global, None).unwrap();

        let ret = registry.get_keyword("ret").unwrap();
        assert!(!ret.visible_at(0));
        assert!(ret.visible_at(1));
        assert!(registry.get_keyword("fn_").unwrap().visible_at(0));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = KeywordRegistry::new();
        registry.set_keyword("ret", Scope::Local, None).unwrap();
        registry.set_keyword("class", Scope::Global, None).unwrap();
        assert_eq!(registry.names(), vec!["class", "public", "ret"]);
        let definitions: Vec<_> = registry.definitions().iter().map(|d| d.name()).collect();
        assert_eq!(definitions, vec!["class", "public", "ret"]);
    }

    #[test]
    fn test_shared_registry_is_single_instance() {
        let first = KeywordRegistry::shared();
        let second = KeywordRegistry::shared();
        assert!(std::ptr::eq(first, second));

        let registry = first.read().unwrap();
        assert!(registry.contains("public"));
        assert_eq!(
            registry.names().iter().filter(|n| **n == "public").count(),
            1
        );
    }
}
