//! Character classification table
//!
//! The scanner never matches characters directly. It asks the pattern table
//! whether a character (or a candidate token) belongs to a named class. The
//! standard table is compiled once, lazily, and shared by every scanner.
//!
//! ## Standard patterns
//!
//! | Name             | Pattern                 | Meaning                          |
//! |------------------|-------------------------|----------------------------------|
//! | `whiteSpace`     | `^[\n\t ]$`             | newline, tab or space            |
//! | `typing`         | `^[A-Z][A-Za-z0-9_]*$`  | type names, uppercase initiated  |
//! | `commonVariable` | `^[a-z_][a-z0-9_]*$`    | variable names                   |
//! | `typePrefix`     | `^:$`                   | the type annotation delimiter    |
//!
//! All patterns are anchored so that they test a whole piece of text, which
//! is what makes "uppercase initiated" meaningful when the scanner checks the
//! token buffer plus the incoming character.

use crate::rosetta::error::ConfigurationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub const WHITE_SPACE: &str = "whiteSpace";
pub const TYPING: &str = "typing";
pub const COMMON_VARIABLE: &str = "commonVariable";
pub const TYPE_PREFIX: &str = "typePrefix";

/// Names and sources of the built-in patterns, in table order
pub const STANDARD_PATTERNS: &[(&str, &str)] = &[
    (WHITE_SPACE, r"^[\n\t ]$"),
    (TYPING, r"^[A-Z][A-Za-z0-9_]*$"),
    (COMMON_VARIABLE, r"^[a-z_][a-z0-9_]*$"),
    (TYPE_PREFIX, r"^:$"),
];

static STANDARD: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::from_entries(STANDARD_PATTERNS.iter().copied())
        .unwrap_or_else(|err| panic!("built-in pattern table is broken: {}", err))
});

/// Named character classes used during scanning
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: BTreeMap<String, Regex>,
}

impl PatternTable {
    /// The shared table with the built-in patterns
    pub fn standard() -> &'static PatternTable {
        &STANDARD
    }

    /// Compile a table from `(name, pattern)` pairs
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut compiled = BTreeMap::new();
        for (name, pattern) in entries {
            compiled.insert(name.to_string(), compile(name, pattern)?);
        }
        Ok(Self { entries: compiled })
    }

    /// Copy of the standard table with some patterns replaced
    ///
    /// Only names already present in the table may be overridden.
    pub fn with_overrides<'a, I>(overrides: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self::standard().clone();
        for (name, pattern) in overrides {
            if !table.entries.contains_key(name) {
                return Err(ConfigurationError::UnknownPattern(name.to_string()));
            }
            table.entries.insert(name.to_string(), compile(name, pattern)?);
        }
        Ok(table)
    }

    fn get(&self, name: &str) -> Result<&Regex, ConfigurationError> {
        self.entries
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownPattern(name.to_string()))
    }

    /// Check a single character against the named pattern
    pub fn classify(&self, name: &str, ch: char) -> Result<bool, ConfigurationError> {
        let mut buf = [0u8; 4];
        Ok(self.get(name)?.is_match(ch.encode_utf8(&mut buf)))
    }

    /// Check a piece of text against the named pattern
    pub fn matches(&self, name: &str, text: &str) -> Result<bool, ConfigurationError> {
        Ok(self.get(name)?.is_match(text))
    }

    /// Fail unless every name resolves
    pub fn require(&self, names: &[&str]) -> Result<(), ConfigurationError> {
        names.iter().try_for_each(|name| self.get(name).map(|_| ()))
    }

    /// Source of the named pattern
    pub fn pattern(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(Regex::as_str)
    }

    /// Registered pattern names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex, ConfigurationError> {
    Regex::new(pattern).map_err(|e| ConfigurationError::InvalidPattern {
        name: name.to_string(),
        message: e.to_string(),
    })
}
