//! Configuration loading
//!
//! `defaults/rosetta.default.toml` is embedded into the crate so the documented
//! defaults and the runtime behavior stay in sync. Callers layer their own
//! files and overrides on top through [`Loader`] before deserializing into
//! [`RosettaConfig`].
//!
//! Keywords listed in the configuration are the extension surface of the
//! language: they are registered onto a [`KeywordRegistry`] before parsing.

use crate::rosetta::directives::Directive;
use crate::rosetta::error::ConfigurationError;
use crate::rosetta::keywords::{KeywordRegistry, Scope};
use crate::rosetta::patterns::{PatternTable, COMMON_VARIABLE, TYPE_PREFIX, TYPING, WHITE_SPACE};
use crate::rosetta::scanner::ScannerSettings;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/rosetta.default.toml");

/// Per-project configuration picked up from the working directory
pub const PROJECT_CONFIG: &str = "rosetta.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RosettaConfig {
    pub scanner: ScannerSettings,
    pub source: SourceConfig,
    #[serde(default)]
    pub patterns: PatternOverrides,
    #[serde(default)]
    pub keywords: Vec<KeywordConfig>,
}

/// How source files are read before scanning
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub normalize_indentation: bool,
}

/// Replacement patterns for the standard table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternOverrides {
    pub white_space: Option<String>,
    pub typing: Option<String>,
    pub common_variable: Option<String>,
    pub type_prefix: Option<String>,
}

impl PatternOverrides {
    /// `(pattern name, pattern)` pairs for the overrides that are set
    pub fn entries(&self) -> Vec<(&str, &str)> {
        [
            (WHITE_SPACE, &self.white_space),
            (TYPING, &self.typing),
            (COMMON_VARIABLE, &self.common_variable),
            (TYPE_PREFIX, &self.type_prefix),
        ]
        .into_iter()
        .filter_map(|(name, pattern)| pattern.as_deref().map(|p| (name, p)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// A keyword declared in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    pub name: String,
    pub scope: Scope,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl KeywordConfig {
    /// The directives folded into a single keyword action
    pub fn action(&self) -> Option<Directive> {
        if self.directives.is_empty() {
            None
        } else {
            Some(Directive::sequence(self.directives.iter().cloned()))
        }
    }
}

impl RosettaConfig {
    /// Standard pattern table with the configured overrides applied
    pub fn pattern_table(&self) -> Result<PatternTable, ConfigurationError> {
        PatternTable::with_overrides(self.patterns.entries())
    }

    /// Register every configured keyword, in file order
    ///
    /// Names are checked against the configured pattern table, so keywords
    /// can rely on overridden identifier patterns.
    pub fn apply_keywords(&self, registry: &mut KeywordRegistry) -> Result<(), ConfigurationError> {
        let patterns = self.pattern_table()?;
        for keyword in &self.keywords {
            registry.set_keyword_with(&patterns, &keyword.name, keyword.scope, keyword.action())?;
        }
        Ok(())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a file that may not exist, such as a per-project [`PROJECT_CONFIG`]
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, mostly useful in tests
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Override one key, e.g. `scanner.trailing_token` from a command-line flag
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RosettaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RosettaConfig, ConfigError> {
    Loader::new().build()
}
