//! Testing utilities for rosetta trees
//!
//! Two tools are meant to be used together in parser tests:
//!
//! 1. **[RosettaSources]** - curated sample sources under `docs/samples/`
//! 2. **[assert_ast](fn@assert_ast)** - fluent assertions over a whole tree
//!
//! Rosetta is still changing. Keeping sample sources in one place means a
//! grammar change is a matter of updating those files and the tests that
//! read them, not hunting down inline strings.
//!
//! ```rust-example
//! use rosetta::rosetta::testing::{assert_ast, RosettaSources};
//!
//! let source = RosettaSources::get_string("000-public-type.ros")?;
//! let output = Scanner::new(&KeywordRegistry::new()).parse(&source)?;
//!
//! assert_ast(&output.ast)
//!     .name("rosetta")
//!     .child_count(2)
//!     .child(0, |node| {
//!         node.identifier("type", "Bool");
//!     });
//! ```
//!
//! Samples numbered 9xx are inputs the scanner must reject.

mod testing_assertions;

pub use testing_assertions::{assert_ast, NodeAssertion};

use crate::rosetta::config::{Loader, RosettaConfig};
use crate::rosetta::keywords::KeywordRegistry;
use crate::rosetta::source::{self, SourceError};
use std::path::PathBuf;

/// Curated sample files
const AVAILABLE_SAMPLES: &[&str] = &[
    "000-public-type.ros",
    "010-colon-identifiers.ros",
    "020-function-capture.ros",
    "030-local-keyword.ros",
    "900-error-parenthesis.ros",
];

/// Keyword configuration the function samples are written against
const SAMPLE_KEYWORDS: &str = "keywords.toml";

/// Main interface for accessing rosetta sample files
pub struct RosettaSources;

impl RosettaSources {
    fn samples_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("docs/samples")
    }

    /// Full path to a sample file
    pub fn sample_path(filename: &str) -> PathBuf {
        Self::samples_dir().join(filename)
    }

    fn validate_sample(filename: &str) -> Result<(), SourceError> {
        if AVAILABLE_SAMPLES.contains(&filename) {
            Ok(())
        } else {
            Err(SourceError::UnknownSample(filename.to_string()))
        }
    }

    /// Sample content as written
    pub fn get_string(filename: &str) -> Result<String, SourceError> {
        Self::validate_sample(filename)?;
        source::load(Self::sample_path(filename), false)
    }

    /// Sample content after indentation normalization
    pub fn get_normalized(filename: &str) -> Result<String, SourceError> {
        Self::validate_sample(filename)?;
        source::load(Self::sample_path(filename), true)
    }

    /// List all available sample files
    pub fn list_samples() -> Vec<&'static str> {
        AVAILABLE_SAMPLES.to_vec()
    }

    /// Configuration with the sample keywords layered over the defaults
    pub fn keyword_config() -> Result<RosettaConfig, ::config::ConfigError> {
        Loader::new()
            .with_file(Self::sample_path(SAMPLE_KEYWORDS))
            .build()
    }

    /// Seeded registry extended with the sample keywords
    ///
    /// Panics if the sample configuration is broken, which only tests call.
    pub fn keyword_registry() -> KeywordRegistry {
        let config = Self::keyword_config()
            .unwrap_or_else(|err| panic!("sample keyword config: {}", err));
        let mut registry = KeywordRegistry::new();
        config
            .apply_keywords(&mut registry)
            .unwrap_or_else(|err| panic!("sample keywords: {}", err));
        registry
    }
}
