//! Output formats for parsed trees
//!
//! Every format implements [`Formatter`]. [`OutputFormat`] names the
//! built-in ones so callers (the CLI in particular) can pick a format from a
//! string:
//!
//! - `tag`: XML-like tags, see [`tag`]
//! - `treeviz`: box-drawing tree, see [`treeviz`]
//! - `json` and `yaml`: documents shaped like an
//!   [`AstSnapshot`](crate::rosetta::ast::AstSnapshot), see [`json`] and [`yaml`]
//!
//! Trees can nest as deeply as the input asks for, so none of the formats
//! walks the tree recursively.

pub mod json;
pub mod tag;
pub mod treeviz;
pub mod yaml;

pub use json::to_json_str;
pub use tag::serialize_ast_tag;
pub use treeviz::to_treeviz_str;
pub use yaml::to_yaml_str;

use crate::rosetta::ast::Ast;
use std::fmt;
use std::str::FromStr;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No format with this name
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(
                f,
                "Format '{name}' not found (expected one of: {})",
                OutputFormat::names().join(", ")
            ),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Turns a tree into text
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "treeviz", "tag")
    fn name(&self) -> &str;

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        Ok(serialize_ast_tag(ast))
    }

    fn description(&self) -> &str {
        "XML-like tags with attributes"
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        Ok(to_treeviz_str(ast))
    }

    fn description(&self) -> &str {
        "Box-drawing tree view"
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        to_json_str(ast)
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON snapshot"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        to_yaml_str(ast)
    }

    fn description(&self) -> &str {
        "YAML snapshot"
    }
}

/// The built-in formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Tag,
    #[default]
    Treeviz,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Tag,
        OutputFormat::Treeviz,
        OutputFormat::Json,
        OutputFormat::Yaml,
    ];

    pub fn formatter(self) -> &'static dyn Formatter {
        match self {
            OutputFormat::Tag => &TagFormatter,
            OutputFormat::Treeviz => &TreevizFormatter,
            OutputFormat::Json => &JsonFormatter,
            OutputFormat::Yaml => &YamlFormatter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Tag => "tag",
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|format| format.name()).collect()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::FormatNotFound(s.to_string()))
    }
}

/// Serialize a tree in the given format
pub fn serialize(ast: &Ast, format: OutputFormat) -> Result<String, FormatError> {
    format.formatter().serialize(ast)
}
