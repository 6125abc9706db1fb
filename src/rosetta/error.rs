//! Error types for scanning and configuration
//!
//! Two families live here. [`ConfigurationError`] covers a broken language
//! setup (unknown pattern names, bad regexes, malformed keyword actions) and
//! is fatal for whoever is building the scanner. [`ParseError`] covers a
//! single parse run and only aborts that run.
//!
//! A keyword lookup miss is not an error at all, see
//! [`KeywordRegistry::get_keyword`](crate::rosetta::keywords::KeywordRegistry::get_keyword).

use crate::rosetta::ast::StructuralError;
use std::fmt;

/// Errors in the language configuration (pattern table, keyword registry)
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A pattern name that the table does not know about
    UnknownPattern(String),
    /// A pattern that failed to compile
    InvalidPattern { name: String, message: String },
    /// A keyword name that can never be accumulated as a token
    InvalidKeywordName(String),
    /// A keyword action that would leave the scanner in an unusable state
    MalformedAction { keyword: String, reason: String },
    /// A scanner setting the scanner cannot work with
    InvalidSetting { setting: String, reason: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownPattern(name) => {
                write!(f, "Pattern '{}' is not defined", name)
            }
            ConfigurationError::InvalidPattern { name, message } => {
                write!(f, "Pattern '{}' is invalid: {}", name, message)
            }
            ConfigurationError::InvalidKeywordName(name) => {
                write!(f, "'{}' is not a valid keyword name", name)
            }
            ConfigurationError::MalformedAction { keyword, reason } => {
                write!(f, "Malformed action for keyword '{}': {}", keyword, reason)
            }
            ConfigurationError::InvalidSetting { setting, reason } => {
                write!(f, "Invalid setting '{}': {}", setting, reason)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors that abort a single parse run
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A character that fits no classification in the current scanner state
    Syntax { character: char, position: usize },
    /// A keyword action tried to move through a scope that does not exist
    Structural {
        error: StructuralError,
        position: usize,
    },
    /// Input ended with a token that never reached a boundary
    IncompleteStatement { token: String, position: usize },
    /// The scanner was handed a broken configuration
    Configuration(ConfigurationError),
}

impl ParseError {
    /// Input position the error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { position, .. }
            | ParseError::Structural { position, .. }
            | ParseError::IncompleteStatement { position, .. } => Some(*position),
            ParseError::Configuration(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax {
                character,
                position,
            } => write!(
                f,
                "The char {:?} at position {} is not a valid token",
                character, position
            ),
            ParseError::Structural { error, position } => {
                write!(f, "{} (at position {})", error, position)
            }
            ParseError::IncompleteStatement { token, position } => write!(
                f,
                "Incomplete statement: token '{}' starting at position {} has no closing boundary",
                token, position
            ),
            ParseError::Configuration(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Structural { error, .. } => Some(error),
            ParseError::Configuration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for ParseError {
    fn from(err: ConfigurationError) -> Self {
        ParseError::Configuration(err)
    }
}
