//! Scanner settings
//!
//! These are the knobs read from the `[scanner]` section of the
//! configuration. Everything else about scanning is driven by keywords.

use serde::{Deserialize, Serialize};

/// What to do with a token still in the buffer when input runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingToken {
    /// Treat end of input as a boundary
    #[default]
    Dispatch,
    /// Drop the token silently
    Discard,
    /// Fail with an incomplete statement error
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Name of the root node of every tree
    pub root_name: String,
    /// Boundary in effect before any keyword changes it
    ///
    /// Unset means any character of the `typePrefix` pattern.
    #[serde(default)]
    pub initial_boundary: Option<char>,
    pub ignore_whitespace: bool,
    pub trailing_token: TrailingToken,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            root_name: "rosetta".to_string(),
            initial_boundary: None,
            ignore_whitespace: true,
            trailing_token: TrailingToken::Dispatch,
        }
    }
}
