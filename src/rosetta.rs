//! Main module for rosetta library functionality

pub mod ast;
pub mod config;
pub mod directives;
pub mod error;
pub mod formats;
pub mod keywords;
pub mod patterns;
pub mod scanner;
pub mod source;
pub mod testing;

use crate::rosetta::error::ParseError;
use crate::rosetta::keywords::KeywordRegistry;
use crate::rosetta::scanner::{ParseOutput, Scanner};
use std::sync::PoisonError;

/// Parse with the shared keyword registry and default settings
pub fn parse(source: &str) -> Result<ParseOutput, ParseError> {
    let registry = KeywordRegistry::shared()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    Scanner::new(&registry).parse(source)
}
