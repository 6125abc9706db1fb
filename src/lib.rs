//! # rosetta
//!
//! A keyword-driven scanner and parser for the rosetta language.
//!
//! Source text is read one character at a time. Tokens end at a boundary
//! character, and each token is looked up in a keyword registry. Keyword
//! actions reconfigure the scanner and grow the tree, so most of the grammar
//! lives in data rather than in the scanner.
//!
//! ## Testing
//!
//! See the [testing module](rosetta::testing) for the sample sources and the
//! fluent tree assertions used throughout the tests.

pub mod rosetta;

pub use rosetta::parse;
