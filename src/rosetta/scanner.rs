//! Scanner and keyword-driven parser
//!
//! The scanner reads the source one character at a time and accumulates
//! identifier characters into a token buffer. When it meets the expected
//! boundary character, the buffered token goes through the active
//! [`Transition`]: by default a keyword lookup whose action may change the
//! boundary, the next transition, whitespace handling or the tree.
//!
//! ## State machine
//!
//! ```text
//!            ┌──────────── skip whitespace / accumulate ───────────┐
//!            v                                                     │
//!       ┌──────────┐  ch == boundary  ┌──────────────┐  token   ┌──────────┐
//!  ───> │ SCANNING │ ───────────────> │ BOUNDARY_HIT │ ───────> │ DISPATCH │
//!       └──────────┘                  └──────────────┘          └──────────┘
//!          │    │ not an identifier          │ empty token           │
//!          │    └──────────> ERROR           └─────> SCANNING <──────┘
//!          │ end of input
//!          v
//!        DONE
//! ```
//!
//! Until a keyword or the `initial_boundary` setting picks a character, any
//! character of the `typePrefix` pattern is the boundary.
//!
//! The boundary test comes before whitespace skipping, so a keyword can make
//! a space the boundary while whitespace is otherwise ignored. A character is
//! accumulated only if the buffer plus that character still reads as a type
//! name (`typing`) or a variable name (`commonVariable`).

pub mod settings;
pub mod state;
pub mod trace;

pub use settings::{ScannerSettings, TrailingToken};
pub use state::{Boundary, ParserState};
pub use trace::{DispatchOutcome, IdentifierKind, Trace, TraceEvent};

use crate::rosetta::ast::{is_valid_name, Ast};
use crate::rosetta::directives::{is_valid_boundary, Transition};
use crate::rosetta::error::{ConfigurationError, ParseError};
use crate::rosetta::keywords::KeywordRegistry;
use crate::rosetta::patterns::{PatternTable, COMMON_VARIABLE, TYPE_PREFIX, TYPING, WHITE_SPACE};

/// Node name used for tokens that are not keywords
pub const IDENTIFIER_NODE: &str = "identifier";

/// Patterns every scanner needs
const REQUIRED_PATTERNS: &[&str] = &[WHITE_SPACE, TYPING, COMMON_VARIABLE, TYPE_PREFIX];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    BoundaryHit,
    Dispatch,
    Error(char),
    Done,
}

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub ast: Ast,
    pub trace: Trace,
}

/// Scanner bound to a keyword registry and a pattern table
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    registry: &'a KeywordRegistry,
    patterns: &'a PatternTable,
    settings: ScannerSettings,
}

impl<'a> Scanner<'a> {
    /// Scanner with the standard patterns and default settings
    pub fn new(registry: &'a KeywordRegistry) -> Self {
        Self {
            registry,
            patterns: PatternTable::standard(),
            settings: ScannerSettings::default(),
        }
    }

    /// Scanner with a custom pattern table and settings
    ///
    /// Fails if the table lacks a pattern the scanner relies on, if the
    /// settings name an unusable root or initial boundary, or if a registered
    /// keyword can never be accumulated under `patterns`.
    pub fn with_config(
        registry: &'a KeywordRegistry,
        patterns: &'a PatternTable,
        settings: ScannerSettings,
    ) -> Result<Self, ConfigurationError> {
        patterns.require(REQUIRED_PATTERNS)?;
        if !is_valid_name(&settings.root_name) {
            return Err(ConfigurationError::InvalidSetting {
                setting: "scanner.root_name".to_string(),
                reason: format!("{:?} is not a valid node name", settings.root_name),
            });
        }
        match settings.initial_boundary {
            Some(boundary) if !is_valid_boundary(boundary) => {
                return Err(ConfigurationError::InvalidSetting {
                    setting: "scanner.initial_boundary".to_string(),
                    reason: format!("boundary {:?} would be read as part of a token", boundary),
                });
            }
            Some(_) => {}
            None => check_type_prefix(patterns)?,
        }
        registry.check_names(patterns)?;

        Ok(Self {
            registry,
            patterns,
            settings,
        })
    }

    pub fn settings(&self) -> &ScannerSettings {
        &self.settings
    }

    /// Parse one source unit into a tree and a dispatch trace
    ///
    /// Every call starts from a fresh [`ParserState`]; the registry is only
    /// read, so parsing the same input twice gives the same output.
    pub fn parse(&self, source: &str) -> Result<ParseOutput, ParseError> {
        let mut state = ParserState::new(&self.settings);
        let mut chars = source.chars().enumerate();
        let mut scan = ScanState::Scanning;

        loop {
            scan = match scan {
                ScanState::Scanning => match chars.next() {
                    Some((position, ch)) => {
                        state.position = Some(position);
                        self.read(&mut state, position, ch)?
                    }
                    None => ScanState::Done,
                },
                ScanState::BoundaryHit => {
                    if state.token.is_empty() {
                        ScanState::Scanning
                    } else {
                        ScanState::Dispatch
                    }
                }
                ScanState::Dispatch => {
                    self.dispatch(&mut state)?;
                    ScanState::Scanning
                }
                ScanState::Error(character) => {
                    return Err(ParseError::Syntax {
                        character,
                        position: state.position.unwrap_or_default(),
                    });
                }
                ScanState::Done => break,
            };
        }

        self.finish(&mut state)?;
        Ok(ParseOutput {
            ast: state.ast,
            trace: state.trace,
        })
    }

    /// Classify one character and update the buffer
    fn read(
        &self,
        state: &mut ParserState,
        position: usize,
        ch: char,
    ) -> Result<ScanState, ConfigurationError> {
        let at_boundary = match state.boundary {
            Boundary::TypePrefix => self.patterns.classify(TYPE_PREFIX, ch)?,
            Boundary::Char(boundary) => ch == boundary,
        };
        if at_boundary {
            return Ok(ScanState::BoundaryHit);
        }
        if state.ignore_whitespace && self.patterns.classify(WHITE_SPACE, ch)? {
            return Ok(ScanState::Scanning);
        }

        let mut candidate = String::with_capacity(state.token.len() + ch.len_utf8());
        candidate.push_str(&state.token);
        candidate.push(ch);
        if self.patterns.matches(TYPING, &candidate)?
            || self.patterns.matches(COMMON_VARIABLE, &candidate)?
        {
            state.accumulate(position, ch);
            Ok(ScanState::Scanning)
        } else {
            Ok(ScanState::Error(ch))
        }
    }

    /// Run the active transition on the buffered token
    fn dispatch(&self, state: &mut ParserState) -> Result<(), ParseError> {
        let token = std::mem::take(&mut state.token);
        let position = state.position.unwrap_or_default();
        let scope = state.current_scope();

        let outcome = match std::mem::take(&mut state.transition) {
            Transition::Capture { attribute } => {
                state.ast.set_attribute(scope, attribute.as_str(), token.as_str());
                DispatchOutcome::Captured { attribute }
            }
            Transition::Dispatch => match self.registry.get_keyword(&token) {
                Some(keyword) if keyword.visible_at(state.depth()) => {
                    if let Some(action) = keyword.action() {
                        state
                            .apply(action)
                            .map_err(|error| ParseError::Structural { error, position })?;
                    }
                    DispatchOutcome::Keyword {
                        name: keyword.name().to_string(),
                        scope: keyword.scope(),
                    }
                }
                Some(keyword) => {
                    self.append_identifier(state, &token)?;
                    DispatchOutcome::OutOfScope {
                        keyword: keyword.name().to_string(),
                        scope: keyword.scope(),
                    }
                }
                None => DispatchOutcome::Identifier {
                    kind: self.append_identifier(state, &token)?,
                },
            },
        };

        state.trace.push(TraceEvent {
            position: state.token_start,
            token,
            outcome,
        });
        Ok(())
    }

    fn append_identifier(
        &self,
        state: &mut ParserState,
        token: &str,
    ) -> Result<IdentifierKind, ConfigurationError> {
        let kind = if self.patterns.matches(TYPING, token)? {
            IdentifierKind::Type
        } else {
            IdentifierKind::Variable
        };
        let scope = state.current_scope();
        let node = state.ast.create_child(scope, IDENTIFIER_NODE);
        state.ast.set_attribute(node, "value", token);
        state.ast.set_attribute(node, "kind", kind.as_str());
        Ok(kind)
    }

    /// Handle whatever is left in the buffer at end of input
    fn finish(&self, state: &mut ParserState) -> Result<(), ParseError> {
        if state.token.is_empty() {
            return Ok(());
        }
        match self.settings.trailing_token {
            TrailingToken::Dispatch => self.dispatch(state),
            TrailingToken::Discard => {
                state.token.clear();
                Ok(())
            }
            TrailingToken::Error => Err(ParseError::IncompleteStatement {
                token: std::mem::take(&mut state.token),
                position: state.token_start,
            }),
        }
    }
}

/// The type-annotation delimiter must not swallow identifier characters
fn check_type_prefix(patterns: &PatternTable) -> Result<(), ConfigurationError> {
    let identifier_chars = ('a'..='z').chain('A'..='Z').chain('0'..='9').chain(['_']);
    for ch in identifier_chars {
        if patterns.classify(TYPE_PREFIX, ch)? {
            return Err(ConfigurationError::InvalidPattern {
                name: TYPE_PREFIX.to_string(),
                message: format!("matches identifier character {:?}", ch),
            });
        }
    }
    Ok(())
}
