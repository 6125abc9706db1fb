//! Per-parse scanner state
//!
//! A [`ParserState`] belongs to exactly one parse run. It holds the token
//! buffer, the reconfigurable parts of the scanner (boundary, whitespace
//! handling, next transition), the scope stack and the tree being grown.
//! Directives are applied here and nowhere else.

use super::settings::ScannerSettings;
use super::trace::Trace;
use crate::rosetta::ast::{Ast, NodeId, StructuralError};
use crate::rosetta::directives::{Directive, Transition};

/// What closes the token being accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Any character of the `typePrefix` pattern
    TypePrefix,
    /// One exact character, set by configuration or a keyword
    Char(char),
}

#[derive(Debug, Clone)]
pub struct ParserState {
    pub(super) position: Option<usize>,
    pub(super) token: String,
    pub(super) token_start: usize,
    pub(super) boundary: Boundary,
    pub(super) ignore_whitespace: bool,
    pub(super) transition: Transition,
    /// Open scopes, root at the bottom
    scopes: Vec<NodeId>,
    pub(super) ast: Ast,
    pub(super) trace: Trace,
}

impl ParserState {
    pub fn new(settings: &ScannerSettings) -> Self {
        let ast = Ast::new(settings.root_name.as_str());
        let root = ast.root();
        Self {
            position: None,
            token: String::new(),
            token_start: 0,
            boundary: settings
                .initial_boundary
                .map_or(Boundary::TypePrefix, Boundary::Char),
            ignore_whitespace: settings.ignore_whitespace,
            transition: Transition::Dispatch,
            scopes: vec![root],
            ast,
            trace: Trace::new(),
        }
    }

    /// Position of the last character read, `None` before the first one
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn ignore_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Innermost open scope
    pub fn current_scope(&self) -> NodeId {
        self.scopes.last().copied().unwrap_or_else(|| self.ast.root())
    }

    /// Number of scopes opened above the root
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub(super) fn accumulate(&mut self, position: usize, ch: char) {
        if self.token.is_empty() {
            self.token_start = position;
        }
        self.token.push(ch);
    }

    /// Apply a keyword action
    ///
    /// Steps of a sequence run in order; the first failing step stops the
    /// sequence and leaves earlier steps applied.
    pub fn apply(&mut self, directive: &Directive) -> Result<(), StructuralError> {
        let scope = self.current_scope();
        match directive {
            Directive::SetBoundary { boundary } => self.boundary = Boundary::Char(*boundary),
            Directive::SetTransition { transition } => self.transition = transition.clone(),
            Directive::SetIgnoreWhitespace { enabled } => self.ignore_whitespace = *enabled,
            Directive::AppendChild { name } => {
                self.ast.create_child(scope, name.as_str());
            }
            Directive::AppendNested { name } => {
                self.ast.create_nested_child(scope, name.as_str())?;
            }
            Directive::OpenScope { name } => {
                let child = self.ast.create_child(scope, name.as_str());
                self.scopes.push(child);
            }
            Directive::CloseScope => {
                if self.scopes.len() <= 1 {
                    return Err(StructuralError::ScopeUnderflow);
                }
                self.scopes.pop();
            }
            Directive::SetAttribute { key, value } => {
                self.ast.set_attribute(scope, key.as_str(), value.clone());
            }
            Directive::Sequence { steps } => {
                for step in steps {
                    self.apply(step)?;
                }
            }
        }
        Ok(())
    }
}
