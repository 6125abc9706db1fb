//! Dispatch trace
//!
//! Every token that reaches a boundary leaves one [`TraceEvent`] behind. The
//! trace is diagnostic output: it is stable enough to snapshot in tests, but
//! it is not meant as a machine interface.

use crate::rosetta::keywords::Scope;
use serde::Serialize;
use std::fmt;

/// How an identifier token was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Type,
    Variable,
}

impl IdentifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierKind::Type => "type",
            IdentifierKind::Variable => "variable",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a token at its boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum DispatchOutcome {
    /// Matched a keyword and applied its action
    Keyword { name: String, scope: Scope },
    /// Not a keyword
    Identifier { kind: IdentifierKind },
    /// Matched a keyword that is not visible at the current depth
    OutOfScope { keyword: String, scope: Scope },
    /// Stored on the current scope by a capture transition
    Captured { attribute: String },
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Keyword { name, scope } => write!(f, "keyword {} ({})", name, scope),
            DispatchOutcome::Identifier { kind } => write!(f, "identifier ({})", kind),
            DispatchOutcome::OutOfScope { keyword, scope } => {
                write!(f, "identifier ({} keyword {} outside its scope)", scope, keyword)
            }
            DispatchOutcome::Captured { attribute } => write!(f, "captured as {}", attribute),
        }
    }
}

/// One dispatched token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Position of the token's first character
    pub position: usize,
    pub token: String,
    pub outcome: DispatchOutcome,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.position, self.token, self.outcome)
    }
}

/// Dispatch trace of one parse, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Dispatched tokens in order
    pub fn tokens(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.token.as_str()).collect()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = TraceEvent {
            position: 0,
            token: "public".to_string(),
            outcome: DispatchOutcome::Keyword {
                name: "public".to_string(),
                scope: Scope::Global,
            },
        };
        assert_eq!(event.to_string(), "0: public -> keyword public (global)");
    }

    #[test]
    fn test_trace_display_one_line_per_event() {
        let mut trace = Trace::new();
        trace.push(TraceEvent {
            position: 7,
            token: "Bool".to_string(),
            outcome: DispatchOutcome::Identifier {
                kind: IdentifierKind::Type,
            },
        });
        trace.push(TraceEvent {
            position: 12,
            token: "ret".to_string(),
            outcome: DispatchOutcome::OutOfScope {
                keyword: "ret".to_string(),
                scope: Scope::Local,
            },
        });
        assert_eq!(
            trace.to_string(),
            "7: Bool -> identifier (type)\n12: ret -> identifier (local keyword ret outside its scope)\n"
        );
        assert_eq!(trace.tokens(), vec!["Bool", "ret"]);
    }

    #[test]
    fn test_trace_serializes_as_list() {
        let mut trace = Trace::new();
        trace.push(TraceEvent {
            position: 3,
            token: "name".to_string(),
            outcome: DispatchOutcome::Captured {
                attribute: "name".to_string(),
            },
        });
        let json = serde_json::to_string(&trace).unwrap();
        assert_eq!(
            json,
            r#"[{"position":3,"token":"name","outcome":{"result":"captured","attribute":"name"}}]"#
        );
    }
}
