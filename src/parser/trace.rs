//! Rule trace recorded during a parse run
//!
//! The trace is the ordered list of grammar productions the parser chose and
//! the terminals it consumed or skipped. It is what gets written to the parser
//! output file and what the trace viewer steps through.

use crate::parser::lexer::Token;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEntry {
    /// A production was chosen; `line` is the line of the lookahead token.
    Production { rule: &'static str, line: usize },
    /// A terminal matched and was consumed.
    Terminal(Token),
    /// A token was discarded after a syntax error.
    Skipped(Token),
}

impl TraceEntry {
    /// Source line this entry belongs to.
    pub fn line(&self) -> usize {
        match self {
            TraceEntry::Production { line, .. } => *line,
            TraceEntry::Terminal(token) | TraceEntry::Skipped(token) => token.line,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TraceEntry::Skipped(_))
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEntry::Production { rule, line } => write!(f, "    {}  (line {})", rule, line),
            TraceEntry::Terminal(token) => write!(
                f,
                "Token: {:<15} Lexeme: {:<15} Line: {}",
                token.kind, token.lexeme, token.line
            ),
            TraceEntry::Skipped(token) => write!(
                f,
                "Skipped: {:<15} Lexeme: {:<15} Line: {}",
                token.kind, token.lexeme, token.line
            ),
        }
    }
}
