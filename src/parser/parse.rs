//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and the primitives every grammar
//! procedure is built from: lookahead, `expect`, production tracing and
//! panic-mode recovery.
//!
//! # Parser Architecture
//!
//! One method per non-terminal, split across files with `impl Parser` blocks:
//! - This module: Parser struct, helper methods, and the entry point
//! - `declarations`: program sections, functions, parameters, declarations, id lists
//! - `statements`: statement list, statement dispatch and each statement form
//! - `expressions`: expression, term, factor and primary
//!
//! # Error recovery
//!
//! A mismatch never aborts the run. The parser records a [`SyntaxError`],
//! discards exactly the offending token, and carries on as if the expected
//! symbol had been there. There is no synchronizing set, so one real mistake
//! can produce several diagnostics downstream.

use crate::parser::lexer::{Token, TokenKind, tokenize};
use crate::parser::trace::TraceEntry;
use thiserror::Error;
use tracing::debug;

/// A syntax diagnostic. `Display` gives the one-line report form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[syntax-error] line {line}: at token '{lexeme}' ({kind}) — {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub lexeme: String,
    pub kind: TokenKind,
    pub message: String,
}

impl SyntaxError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            line: token.line,
            lexeme: token.lexeme.clone(),
            kind: token.kind,
            message: message.into(),
        }
    }
}

/// Knobs for a parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Record a trace line for every production chosen. Terminals, skips and
    /// diagnostics are recorded regardless.
    pub trace_productions: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trace_productions: true,
        }
    }
}

/// Everything one parse run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub trace: Vec<TraceEntry>,
    pub diagnostics: Vec<SyntaxError>,
    /// Cursor position when the run finished.
    pub tokens_consumed: usize,
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Process exit status: 0 on success, else the diagnostic count clamped
    /// into `1..=255`.
    pub fn exit_status(&self) -> u8 {
        u8::try_from(self.diagnostics.len()).unwrap_or(u8::MAX)
    }
}

/// Tokenize and check `source` in one go.
pub fn parse_source(source: &str) -> ParseOutcome {
    Parser::from_source(source).parse_program()
}

/// Recursive descent syntax checker for Rat25S
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Returned for any read at or past the end of `tokens`.
    end_of_input: Token,
    options: ParseOptions,
    trace: Vec<TraceEntry>,
    diagnostics: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(tokens: Vec<Token>, options: ParseOptions) -> Self {
        let last_line = tokens.last().map_or(1, |token| token.line);
        Self {
            tokens,
            position: 0,
            end_of_input: Token::eof(last_line),
            options,
            trace: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    /// Run one full pass over the token sequence.
    ///
    /// Cursor, trace and diagnostics are reset first, so calling this again
    /// repeats the run from scratch.
    pub fn parse_program(&mut self) -> ParseOutcome {
        self.position = 0;
        self.trace.clear();
        self.diagnostics.clear();

        self.parse_rat25s();

        debug!(
            errors = self.diagnostics.len(),
            consumed = self.position,
            total = self.tokens.len(),
            "parse finished"
        );

        ParseOutcome {
            trace: std::mem::take(&mut self.trace),
            diagnostics: std::mem::take(&mut self.diagnostics),
            tokens_consumed: self.position,
        }
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        self.peek_ahead(0)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        self.tokens.get(self.position + n).unwrap_or(&self.end_of_input)
    }

    pub(crate) fn current_line(&self) -> usize {
        self.peek().line
    }

    /// Move the cursor one token forward; it stops at the sequence length.
    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Record the production chosen for the current lookahead.
    pub(crate) fn production(&mut self, rule: &'static str) {
        if self.options.trace_productions {
            let line = self.current_line();
            self.trace.push(TraceEntry::Production { rule, line });
        }
    }

    /// Consume the current token as a matched terminal.
    pub(crate) fn consume(&mut self) {
        self.trace.push(TraceEntry::Terminal(self.peek().clone()));
        self.advance();
    }

    /// Report a syntax error at the current token and discard that token.
    pub(crate) fn reject(&mut self, message: impl Into<String>) {
        let token = self.peek().clone();
        let error = SyntaxError::at(&token, message);
        debug!(%error, "syntax error");
        self.diagnostics.push(error);
        self.trace.push(TraceEntry::Skipped(token));
        self.advance();
    }

    /// Consume a terminal of `kind` (and `lexeme`, when given), or report it
    /// missing and skip whatever is there instead.
    pub(crate) fn expect(&mut self, kind: TokenKind, lexeme: Option<&str>) {
        let token = self.peek();
        let matched = match lexeme {
            Some(lexeme) => token.is(kind, lexeme),
            None => token.kind == kind,
        };

        if matched {
            self.consume();
        } else {
            let expected = match lexeme {
                Some(lexeme) => format!("expected {} '{}'", kind, lexeme),
                None => format!("expected {}", kind),
            };
            self.reject(expected);
        }
    }

    pub(crate) fn expect_separator(&mut self, lexeme: &str) {
        self.expect(TokenKind::Separator, Some(lexeme));
    }

    pub(crate) fn expect_keyword(&mut self, word: &str) {
        self.expect(TokenKind::Keyword, Some(word));
    }

    pub(crate) fn expect_operator(&mut self, lexeme: &str) {
        self.expect(TokenKind::Operator, Some(lexeme));
    }

    pub(crate) fn expect_identifier(&mut self) {
        self.expect(TokenKind::Identifier, None);
    }
}
