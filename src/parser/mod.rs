//! Rat25S source analysis
//!
//! This module turns Rat25S source text into a checked rule trace:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser context, `expect`, diagnostics and the entry point
//! - [`trace`]: Rule trace entries and their printable forms
//!
//! # Language
//!
//! A program has three sections delimited by four `$$` markers: function definitions,
//! declarations, and statements (the last section closes the program).
//! Types are `integer`, `real` and `boolean`; statements are compound,
//! assignment, `if`/`else`/`endif`, `while`/`endwhile`, `return`, `print`
//! and `scan`. Comments are written `[* ... *]`.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent, one method per grammar rule, with
//! panic-mode recovery that skips a single token per error. No AST is built;
//! the result is the rule trace plus any diagnostics.

pub mod lexer;
pub mod parse;
pub mod trace;

mod declarations;
mod expressions;
mod statements;

#[cfg(test)]
mod property_tests;

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parse::{ParseOptions, ParseOutcome, Parser, SyntaxError, parse_source};
pub use trace::TraceEntry;
