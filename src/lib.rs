//! # Introduction
//!
//! rat25s tokenizes and syntax-checks programs in Rat25S, a small teaching
//! language, and records every grammar rule the checker applies so the
//! derivation can be read back or stepped through in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Rule trace + Diagnostics → Report / TUI
//! ```
//!
//! 1. [`parser`] tokenises the source with three small state machines
//!    (identifiers, numbers, comment skipping) and runs a recursive-descent
//!    checker over the tokens. On a mismatch it records a diagnostic, skips
//!    one token and carries on, so one run reports every error it can reach.
//! 2. [`report`] renders the token table and the parse report written by
//!    the command-line tool.
//! 3. [`ui`] is the ratatui trace viewer; not part of the stable library API.
//!
//! ```
//! use rat25s::parser::parse_source;
//!
//! let outcome = parse_source("$$ $$ integer x; $$ x = 1; $$");
//! assert!(outcome.is_success());
//! ```

pub mod parser;
pub mod report;
pub mod ui;
