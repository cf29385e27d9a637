//! Output file rendering for the `lex` and `parse` commands
//!
//! Both files start with a `Token Lexeme` header and a dashed rule, then one
//! line per token (lexer) or per trace entry (parser).

use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::ParseOutcome;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

const KIND_ORDER: [TokenKind; 8] = [
    TokenKind::Keyword,
    TokenKind::Identifier,
    TokenKind::Integer,
    TokenKind::Real,
    TokenKind::Operator,
    TokenKind::Separator,
    TokenKind::Unknown,
    TokenKind::Eof,
];

fn header(rule_width: usize) -> String {
    format!("{:<15} {:<15}\n{}\n", "Token", "Lexeme", "-".repeat(rule_width))
}

/// The lexer output table.
pub fn render_token_table(tokens: &[Token]) -> String {
    let mut out = header(30);
    for token in tokens {
        let _ = writeln!(out, "{}", token);
    }
    out
}

/// The parser output: rule trace, then diagnostics, then a summary line.
pub fn render_parse_report(outcome: &ParseOutcome) -> String {
    let mut out = header(35);
    for entry in &outcome.trace {
        let _ = writeln!(out, "{}", entry);
    }

    if !outcome.diagnostics.is_empty() {
        out.push_str("\nDiagnostics\n");
        out.push_str(&"-".repeat(35));
        out.push('\n');
        for diagnostic in &outcome.diagnostics {
            let _ = writeln!(out, "{}", diagnostic);
        }
    }

    out.push('\n');
    out.push_str(&summary_line(outcome));
    out.push('\n');
    out
}

pub fn summary_line(outcome: &ParseOutcome) -> String {
    match outcome.error_count() {
        0 => "Syntax analysis complete: no errors".to_string(),
        1 => "Syntax analysis complete: 1 syntax error".to_string(),
        n => format!("Syntax analysis complete: {} syntax errors", n),
    }
}

pub fn token_counts(tokens: &[Token]) -> FxHashMap<TokenKind, usize> {
    let mut counts = FxHashMap::default();
    for token in tokens {
        *counts.entry(token.kind).or_insert(0) += 1;
    }
    counts
}

/// One line such as `keyword: 2, identifier: 5, separator: 4`, in a fixed
/// kind order, leaving out kinds that never occur and the `eof` token.
pub fn render_token_summary(tokens: &[Token]) -> String {
    let counts = token_counts(tokens);
    KIND_ORDER
        .iter()
        .filter(|kind| **kind != TokenKind::Eof)
        .filter_map(|kind| counts.get(kind).map(|n| format!("{}: {}", kind, n)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse_source;

    #[test]
    fn test_token_table() {
        let table = render_token_table(&tokenize("while x"));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], format!("{:<15} {:<15}", "Token", "Lexeme"));
        assert_eq!(lines[1], "-".repeat(30));
        assert_eq!(lines[2], format!("{:<15} {:<15}", "keyword", "while"));
        assert_eq!(lines[3], format!("{:<15} {:<15}", "identifier", "x"));
        assert_eq!(lines[4].trim_end(), "eof");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_parse_report_success() {
        let report = render_parse_report(&parse_source("$$ $$ $$ $$"));
        assert!(report.lines().nth(1).is_some_and(|l| l == "-".repeat(35)));
        assert!(!report.contains("Diagnostics"));
        assert!(report.trim_end().ends_with("no errors"));
    }

    #[test]
    fn test_parse_report_lists_diagnostics() {
        let report = render_parse_report(&parse_source("$$ $$ $$ x = 1 $$"));
        assert!(report.contains("\nDiagnostics\n"));
        assert!(report.contains("[syntax-error] line 1: at token '$$' (separator) — expected separator ';'"));
        assert!(report.trim_end().ends_with("syntax errors"));
    }

    #[test]
    fn test_token_summary() {
        let summary = render_token_summary(&tokenize("if (x) y = 1.5; @"));
        assert_eq!(
            summary,
            "keyword: 1, identifier: 2, real: 1, operator: 1, separator: 3, unknown: 1"
        );
    }
}
