//! Property-based tests for the tokenizer and parser.
//!
//! These use `proptest` to check invariants over generated inputs:
//!
//! 1. **Tokenizer never panics** and always ends with exactly one `eof`
//! 2. **Tokenizer is deterministic**
//! 3. **No empty lexemes** except the `eof` token
//! 4. **Line numbers never decrease**
//! 5. **Parser always terminates** with its cursor inside the sequence
//! 6. **Clean programs stay clean** for generated assignment lists
//! 7. **Every character is accounted for**: without comments, the lexemes
//!    joined together are the input minus its whitespace

use proptest::prelude::*;

use super::lexer::{TokenKind, tokenize};
use super::parse::parse_source;

/// Fragments of real Rat25S plus some deliberately broken pieces.
const FRAGMENTS: &[&str] = &[
    "$$", "$", "function", "f", "(", ")", "{", "}", ";", ",", "integer", "real", "boolean",
    "if", "else", "endif", "while", "endwhile", "return", "print", "scan", "true", "false",
    "x", "y", "=", "==", "<=", "=>", "+", "-", "*", "/", "1", "2.5", "[* c *]", "@", "!", ".",
    "\n",
];

fn fragment_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..120).prop_map(|parts| parts.join(" "))
}

fn assignment() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9_]{0,6}", prop::collection::vec("[a-z]|[0-9]{1,3}", 1..5)).prop_filter_map(
        "keywords are not identifiers",
        |(target, operands)| {
            let all_identifiers_ok = std::iter::once(&target)
                .chain(operands.iter())
                .all(|word| !super::lexer::is_keyword(word));
            all_identifiers_ok.then(|| format!("{} = {};", target, operands.join(" + ")))
        },
    )
}

proptest! {
    #[test]
    fn tokenizer_ends_with_single_eof(input in "\\PC{0,300}") {
        let tokens = tokenize(&input);
        prop_assert!(tokens.last().is_some_and(|t| t.is_eof()));
        prop_assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
    }

    #[test]
    fn tokenizer_is_deterministic(input in "\\PC{0,200}") {
        prop_assert_eq!(tokenize(&input), tokenize(&input));
    }

    #[test]
    fn only_eof_has_empty_lexeme(input in "\\PC{0,300}") {
        for token in tokenize(&input) {
            prop_assert_eq!(token.lexeme.is_empty(), token.kind == TokenKind::Eof, "{:?}", token);
        }
    }

    #[test]
    fn lexemes_cover_all_non_whitespace(input in "[^\\[\\s]{0,200}") {
        let joined: String = tokenize(&input).iter().map(|t| t.lexeme.as_str()).collect();
        let expected: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(joined, expected);
    }

    #[test]
    fn lines_never_decrease(input in "[ a-z0-9\\n\\[\\]*;=$@]{0,300}") {
        let tokens = tokenize(&input);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line, "{:?} then {:?}", pair[0], pair[1]);
        }
        let newlines = input.matches('\n').count();
        prop_assert!(tokens.last().map_or(0, |t| t.line) <= newlines + 1);
    }

    #[test]
    fn parser_terminates_on_fragment_soup(source in fragment_soup()) {
        let token_count = tokenize(&source).len();
        let outcome = parse_source(&source);
        prop_assert!(outcome.tokens_consumed <= token_count);
        prop_assert_eq!(
            outcome.trace.iter().filter(|e| e.is_skip()).count(),
            outcome.error_count()
        );
    }

    #[test]
    fn assignment_lists_parse_cleanly(statements in prop::collection::vec(assignment(), 0..10)) {
        let source = format!("$$ $$ $$\n{}\n$$", statements.join("\n"));
        let outcome = parse_source(&source);
        prop_assert!(outcome.is_success(), "{:?}", outcome.diagnostics);
    }
}
