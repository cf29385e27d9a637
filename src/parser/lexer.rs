//! Lexer (tokenizer) for Rat25S source code
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the parser.
//! The sequence always ends with exactly one [`TokenKind::Eof`] token.
//!
//! Three small deterministic state machines do the work:
//!
//! - the whitespace/comment skipper (`Idle` ⇄ `InComment`), run before every token;
//! - the identifier/keyword recognizer (letter, then letters, digits or `_`);
//! - the number recognizer (`IntegerBody` → `FractionBody` on `.` + digit).
//!
//! Operators and separators are table driven, longest lexeme first. Anything
//! else is grouped into a single `unknown` token. Lexical errors never stop the
//! lexer; they show up as `unknown` tokens.

use std::fmt;
use tracing::{debug, trace};

/// Reserved words. Matching is case-insensitive.
pub const KEYWORDS: [&str; 14] = [
    "integer", "real", "boolean", "function", "if", "else", "endif", "while", "endwhile",
    "return", "scan", "print", "true", "false",
];

/// Two-character operators. Tried before any single-character operator.
pub const MULTI_CHAR_OPERATORS: [&str; 6] = ["<=", ">=", "==", "<>", "!=", "=>"];

/// Two-character separators (the program section delimiter).
pub const MULTI_CHAR_SEPARATORS: [&str; 1] = ["$$"];

pub const SINGLE_CHAR_OPERATORS: [char; 7] = ['=', '+', '-', '*', '/', '<', '>'];

pub const SINGLE_CHAR_SEPARATORS: [char; 7] = ['(', ')', '{', '}', ';', ',', '$'];

/// Lexeme carried by the `unknown` token emitted for a comment that never closes.
pub const UNTERMINATED_COMMENT: &str = "unterminated comment";

/// The closed set of token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Integer,
    Real,
    Operator,
    Separator,
    Unknown,
    Eof,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::Real => "real",
            TokenKind::Operator => "operator",
            TokenKind::Separator => "separator",
            TokenKind::Unknown => "unknown",
            TokenKind::Eof => "eof",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so callers can use width specifiers like `{:<15}`
        f.pad(self.as_str())
    }
}

/// A classified lexeme and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// The end-of-input token. Its lexeme is always empty.
    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Whether this token has the given kind and lexeme.
    ///
    /// Keywords compare case-insensitively, the same way the lexer classifies
    /// them, so `IF` satisfies `is(TokenKind::Keyword, "if")`.
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        if self.kind != kind {
            return false;
        }
        match kind {
            TokenKind::Keyword => self.lexeme.eq_ignore_ascii_case(lexeme),
            _ => self.lexeme == lexeme,
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    pub fn is_separator(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Separator, lexeme)
    }

    pub fn is_operator(&self, lexeme: &str) -> bool {
        self.is(TokenKind::Operator, lexeme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<15} {:<15}", self.kind, self.lexeme)
    }
}

/// Whether `word` is a reserved word, ignoring case.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Tokenize a complete source text.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipState {
    Idle,
    InComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    IntegerBody,
    FractionBody,
}

/// Lexer for Rat25S source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            if let Some(error) = self.skip_whitespace_and_comments() {
                tokens.push(error);
            }

            if self.is_at_end() {
                tokens.push(Token::eof(self.line));
                break;
            }

            let token = self.next_token();
            trace!(kind = %token.kind, lexeme = %token.lexeme, line = token.line, "token");
            tokens.push(token);
        }

        debug!(tokens = tokens.len(), lines = self.line, "tokenized source");
        tokens
    }

    /// Lex one token starting at the current (non-blank) position.
    fn next_token(&mut self) -> Token {
        let line = self.line;
        let Some(ch) = self.peek() else {
            return Token::eof(line);
        };

        if ch.is_ascii_alphabetic() {
            return self.identifier_or_keyword(line);
        }

        if ch.is_ascii_digit() {
            return self.number_literal(line);
        }

        if let Some(token) = self.operator_or_separator(line) {
            return token;
        }

        self.unknown_run(line)
    }

    /// Identifier/keyword machine: one letter, then letters, digits or `_`.
    fn identifier_or_keyword(&mut self, line: usize) -> Token {
        let start = self.position;
        self.advance();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme = self.lexeme_from(start);
        let kind = if is_keyword(&lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, lexeme, line)
    }

    /// Number machine. A `.` is only taken when a digit follows it, so `123.`
    /// ends as an integer and leaves the dot for the next token.
    fn number_literal(&mut self, line: usize) -> Token {
        let start = self.position;
        let mut state = NumberState::IntegerBody;

        loop {
            match (state, self.peek()) {
                (_, Some(ch)) if ch.is_ascii_digit() => {
                    self.advance();
                }
                (NumberState::IntegerBody, Some('.'))
                    if self.peek_ahead(1).is_some_and(|ch| ch.is_ascii_digit()) =>
                {
                    self.advance();
                    state = NumberState::FractionBody;
                }
                _ => break,
            }
        }

        let kind = match state {
            NumberState::IntegerBody => TokenKind::Integer,
            NumberState::FractionBody => TokenKind::Real,
        };
        Token::new(kind, self.lexeme_from(start), line)
    }

    /// Table-driven operators and separators, multi-character lexemes first.
    fn operator_or_separator(&mut self, line: usize) -> Option<Token> {
        let multi = [
            (&MULTI_CHAR_OPERATORS[..], TokenKind::Operator),
            (&MULTI_CHAR_SEPARATORS[..], TokenKind::Separator),
        ];
        for (table, kind) in multi {
            if let Some(literal) = table.iter().find(|literal| self.starts_with(literal)) {
                for _ in literal.chars() {
                    self.advance();
                }
                return Some(Token::new(kind, *literal, line));
            }
        }

        let ch = self.peek()?;
        let kind = if SINGLE_CHAR_OPERATORS.contains(&ch) {
            TokenKind::Operator
        } else if SINGLE_CHAR_SEPARATORS.contains(&ch) {
            TokenKind::Separator
        } else {
            return None;
        };
        self.advance();
        Some(Token::new(kind, ch.to_string(), line))
    }

    /// Group a run of unrecognised characters into one `unknown` token.
    /// The first character is always taken.
    fn unknown_run(&mut self, line: usize) -> Token {
        let start = self.position;
        self.advance();

        while !self.at_token_boundary() {
            self.advance();
        }

        Token::new(TokenKind::Unknown, self.lexeme_from(start), line)
    }

    /// True at end of input, or where whitespace, a comment, or any
    /// recognised token begins.
    fn at_token_boundary(&self) -> bool {
        let Some(ch) = self.peek() else {
            return true;
        };

        ch.is_whitespace()
            || ch.is_ascii_alphanumeric()
            || self.starts_with("[*")
            || MULTI_CHAR_OPERATORS
                .iter()
                .chain(MULTI_CHAR_SEPARATORS.iter())
                .any(|literal| self.starts_with(literal))
            || SINGLE_CHAR_OPERATORS.contains(&ch)
            || SINGLE_CHAR_SEPARATORS.contains(&ch)
    }

    /// Skip whitespace and `[* ... *]` comments.
    ///
    /// Returns an `unknown` token if input ends inside a comment; it is stamped
    /// with the line where scanning stopped.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        let mut state = SkipState::Idle;

        loop {
            match state {
                SkipState::Idle => match self.peek() {
                    Some(ch) if ch.is_whitespace() => {
                        self.advance();
                    }
                    Some('[') if self.peek_ahead(1) == Some('*') => {
                        self.advance(); // skip '['
                        self.advance(); // skip '*'
                        state = SkipState::InComment;
                    }
                    _ => return None,
                },
                SkipState::InComment => match self.peek() {
                    Some('*') if self.peek_ahead(1) == Some(']') => {
                        self.advance(); // skip '*'
                        self.advance(); // skip ']'
                        state = SkipState::Idle;
                    }
                    Some(_) => {
                        self.advance();
                    }
                    None => {
                        return Some(Token::new(
                            TokenKind::Unknown,
                            UNTERMINATED_COMMENT,
                            self.line,
                        ));
                    }
                },
            }
        }
    }

    fn starts_with(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(offset, ch)| self.peek_ahead(offset) == Some(ch))
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_lexemes(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    #[test]
    fn test_simple_statement() {
        let tokens = tokenize("x = 42;");

        assert_eq!(tokens.len(), 5);
        assert!(tokens[0].is(TokenKind::Identifier, "x"));
        assert!(tokens[1].is_operator("="));
        assert!(tokens[2].is(TokenKind::Integer, "42"));
        assert!(tokens[3].is_separator(";"));
        assert!(tokens[4].is_eof());
    }

    #[test]
    fn test_empty_input_is_only_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens, vec![Token::eof(1)]);
    }

    #[test]
    fn test_maximal_munch_operators() {
        let tokens = kinds_and_lexemes("<= >= == <> != => < > =");
        let lexemes: Vec<&str> = tokens.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(
            lexemes,
            vec!["<=", ">=", "==", "<>", "!=", "=>", "<", ">", "=", ""]
        );
        assert!(tokens[..9].iter().all(|(k, _)| *k == TokenKind::Operator));
    }

    #[test]
    fn test_less_equal_is_one_token() {
        assert_eq!(
            kinds_and_lexemes("<="),
            vec![
                (TokenKind::Operator, "<=".to_string()),
                (TokenKind::Eof, String::new())
            ]
        );
    }

    #[test]
    fn test_section_delimiter_and_lone_dollar() {
        let tokens = kinds_and_lexemes("$$ $ $$$");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Separator, "$$".to_string()),
                (TokenKind::Separator, "$".to_string()),
                (TokenKind::Separator, "$$".to_string()),
                (TokenKind::Separator, "$".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        for source in ["IF", "If", "if"] {
            let tokens = tokenize(source);
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[0].kind, TokenKind::Keyword);
            assert_eq!(tokens[0].lexeme, source);
        }
    }

    #[test]
    fn test_identifier_with_digits_and_underscore() {
        let tokens = tokenize("count_2x endwhileX");
        assert!(tokens[0].is(TokenKind::Identifier, "count_2x"));
        assert!(tokens[1].is(TokenKind::Identifier, "endwhileX"));
    }

    #[test]
    fn test_letters_and_digits_are_ascii_only() {
        let tokens = kinds_and_lexemes("café é x ٣");
        assert_eq!(tokens[0], (TokenKind::Identifier, "caf".to_string()));
        assert_eq!(tokens[1], (TokenKind::Unknown, "é".to_string()));
        assert_eq!(tokens[2], (TokenKind::Unknown, "é".to_string()));
        assert_eq!(tokens[3], (TokenKind::Identifier, "x".to_string()));
        assert_eq!(tokens[4], (TokenKind::Unknown, "٣".to_string()));
        assert_eq!(tokens[5].0, TokenKind::Eof);
    }

    #[test]
    fn test_underscore_cannot_start_identifier() {
        let tokens = kinds_and_lexemes("_a");
        assert_eq!(tokens[0], (TokenKind::Unknown, "_".to_string()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "a".to_string()));
    }

    #[test]
    fn test_integer_and_real() {
        let tokens = kinds_and_lexemes("7 3.14 0.5");
        assert_eq!(tokens[0], (TokenKind::Integer, "7".to_string()));
        assert_eq!(tokens[1], (TokenKind::Real, "3.14".to_string()));
        assert_eq!(tokens[2], (TokenKind::Real, "0.5".to_string()));
    }

    #[test]
    fn test_trailing_dot_is_not_real() {
        assert_eq!(
            kinds_and_lexemes("123."),
            vec![
                (TokenKind::Integer, "123".to_string()),
                (TokenKind::Unknown, ".".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_leading_dot_is_not_real() {
        assert_eq!(
            kinds_and_lexemes(".45"),
            vec![
                (TokenKind::Unknown, ".".to_string()),
                (TokenKind::Integer, "45".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_second_dot_splits_real() {
        let tokens = kinds_and_lexemes("1.2.3");
        assert_eq!(tokens[0], (TokenKind::Real, "1.2".to_string()));
        assert_eq!(tokens[1], (TokenKind::Unknown, ".".to_string()));
        assert_eq!(tokens[2], (TokenKind::Integer, "3".to_string()));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("a [* first\ncomment *] b [**] c");
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["a", "b", "c", ""]);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_star_inside_comment_does_not_close_it() {
        let tokens = tokenize("[* a * b ] *] x");
        assert!(tokens[0].is(TokenKind::Identifier, "x"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unterminated_comment() {
        let tokens = tokenize("[* abc");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is(TokenKind::Unknown, UNTERMINATED_COMMENT));
        assert!(tokens[1].is_eof());
    }

    #[test]
    fn test_unterminated_comment_reports_stop_line() {
        let tokens = tokenize("x\n[* opens here\nstill open\n");
        assert!(tokens[1].is(TokenKind::Unknown, UNTERMINATED_COMMENT));
        assert_eq!(tokens[1].line, 4);
    }

    #[test]
    fn test_illegal_characters_are_grouped() {
        assert_eq!(
            kinds_and_lexemes("@@@"),
            vec![
                (TokenKind::Unknown, "@@@".to_string()),
                (TokenKind::Eof, String::new())
            ]
        );
    }

    #[test]
    fn test_unknown_run_stops_at_recognised_tokens() {
        let tokens = kinds_and_lexemes("#&x !!= ?;");
        assert_eq!(tokens[0], (TokenKind::Unknown, "#&".to_string()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "x".to_string()));
        assert_eq!(tokens[2], (TokenKind::Unknown, "!".to_string()));
        assert_eq!(tokens[3], (TokenKind::Operator, "!=".to_string()));
        assert_eq!(tokens[4], (TokenKind::Unknown, "?".to_string()));
        assert_eq!(tokens[5], (TokenKind::Separator, ";".to_string()));
    }

    #[test]
    fn test_unknown_run_stops_before_comment() {
        let tokens = kinds_and_lexemes("%%[* note *]%");
        assert_eq!(tokens[0], (TokenKind::Unknown, "%%".to_string()));
        assert_eq!(tokens[1], (TokenKind::Unknown, "%".to_string()));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("$$\n\n  a = b;\n[* c\n d *]\nprint");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[4].line, 3);
        assert!(tokens[5].is_keyword("print"));
        assert_eq!(tokens[5].line, 6);
        assert_eq!(tokens[6].line, 6);
    }

    #[test]
    fn test_token_display_is_fixed_width() {
        let token = Token::new(TokenKind::Keyword, "while", 1);
        assert_eq!(token.to_string(), format!("{:<15} {:<15}", "keyword", "while"));
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let source = "$$ function f(a integer) { return a; } $$ $$ print(f(1)); $$";
        assert_eq!(tokenize(source), tokenize(source));
    }
}
