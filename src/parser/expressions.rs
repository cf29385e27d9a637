//! Expression parsing implementation
//!
//! Expressions use the usual two precedence levels, written without left
//! recursion:
//!
//! ```text
//! <Expression>      ::= <Term> <ExpressionPrime>
//! <ExpressionPrime> ::= (+|-) <Term> <ExpressionPrime> | ε
//! <Term>            ::= <Factor> <TermPrime>
//! <TermPrime>       ::= (*|/) <Factor> <TermPrime> | ε
//! <Factor>          ::= - <Primary> | <Primary>
//! <Primary>         ::= id | id ( <IDs> ) | integer | real | true | false | ( <Expression> )
//! ```
//!
//! The primed rules are tail recursive, so they run as loops that record the
//! same production each time round.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

/// Which alternative of `<Primary>` the lookahead selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrimaryForm {
    Call,
    Identifier,
    Number,
    Boolean,
    Parenthesized,
    Invalid,
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) {
        self.production("<Expression> -> <Term> <ExpressionPrime>");
        self.parse_term();
        self.parse_expression_prime();
    }

    fn parse_expression_prime(&mut self) {
        loop {
            let token = self.peek();
            if token.is_operator("+") || token.is_operator("-") {
                self.production("<ExpressionPrime> -> (+|-) <Term> <ExpressionPrime>");
                self.consume();
                self.parse_term();
            } else {
                self.production("<ExpressionPrime> -> epsilon");
                return;
            }
        }
    }

    fn parse_term(&mut self) {
        self.production("<Term> -> <Factor> <TermPrime>");
        self.parse_factor();
        self.parse_term_prime();
    }

    fn parse_term_prime(&mut self) {
        loop {
            let token = self.peek();
            if token.is_operator("*") || token.is_operator("/") {
                self.production("<TermPrime> -> (*|/) <Factor> <TermPrime>");
                self.consume();
                self.parse_factor();
            } else {
                self.production("<TermPrime> -> epsilon");
                return;
            }
        }
    }

    /// Parse factor, folding in unary minus
    fn parse_factor(&mut self) {
        if self.peek().is_operator("-") {
            self.production("<Factor> -> - <Primary>");
            self.consume();
        } else {
            self.production("<Factor> -> <Primary>");
        }
        self.parse_primary();
    }

    fn primary_form(&self) -> PrimaryForm {
        let token = self.peek();
        match token.kind {
            TokenKind::Identifier if self.peek_ahead(1).is_separator("(") => PrimaryForm::Call,
            TokenKind::Identifier => PrimaryForm::Identifier,
            TokenKind::Integer | TokenKind::Real => PrimaryForm::Number,
            TokenKind::Keyword if token.is_keyword("true") || token.is_keyword("false") => {
                PrimaryForm::Boolean
            }
            TokenKind::Separator if token.lexeme == "(" => PrimaryForm::Parenthesized,
            _ => PrimaryForm::Invalid,
        }
    }

    fn parse_primary(&mut self) {
        match self.primary_form() {
            PrimaryForm::Call => {
                self.production("<Primary> -> id ( <IDs> )");
                self.expect_identifier();
                self.expect_separator("(");
                self.parse_ids();
                self.expect_separator(")");
            }
            PrimaryForm::Identifier => {
                self.production("<Primary> -> id");
                self.expect_identifier();
            }
            PrimaryForm::Number => {
                self.production("<Primary> -> integer | real");
                self.consume();
            }
            PrimaryForm::Boolean => {
                self.production("<Primary> -> true | false");
                self.consume();
            }
            PrimaryForm::Parenthesized => {
                self.production("<Primary> -> ( <Expression> )");
                self.expect_separator("(");
                self.parse_expression();
                self.expect_separator(")");
            }
            PrimaryForm::Invalid => self.reject("invalid primary"),
        }
    }
}
