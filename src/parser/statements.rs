//! Statement parsing implementation
//!
//! This module handles parsing of all Rat25S statement forms:
//!
//! - Compound statements: `{ ... }`
//! - Assignment: `id = expression;`
//! - Control flow: `if ... endif`, `while ... endwhile`, `return`
//! - I/O: `print(expression);`, `scan(id, ...);`
//! - Conditions and relational operators used by `if` and `while`
//!
//! # Grammar
//!
//! ```text
//! <StatementList> ::= <Statement> <StatementList> | ε
//! <Statement>     ::= <Compound> | <Assign> | <If> | <Return> | <Print> | <Scan> | <While>
//! <Compound>      ::= { <StatementList> }
//! <Assign>        ::= id = <Expression> ;
//! <If>            ::= if ( <Condition> ) <Statement> [else <Statement>] endif
//! <Return>        ::= return ; | return <Expression> ;
//! <Print>         ::= print ( <Expression> ) ;
//! <Scan>          ::= scan ( <IDs> ) ;
//! <While>         ::= while ( <Condition> ) <Statement> endwhile
//! <Condition>     ::= <Expression> <Relop> <Expression>
//! <Relop>         ::= == | != | > | < | <= | =>
//! ```
//!
//! A statement list ends on its FOLLOW set (`}`, `$$` or end of input). Any
//! other token is handed to [`Parser::parse_statement`], which reports it if it
//! cannot start a statement, so checking continues up to the real terminator.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;

const RELATIONAL_OPERATORS: [&str; 6] = ["==", "!=", ">", "<", "<=", "=>"];

/// Which statement form the lookahead selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementStart {
    Compound,
    Assign,
    If,
    While,
    Return,
    Print,
    Scan,
    UnexpectedKeyword,
    Invalid,
}

impl StatementStart {
    fn of(token: &Token) -> Self {
        match token.kind {
            TokenKind::Separator if token.lexeme == "{" => StatementStart::Compound,
            TokenKind::Identifier => StatementStart::Assign,
            TokenKind::Keyword => match token.lexeme.to_ascii_lowercase().as_str() {
                "if" => StatementStart::If,
                "while" => StatementStart::While,
                "return" => StatementStart::Return,
                "print" => StatementStart::Print,
                "scan" => StatementStart::Scan,
                _ => StatementStart::UnexpectedKeyword,
            },
            _ => StatementStart::Invalid,
        }
    }
}

impl Parser {
    /// Parse statements until `}`, `$$` or end of input
    pub(crate) fn parse_statement_list(&mut self) {
        loop {
            if self.at_statement_list_end() {
                self.production("<StatementList> -> epsilon");
                return;
            }
            self.production("<StatementList> -> <Statement> <StatementList>");
            self.parse_statement();
        }
    }

    fn at_statement_list_end(&self) -> bool {
        let token = self.peek();
        token.is_eof() || token.is_separator("}") || token.is_separator("$$")
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) {
        match StatementStart::of(self.peek()) {
            StatementStart::Compound => {
                self.production("<Statement> -> <Compound>");
                self.parse_compound();
            }
            StatementStart::Assign => {
                self.production("<Statement> -> <Assign>");
                self.parse_assign();
            }
            StatementStart::If => {
                self.production("<Statement> -> <If>");
                self.parse_if();
            }
            StatementStart::While => {
                self.production("<Statement> -> <While>");
                self.parse_while();
            }
            StatementStart::Return => {
                self.production("<Statement> -> <Return>");
                self.parse_return();
            }
            StatementStart::Print => {
                self.production("<Statement> -> <Print>");
                self.parse_print();
            }
            StatementStart::Scan => {
                self.production("<Statement> -> <Scan>");
                self.parse_scan();
            }
            StatementStart::UnexpectedKeyword => self.reject("unexpected keyword in statement"),
            StatementStart::Invalid => self.reject("invalid statement start"),
        }
    }

    fn parse_compound(&mut self) {
        self.production("<Compound> -> { <StatementList> }");
        self.expect_separator("{");
        self.parse_statement_list();
        self.expect_separator("}");
    }

    fn parse_assign(&mut self) {
        self.production("<Assign> -> id = <Expression> ;");
        self.expect_identifier();
        self.expect_operator("=");
        self.parse_expression();
        self.expect_separator(";");
    }

    /// Parse if statement: if (condition) statement [else statement] endif
    fn parse_if(&mut self) {
        self.production("<If> -> if ( <Condition> ) <Statement> [else <Statement>] endif");
        self.expect_keyword("if");
        self.expect_separator("(");
        self.parse_condition();
        self.expect_separator(")");
        self.parse_statement();
        if self.peek().is_keyword("else") {
            self.expect_keyword("else");
            self.parse_statement();
        }
        self.expect_keyword("endif");
    }

    fn parse_return(&mut self) {
        self.production("<Return> -> return ; | return <Expression> ;");
        self.expect_keyword("return");
        if !self.peek().is_separator(";") {
            self.parse_expression();
        }
        self.expect_separator(";");
    }

    fn parse_print(&mut self) {
        self.production("<Print> -> print ( <Expression> ) ;");
        self.expect_keyword("print");
        self.expect_separator("(");
        self.parse_expression();
        self.expect_separator(")");
        self.expect_separator(";");
    }

    fn parse_scan(&mut self) {
        self.production("<Scan> -> scan ( <IDs> ) ;");
        self.expect_keyword("scan");
        self.expect_separator("(");
        self.parse_ids();
        self.expect_separator(")");
        self.expect_separator(";");
    }

    /// Parse while loop: while (condition) statement endwhile
    fn parse_while(&mut self) {
        self.production("<While> -> while ( <Condition> ) <Statement> endwhile");
        self.expect_keyword("while");
        self.expect_separator("(");
        self.parse_condition();
        self.expect_separator(")");
        self.parse_statement();
        self.expect_keyword("endwhile");
    }

    fn parse_condition(&mut self) {
        self.production("<Condition> -> <Expression> <Relop> <Expression>");
        self.parse_expression();
        self.parse_relop();
        self.parse_expression();
    }

    fn parse_relop(&mut self) {
        self.production("<Relop> -> == | != | > | < | <= | =>");
        let token = self.peek();
        if RELATIONAL_OPERATORS.iter().any(|op| token.is_operator(op)) {
            self.consume();
        } else {
            self.reject("expected relational operator");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse::parse_source;
    use crate::parser::trace::TraceEntry;

    fn program(statements: &str) -> String {
        format!("$$ $$ $$\n{}\n$$", statements)
    }

    #[test]
    fn test_every_statement_form() {
        let source = program(
            r#"
            { x = 1; }
            y = x * 2;
            if (x < y) print(x); endif
            if (x == y) { x = 0; } else scan(x, y); endif
            while (x <= 10) x = x + 1; endwhile
            return;
            return x - 1;
            "#,
        );
        let outcome = parse_source(&source);
        assert!(outcome.is_success(), "{:?}", outcome.diagnostics);
    }

    #[test]
    fn test_all_relational_operators() {
        for op in ["==", "!=", ">", "<", "<=", "=>"] {
            let source = program(&format!("while (a {} b) a = a; endwhile", op));
            let outcome = parse_source(&source);
            assert!(outcome.is_success(), "{}: {:?}", op, outcome.diagnostics);
        }
    }

    #[test]
    fn test_greater_equal_is_not_a_relop() {
        let outcome = parse_source(&program("if (a >= b) a = b; endif"));
        assert_eq!(outcome.diagnostics[0].lexeme, ">=");
        assert_eq!(outcome.diagnostics[0].message, "expected relational operator");
    }

    #[test]
    fn test_nested_control_flow() {
        let source = program(
            r#"
            while (i < n)
            {
                if (i == 3) { print(i); } else { i = i + 2; } endif
                i = i + 1;
            }
            endwhile
            "#,
        );
        let outcome = parse_source(&source);
        assert!(outcome.is_success(), "{:?}", outcome.diagnostics);
    }

    #[test]
    fn test_missing_semicolon_recovers() {
        let source = "$$ $$ $$\na = 1\nb = 2;\nc = 3;\n$$";
        let outcome = parse_source(source);

        let first = &outcome.diagnostics[0];
        assert_eq!(first.line, 3);
        assert_eq!(first.lexeme, "b");
        assert_eq!(first.message, "expected separator ';'");

        // the skipped `b` leaves `= 2 ;`, each rejected as a statement start
        assert_eq!(outcome.error_count(), 4);

        let checked_c = outcome
            .trace
            .iter()
            .any(|e| matches!(e, TraceEntry::Terminal(t) if t.lexeme == "c"));
        assert!(checked_c);
        assert!(matches!(outcome.trace.last(), Some(TraceEntry::Terminal(t)) if t.is_eof()));
    }

    #[test]
    fn test_invalid_statement_start() {
        let outcome = parse_source(&program("5;"));
        assert_eq!(outcome.error_count(), 2);
        assert_eq!(outcome.diagnostics[0].message, "invalid statement start");
        assert_eq!(outcome.diagnostics[1].lexeme, ";");
    }

    #[test]
    fn test_unexpected_keyword() {
        let outcome = parse_source(&program("endwhile"));
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.diagnostics[0].message, "unexpected keyword in statement");
    }

    #[test]
    fn test_unknown_token_is_a_mismatch() {
        let outcome = parse_source(&program("x = 1 @ ;"));
        assert_eq!(outcome.error_count(), 2);
        assert_eq!(outcome.diagnostics[0].lexeme, "@");
    }

    #[test]
    fn test_missing_endif() {
        let outcome = parse_source(&program("if (a < b) a = b;"));
        let first = &outcome.diagnostics[0];
        assert_eq!(first.message, "expected keyword 'endif'");
        assert_eq!(first.lexeme, "$$");
        // the closing `$$` was the token skipped in its place
        assert_eq!(outcome.error_count(), 2);
    }

    #[test]
    fn test_keywords_in_upper_case() {
        let outcome = parse_source(&program("WHILE (a < b) Print(a); ENDWHILE"));
        assert!(outcome.is_success(), "{:?}", outcome.diagnostics);
    }
}
