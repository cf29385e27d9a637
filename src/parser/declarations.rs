//! Program structure and declaration parsing
//!
//! This module handles the outer shape of a Rat25S program and everything
//! that declares names:
//!
//! - The four `$$` program sections
//! - Function definitions with parameter lists and bodies
//! - Declaration lists (`integer a, b; real c;`)
//! - Identifier lists shared by parameters, declarations, `scan` and calls
//!
//! # Grammar
//!
//! ```text
//! <Rat25S>                 ::= $$ <OptFunctionDefinitions> $$ <OptDeclarationList> $$ <StatementList> $$
//! <OptFunctionDefinitions> ::= <FunctionDefinitions> | ε
//! <FunctionDefinitions>    ::= <Function> [<FunctionDefinitions>]
//! <Function>               ::= function id ( <OptParameterList> ) <OptDeclarationList> <Body>
//! <OptParameterList>       ::= <ParameterList> | ε
//! <ParameterList>          ::= <Parameter> [ , <ParameterList> ]
//! <Parameter>              ::= <IDs> <Qualifier>
//! <Qualifier>              ::= integer | boolean | real
//! <Body>                   ::= { <StatementList> }
//! <OptDeclarationList>     ::= <DeclarationList> | ε
//! <DeclarationList>        ::= <Declaration> ; [<DeclarationList>]
//! <Declaration>            ::= <Qualifier> <IDs>
//! <IDs>                    ::= id [ , <IDs> ]
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

const QUALIFIERS: [&str; 3] = ["integer", "boolean", "real"];

impl Parser {
    /// Parse a whole program, through the end-of-input token.
    pub(crate) fn parse_rat25s(&mut self) {
        self.production(
            "<Rat25S> -> $$ <OptFunctionDefinitions> $$ <OptDeclarationList> $$ <StatementList> $$",
        );
        self.expect_separator("$$");
        self.parse_opt_function_definitions();
        self.expect_separator("$$");
        self.parse_opt_declaration_list();
        self.expect_separator("$$");
        self.parse_statement_list();
        self.expect_separator("$$");
        self.expect(TokenKind::Eof, None);
    }

    fn parse_opt_function_definitions(&mut self) {
        if self.peek().is_keyword("function") {
            self.production("<OptFunctionDefinitions> -> <FunctionDefinitions>");
            self.parse_function_definitions();
        } else {
            self.production("<OptFunctionDefinitions> -> epsilon");
        }
    }

    fn parse_function_definitions(&mut self) {
        loop {
            self.production("<FunctionDefinitions> -> <Function> [<FunctionDefinitions>]");
            self.parse_function();
            if !self.peek().is_keyword("function") {
                return;
            }
        }
    }

    /// Parse function definition: function name(params) declarations { body }
    fn parse_function(&mut self) {
        self.production(
            "<Function> -> function id ( <OptParameterList> ) <OptDeclarationList> <Body>",
        );
        self.expect_keyword("function");
        self.expect_identifier();
        self.expect_separator("(");
        self.parse_opt_parameter_list();
        self.expect_separator(")");
        self.parse_opt_declaration_list();
        self.parse_body();
    }

    fn parse_opt_parameter_list(&mut self) {
        if self.peek().kind == TokenKind::Identifier {
            self.production("<OptParameterList> -> <ParameterList>");
            self.parse_parameter_list();
        } else {
            self.production("<OptParameterList> -> epsilon");
        }
    }

    fn parse_parameter_list(&mut self) {
        loop {
            self.production("<ParameterList> -> <Parameter> [ , <ParameterList> ]");
            self.parse_parameter();
            if !self.peek().is_separator(",") {
                return;
            }
            self.expect_separator(",");
        }
    }

    fn parse_parameter(&mut self) {
        self.production("<Parameter> -> <IDs> <Qualifier>");
        self.parse_ids();
        self.parse_qualifier();
    }

    fn parse_qualifier(&mut self) {
        self.production("<Qualifier> -> integer | boolean | real");
        if self.at_qualifier() {
            self.consume();
        } else {
            self.reject("expected qualifier (integer, boolean or real)");
        }
    }

    fn parse_body(&mut self) {
        self.production("<Body> -> { <StatementList> }");
        self.expect_separator("{");
        self.parse_statement_list();
        self.expect_separator("}");
    }

    fn parse_opt_declaration_list(&mut self) {
        if self.at_qualifier() {
            self.production("<OptDeclarationList> -> <DeclarationList>");
            self.parse_declaration_list();
        } else {
            self.production("<OptDeclarationList> -> epsilon");
        }
    }

    fn parse_declaration_list(&mut self) {
        loop {
            self.production("<DeclarationList> -> <Declaration> ; [<DeclarationList>]");
            self.parse_declaration();
            self.expect_separator(";");
            if !self.at_qualifier() {
                return;
            }
        }
    }

    fn parse_declaration(&mut self) {
        self.production("<Declaration> -> <Qualifier> <IDs>");
        self.parse_qualifier();
        self.parse_ids();
    }

    /// Parse a comma separated identifier list, one `<IDs>` production per id
    pub(crate) fn parse_ids(&mut self) {
        loop {
            self.production("<IDs> -> id [ , <IDs> ]");
            self.expect_identifier();
            if !self.peek().is_separator(",") {
                return;
            }
            self.expect_separator(",");
        }
    }

    fn at_qualifier(&self) -> bool {
        let token = self.peek();
        QUALIFIERS.iter().any(|word| token.is_keyword(word))
    }
}
