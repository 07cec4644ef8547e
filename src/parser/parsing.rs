//! The recursive-descent parser for Waterlang.
//!
//! The parser consumes the token stream produced by [`super::lexing::Scanner`] and builds the
//! AST while performing semantic resolution in the same pass: variables are declared in, and
//! resolved against, a [`ScopeArena`] as the grammar productions run, so an unknown identifier,
//! a use of an uninitialized variable, or a reassignment of a `const` is raised at the exact
//! token which caused it. There is no separate analysis pass; a program which parses has also
//! had its bindings checked.
//!
//! Unlike lexing, parsing is first-error-wins: the first malformed token or binding violation
//! aborts the parse with one located [`ParsingError`].
use std::collections::VecDeque;

use crate::semantics::scope::ScopeArena;

use super::ast::{Expr, FuncDecl, Stmt, Variable};
use super::errors::{ExpectedToken, ParsingError};
use super::token::{Keyword, Location, Op, Token, TokenType};
use super::types::ValueType;


macro_rules! parse_binary_operator {
    ($self:ident, $next:ident, $($op:ident),*) => {{
        let mut root: Expr = $self.$next()?;

        loop {
            let next_token = $self.advance();
            match next_token.token_type {
                $(
                    TokenType::Operator(Op::$op) => {
                        let right: Expr = $self.$next()?;
                        root = Expr::Binary(Box::new(root), next_token, Box::new(right));
                    }
                )*

                // end of this level of precedence
                _ => {
                    $self.put_back(next_token);
                    break;
                }
            }
        }

        Ok(root)
    }};
}


/// Contains a [`VecDeque`] of tokens which is used as a FIFO queue, popped from the front as the
/// grammar productions consume tokens and pushed back onto for single-token lookahead.
///
/// The parser owns the current-scope state for the whole parse: every scope opened while parsing
/// a block is closed again on both the success and the error path, so a failed parse never leaks
/// partially opened scopes.
pub struct Parser {
    tokens: VecDeque<Token>,
    scopes: ScopeArena,
    require_main: bool,
    first_loc: Location,
    eof_loc: Location
}


impl Parser {
    /// Creates a parser over the given token stream. When `require_main` is set, a program
    /// without a function named `main` is rejected.
    pub fn new(tokens: Vec<Token>, require_main: bool) -> Self {
        let first_loc = tokens.first()
                              .map(|t| t.loc.clone())
                              .unwrap_or_else(|| Location::new("", 0, 0));
        let eof_loc = tokens.last()
                            .map(|t| t.loc.clone())
                            .unwrap_or_else(|| Location::new("", 0, 0));

        Parser {
            tokens: VecDeque::from(tokens),
            scopes: ScopeArena::new(),
            require_main,
            first_loc,
            eof_loc
        }
    }


    /// Parses the whole token stream into a program: a sequence of function declarations running
    /// up to end of input.
    pub fn parse(&mut self) -> Result<Vec<FuncDecl>, ParsingError> {
        let mut program: Vec<FuncDecl> = vec![];
        loop {
            let next_token = self.advance();
            match next_token.token_type {
                TokenType::Eof => break,
                TokenType::Keyword(Keyword::Func) => program.push(self.parse_func_decl()?),
                _ => return Err(ParsingError::UnexpectedToken(next_token, ExpectedToken::FuncKeyword))
            }
        }

        if self.require_main && !program.iter().any(|f| f.name == "main") {
            return Err(ParsingError::NoMainFunction(self.first_loc.clone()));
        }

        Ok(program)
    }


    /// Pops the next token. The stream is terminated by an end-of-input token, which is handed
    /// out again (at its original location) should anything try to read past it.
    fn advance(&mut self) -> Token {
        self.tokens.pop_front()
                   .unwrap_or_else(|| Token::new(TokenType::Eof, self.eof_loc.clone()))
    }


    /// Pushes a token back onto the front of the queue for re-reading.
    fn put_back(&mut self, token: Token) {
        self.tokens.push_front(token);
    }


    fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }


    /// Consumes the next token, requiring it to be of exactly the given type.
    fn expect(&mut self, token_type: TokenType, expected: ExpectedToken) -> Result<Token, ParsingError> {
        let next_token = self.advance();
        if next_token.token_type == token_type {
            Ok(next_token)
        } else if next_token.token_type == TokenType::Eof {
            Err(ParsingError::UnexpectedEof(next_token.loc))
        } else {
            Err(ParsingError::UnexpectedToken(next_token, expected))
        }
    }


    /// Consumes the next token, requiring it to be an identifier, and returns its text and
    /// location.
    fn expect_identifier(&mut self, expected: ExpectedToken) -> Result<(String, Location), ParsingError> {
        let next_token = self.advance();
        match next_token.token_type {
            TokenType::Identifier(id) => Ok((id, next_token.loc)),
            TokenType::Eof => Err(ParsingError::UnexpectedEof(next_token.loc)),
            _ => Err(ParsingError::UnexpectedToken(next_token, expected))
        }
    }


    /// Parses a function declaration, assuming the leading `func` keyword was already consumed.
    ///
    /// The grammar is:
    ///
    /// `FUNC_DECL ::= "func" <IDENTIFIER> "(" ")" "->" <TYPE> "is" <STATEMENT> ["func"]`
    ///
    /// A block body must be closed with the trailing `func` terminator. A non-block body is
    /// already terminated by its own semicolon, so the trailing `func` is consumed only when it
    /// cannot be the start of the next declaration.
    fn parse_func_decl(&mut self) -> Result<FuncDecl, ParsingError> {
        let (name, _) = self.expect_identifier(ExpectedToken::Identifier)?;
        self.expect(TokenType::OpenParen, ExpectedToken::OpenParen)?;
        self.expect(TokenType::CloseParen, ExpectedToken::CloseParen)?;
        self.expect(TokenType::Arrow, ExpectedToken::Arrow)?;

        let (type_name, type_loc) = self.expect_identifier(ExpectedToken::TypeName)?;
        let return_type = ValueType::from_name(&type_name)
            .ok_or(ParsingError::UnknownType(type_name, type_loc))?;

        self.expect(TokenType::Keyword(Keyword::Is), ExpectedToken::IsKeyword)?;

        let body = self.parse_statement()?;
        match body {
            Stmt::Block(_) => {
                self.expect(TokenType::Keyword(Keyword::Func), ExpectedToken::FuncKeyword)?;
            }
            _ => self.consume_optional_func_terminator()
        }

        Ok(FuncDecl { name, return_type, body })
    }


    /// Consumes a trailing `func` terminator after a non-block function body, unless that `func`
    /// begins another declaration (in which case the next token after it is an identifier).
    fn consume_optional_func_terminator(&mut self) {
        if self.peek().map(|t| &t.token_type) != Some(&TokenType::Keyword(Keyword::Func)) {
            return;
        }

        let starts_next_decl = matches!(
            self.tokens.get(1).map(|t| &t.token_type),
            Some(TokenType::Identifier(_))
        );
        if !starts_next_decl {
            self.advance();
        }
    }


    /// Parses a single statement, dispatching on its leading token:
    ///  - `begin ... end` blocks,
    ///  - return statements,
    ///  - `var` and `const` declarations,
    ///  - reassignments of an existing variable.
    fn parse_statement(&mut self) -> Result<Stmt, ParsingError> {
        let next_token = self.advance();
        match next_token.token_type {
            TokenType::Keyword(Keyword::Begin) => self.parse_block(),
            TokenType::Keyword(Keyword::Return) => self.parse_return(),
            TokenType::Keyword(Keyword::Var) => self.parse_var_decl(false),
            TokenType::Keyword(Keyword::Const) => self.parse_var_decl(true),
            TokenType::Identifier(id) => self.parse_reassignment(id, next_token.loc),
            TokenType::Eof => Err(ParsingError::UnexpectedEof(next_token.loc)),
            _ => Err(ParsingError::UnexpectedToken(next_token, ExpectedToken::Statement))
        }
    }


    /// Parses a `begin ... end` block, assuming `begin` was already consumed.
    ///
    /// The block's scope is opened before its statements are parsed and closed again whether the
    /// body parses or not, keeping scope pushes and pops symmetrical on every exit path.
    fn parse_block(&mut self) -> Result<Stmt, ParsingError> {
        let depth = self.scopes.depth();
        self.scopes.push();
        let result = self.parse_block_statements();
        self.scopes.unwind_to(depth);
        result
    }


    fn parse_block_statements(&mut self) -> Result<Stmt, ParsingError> {
        let mut statements: Vec<Stmt> = vec![];
        loop {
            if self.peek().map(|t| &t.token_type) == Some(&TokenType::Keyword(Keyword::End)) {
                self.advance();
                break;
            }

            statements.push(self.parse_statement()?);
        }

        Ok(Stmt::Block(statements))
    }


    fn parse_return(&mut self) -> Result<Stmt, ParsingError> {
        let expr = self.parse_expression()?;
        self.expect(TokenType::Semicolon, ExpectedToken::Semicolon)?;
        Ok(Stmt::Return(expr))
    }


    /// Parses a variable declaration, assuming the leading `var` or `const` keyword was already
    /// consumed:
    ///
    /// `VAR_DECL ::= "var" <IDENTIFIER> ":" <TYPE> ["=" <EXPRESSION>] ";"
    ///             | "const" <IDENTIFIER> ":" <TYPE> "=" <EXPRESSION> ";"`
    ///
    /// The variable is registered as initialized iff an initializer is present; a `const`
    /// declaration without one is rejected.
    fn parse_var_decl(&mut self, is_const: bool) -> Result<Stmt, ParsingError> {
        let (name, _) = self.expect_identifier(ExpectedToken::Identifier)?;
        self.expect(TokenType::Colon, ExpectedToken::Colon)?;

        let (type_name, type_loc) = self.expect_identifier(ExpectedToken::TypeName)?;
        let v_type = ValueType::from_name(&type_name)
            .ok_or(ParsingError::UnknownType(type_name, type_loc))?;
        let variable = Variable::new(&name, v_type, is_const);

        let next_token = self.advance();
        let initializer = match next_token.token_type {
            TokenType::Assign => {
                let expr = self.parse_expression()?;
                self.expect(TokenType::Semicolon, ExpectedToken::Semicolon)?;
                Some(expr)
            }
            TokenType::Semicolon if !is_const => None,
            TokenType::Eof => return Err(ParsingError::UnexpectedEof(next_token.loc)),
            _ => return Err(ParsingError::UnexpectedToken(next_token, ExpectedToken::Assign))
        };

        self.scopes.declare_or_update(variable.clone(), initializer.is_some());
        Ok(Stmt::VarDecl(variable, initializer))
    }


    /// Parses a reassignment `<IDENTIFIER> "=" <EXPRESSION> ";"`, assuming the identifier was
    /// already consumed.
    ///
    /// The identifier must resolve to a declared variable and that variable must not be `const`;
    /// the assignment marks the binding initialized in whichever scope owns it.
    fn parse_reassignment(&mut self, name: String, loc: Location) -> Result<Stmt, ParsingError> {
        let variable = match self.scopes.lookup(&name) {
            Some(v) => v.clone(),
            None => return Err(ParsingError::UnknownVariable(name, loc))
        };

        if variable.is_const {
            return Err(ParsingError::ConstReassignment(name, loc));
        }

        self.expect(TokenType::Assign, ExpectedToken::Assign)?;
        let expr = self.parse_expression()?;
        self.expect(TokenType::Semicolon, ExpectedToken::Semicolon)?;

        self.scopes.declare_or_update(variable.clone(), true);
        Ok(Stmt::Reassign(variable, expr))
    }


    /// Parses an expression, such as `x * (3 - y)`, with the usual operator precedence.
    ///
    /// Uses recursive descent with a rule per level of precedence: terms (`+`, `-`) are built
    /// from factors (`*`, `/`), which are built from unary negations of primaries.
    fn parse_expression(&mut self) -> Result<Expr, ParsingError> {
        self.parse_term()
    }


    fn parse_term(&mut self) -> Result<Expr, ParsingError> {
        parse_binary_operator!(self, parse_factor, Add, Sub)
    }


    fn parse_factor(&mut self) -> Result<Expr, ParsingError> {
        parse_binary_operator!(self, parse_unary, Mul, Div)
    }


    fn parse_unary(&mut self) -> Result<Expr, ParsingError> {
        let next_token = self.advance();
        match next_token.token_type {
            TokenType::Operator(Op::Sub) => Ok(Expr::Unary(true, Box::new(self.parse_unary()?))),
            _ => {
                self.put_back(next_token);
                self.parse_primary()
            }
        }
    }


    /// Parses a primary expression: an integer literal, a variable reference, or a parenthesized
    /// expression.
    ///
    /// Variable references are resolved against the current scope immediately: an unknown
    /// identifier or a reference to a variable which has not yet been initialized is an error at
    /// this token, not in some later pass.
    fn parse_primary(&mut self) -> Result<Expr, ParsingError> {
        let next_token = self.advance();
        match next_token.token_type {
            TokenType::IntLiteral(n) => Ok(Expr::Literal(n, ValueType::Int)),

            TokenType::Identifier(id) => {
                let variable = match self.scopes.lookup(&id) {
                    Some(v) => v.clone(),
                    None => return Err(ParsingError::UnknownVariable(id, next_token.loc))
                };

                if !self.scopes.is_initialized(&variable) {
                    return Err(ParsingError::UninitializedVariable(id, next_token.loc));
                }

                Ok(Expr::Variable(variable))
            }

            TokenType::OpenParen => {
                let inner = self.parse_expression()?;
                self.expect(TokenType::CloseParen, ExpectedToken::CloseParen)?;
                Ok(Expr::Grouping(Box::new(inner)))
            }

            TokenType::CloseParen => Err(ParsingError::UnmatchedCloseParen(next_token.loc)),
            TokenType::Eof => Err(ParsingError::UnexpectedEof(next_token.loc)),
            _ => Err(ParsingError::UnexpectedToken(next_token, ExpectedToken::Expression))
        }
    }
}


#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::parser::lexing::Scanner;

    use super::*;

    fn parse_source(source: &str) -> Result<Vec<FuncDecl>, ParsingError> {
        let scanner = Scanner::new(source, "test.wl");
        Parser::new(scanner.tokens, true).parse()
    }

    fn parse_without_main_check(source: &str) -> Result<Vec<FuncDecl>, ParsingError> {
        let scanner = Scanner::new(source, "test.wl");
        Parser::new(scanner.tokens, false).parse()
    }

    #[test]
    fn parses_expression_body_with_precedence() {
        let program = parse_source("func main() -> int is return 1 + 2 * 3; func").unwrap();
        assert_eq!(program.len(), 1);

        let func = &program[0];
        assert_eq!(func.name, "main");
        assert_eq!(func.return_type, ValueType::Int);

        // the body must be Return(Binary(1, +, Binary(2, *, 3)))
        let expr = match &func.body {
            Stmt::Return(expr) => expr,
            other => panic!("expected a return statement, got {:?}", other)
        };
        let (left, add, right) = match expr {
            Expr::Binary(left, op, right) => (left, op, right),
            other => panic!("expected a binary operation, got {:?}", other)
        };

        assert_eq!(add.token_type, TokenType::Operator(Op::Add));
        assert_eq!(**left, Expr::Literal(1, ValueType::Int));
        match &**right {
            Expr::Binary(l, mul, r) => {
                assert_eq!(mul.token_type, TokenType::Operator(Op::Mul));
                assert_eq!(**l, Expr::Literal(2, ValueType::Int));
                assert_eq!(**r, Expr::Literal(3, ValueType::Int));
            }
            other => panic!("expected a binary operation, got {:?}", other)
        }
    }

    #[test]
    fn declared_variable_resolves_as_initialized() {
        let program = parse_source(
            "func main() -> int is begin var x: int = 5; return x; end func"
        ).unwrap();

        let statements = match &program[0].body {
            Stmt::Block(statements) => statements,
            other => panic!("expected a block, got {:?}", other)
        };

        let expected = Variable::new("x", ValueType::Int, false);
        assert_eq!(statements[0], Stmt::VarDecl(expected.clone(), Some(Expr::Literal(5, ValueType::Int))));
        assert_eq!(statements[1], Stmt::Return(Expr::Variable(expected)));
    }

    #[test]
    fn const_reassignment_is_rejected_at_the_offending_token() {
        let err = parse_source(
            "func main() -> int is begin const c: int = 1; c = 2; end func"
        ).unwrap_err();

        match err {
            ParsingError::ConstReassignment(name, loc) => {
                assert_eq!(name, "c");
                assert_eq!((loc.line, loc.col), (0, 46));
            }
            other => panic!("expected a const reassignment error, got {}", other)
        }
    }

    #[test]
    fn unknown_variable_reference_is_rejected() {
        let err = parse_without_main_check("func f() -> int is return y; func").unwrap_err();
        assert!(matches!(err, ParsingError::UnknownVariable(ref name, _) if name == "y"));
    }

    #[test]
    fn uninitialized_variable_use_is_rejected() {
        let err = parse_source(
            "func main() -> int is begin var x: int; return x; end func"
        ).unwrap_err();
        assert!(matches!(err, ParsingError::UninitializedVariable(ref name, _) if name == "x"));
    }

    #[test]
    fn inner_assignment_initializes_the_outer_binding() {
        // x is declared uninitialized in the outer block and assigned in the inner one; the
        // assignment must reach the outer binding for the final return to resolve
        let program = parse_source(
            "func main() -> int is begin var x: int; begin x = 1; end return x; end func"
        ).unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn const_declaration_requires_an_initializer() {
        let err = parse_source("func main() -> int is begin const c: int; end func").unwrap_err();
        assert!(matches!(err, ParsingError::UnexpectedToken(_, ExpectedToken::Assign)));
    }

    #[test]
    fn missing_main_is_rejected_at_the_first_token() {
        let err = parse_source("func f() -> int is return 1; func").unwrap_err();
        match err {
            ParsingError::NoMainFunction(loc) => assert_eq!((loc.line, loc.col), (0, 0)),
            other => panic!("expected a missing-main error, got {}", other)
        }
    }

    #[test]
    fn programs_with_several_functions_parse() {
        let program = parse_source(
            "func helper() -> int is return 1; func main() -> int is return 2; func"
        ).unwrap();

        let names: Vec<&str> = program.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["helper", "main"]);
    }

    #[test]
    fn block_body_requires_the_func_terminator() {
        let err = parse_source("func main() -> int is begin return 1; end").unwrap_err();
        assert!(matches!(err, ParsingError::UnexpectedEof(_)));
    }

    #[test]
    fn unmatched_close_paren_has_its_own_diagnostic() {
        let err = parse_source("func main() -> int is return ); func").unwrap_err();
        assert!(matches!(err, ParsingError::UnmatchedCloseParen(_)));
    }

    #[test]
    fn unclosed_group_is_an_unexpected_token() {
        let err = parse_source("func main() -> int is return (1 + 2; func").unwrap_err();
        assert!(matches!(err, ParsingError::UnexpectedToken(_, ExpectedToken::CloseParen)));
    }

    #[test]
    fn end_of_input_mid_expression_has_its_own_diagnostic() {
        let err = parse_source("func main() -> int is return 1 +").unwrap_err();
        assert!(matches!(err, ParsingError::UnexpectedEof(_)));
    }

    #[test]
    fn unknown_return_type_is_rejected() {
        let err = parse_source("func main() -> float is return 1; func").unwrap_err();
        assert!(matches!(err, ParsingError::UnknownType(ref name, _) if name == "float"));
    }

    #[test]
    fn scope_stack_is_unwound_when_a_block_fails_to_parse() {
        let scanner = Scanner::new(
            "func main() -> int is begin begin var x: int = ; end end func",
            "test.wl"
        );
        let mut parser = Parser::new(scanner.tokens, true);

        assert!(parser.parse().is_err());
        // both partially opened block scopes must have been discarded
        assert_eq!(parser.scopes.depth(), 1);
    }

    #[rstest]
    #[case(
        "func main() -> int is return y; func",
        "test.wl:1:30: unknown variable 'y'"
    )]
    #[case(
        "func main() -> int is begin const c: int = 1; c = 2; end func",
        "test.wl:1:47: cannot reassign const variable 'c'"
    )]
    #[case(
        "func f() -> int is return 1; func",
        "test.wl:1:1: no main function defined"
    )]
    #[case(
        "func main() -> int is begin 5; end func",
        "test.wl:1:29: unexpected integer literal 5, expected a statement"
    )]
    fn diagnostics_report_the_first_error_location(#[case] source: &str, #[case] expected: &str) {
        let err = parse_source(source).unwrap_err();
        assert_eq!(err.to_string(), expected);
    }
}
