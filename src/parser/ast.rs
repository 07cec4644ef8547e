//! The abstract syntax tree produced by the parser and consumed by the transpiler.
//!
//! Each node kind is a variant of a plain sum type with statically typed fields, so an invalid
//! combination of children is unrepresentable and the transpiler's matches are checked for
//! exhaustiveness at compile time. Nodes own their children exclusively: the AST is a tree with
//! no sharing and no cycles, built once by the parser and then only read.
use super::token::Token;
use super::types::ValueType;


/// A resolved variable: its source name, its type, and whether it was declared `const`.
///
/// Two variables are equal iff all three fields match. Expression nodes reference the resolved
/// `Variable` directly rather than a bare identifier, since binding decisions are made during
/// parsing and never revisited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub v_type: ValueType,
    pub is_const: bool
}


impl Variable {
    pub fn new(name: &str, v_type: ValueType, is_const: bool) -> Self {
        Self { name: name.to_owned(), v_type, is_const }
    }
}


/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Left operand, operator token, right operand. The full operator token is kept so the
    /// transpiler can read its spelling and diagnostics keep a location.
    Binary(Box<Expr>, Token, Box<Expr>),
    /// Unary expression; the flag is true when the operand is negated with a leading `-`.
    Unary(bool, Box<Expr>),
    /// An integer literal and its type.
    Literal(i64, ValueType),
    /// A parenthesized expression.
    Grouping(Box<Expr>),
    /// A reference to a variable, resolved against the scope chain at parse time.
    Variable(Variable)
}


/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A `begin ... end` block holding an ordered sequence of statements.
    Block(Vec<Stmt>),
    /// `return <expr>;`
    Return(Expr),
    /// A `var` or `const` declaration with an optional initializer. `const` declarations always
    /// carry an initializer; the parser rejects them otherwise.
    VarDecl(Variable, Option<Expr>),
    /// Reassignment of an existing, non-`const` variable.
    Reassign(Variable, Expr)
}


/// A function declaration: `func <name>() -> <type> is <body>`.
///
/// Parameters are not supported, so none are stored; the grammar still requires the empty `()`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub return_type: ValueType,
    pub body: Stmt
}
