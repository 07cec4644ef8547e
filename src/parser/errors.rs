use std::{error, fmt};

use super::token::{Location, Token};


/// The kinds of token a parser production may demand, used to phrase "unexpected token"
/// diagnostics in terms of what would have been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedToken {
    Identifier,
    TypeName,
    OpenParen,
    CloseParen,
    Arrow,
    Semicolon,
    Colon,
    Assign,
    FuncKeyword,
    IsKeyword,
    Statement,
    Expression
}


impl fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Self::Identifier => "an identifier",
            Self::TypeName => "a type name",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::Arrow => "'->'",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Assign => "'='",
            Self::FuncKeyword => "keyword 'func'",
            Self::IsKeyword => "keyword 'is'",
            Self::Statement => "a statement",
            Self::Expression => "an expression"
        };
        write!(f, "{}", text)
    }
}


/// A fatal parse or semantic error. Parsing is first-error-wins: the first of these raised aborts
/// the whole parse and is reported with the location of the token that triggered it.
#[derive(Debug, Clone)]
pub enum ParsingError {
    UnexpectedToken(Token, ExpectedToken),
    /// End of input where a statement or expression was expected; distinct from the generic case
    /// so the last meaningful position is still reported.
    UnexpectedEof(Location),
    /// A `)` with no matching `(`; diagnosed separately from a generic unexpected token.
    UnmatchedCloseParen(Location),
    UnknownVariable(String, Location),
    UninitializedVariable(String, Location),
    ConstReassignment(String, Location),
    UnknownType(String, Location),
    NoMainFunction(Location)
}


impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedToken(token, expected) =>
                write!(f, "{}: unexpected {}, expected {}", token.loc, token.describe(), expected),
            Self::UnexpectedEof(loc) =>
                write!(f, "{}: unexpected end of input", loc),
            Self::UnmatchedCloseParen(loc) =>
                write!(f, "{}: unmatched ')'", loc),
            Self::UnknownVariable(name, loc) =>
                write!(f, "{}: unknown variable '{}'", loc, name),
            Self::UninitializedVariable(name, loc) =>
                write!(f, "{}: variable '{}' is used before being initialized", loc, name),
            Self::ConstReassignment(name, loc) =>
                write!(f, "{}: cannot reassign const variable '{}'", loc, name),
            Self::UnknownType(name, loc) =>
                write!(f, "{}: unknown type '{}'", loc, name),
            Self::NoMainFunction(loc) =>
                write!(f, "{}: no main function defined", loc)
        }
    }
}


impl error::Error for ParsingError {}
