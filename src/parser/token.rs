//! Provides a representation of the tokens of the language which include debugging information
//! which can be used to display useful error messages, and the data needed to produce the abstract
//! syntax tree.
use std::fmt;


/// A position in a source file: the file's display name plus a 0-indexed line and column.
///
/// Every token carries one of these so that later stages can report errors without a separate
/// token-to-position table. The [`fmt::Display`] impl renders the conventional 1-indexed
/// `<file>:<line>:<col>` form used in all user-facing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub col: usize
}


impl Location {
    pub fn new(file: &str, line: usize, col: usize) -> Self {
        Self { file: file.to_owned(), line, col }
    }
}


impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line + 1, self.col + 1)
    }
}


/// The reserved words of Waterlang. An identifier which exactly matches one of these is lexed as
/// a keyword token instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Func,
    Is,
    Begin,
    End,
    Return,
    Var,
    Const
}


impl Keyword {
    /// Looks up the keyword matching the given identifier text, or `None` if the text is an
    /// ordinary identifier.
    pub fn lookup(text: &str) -> Option<Self> {
        match text {
            "func" => Some(Self::Func),
            "is" => Some(Self::Is),
            "begin" => Some(Self::Begin),
            "end" => Some(Self::End),
            "return" => Some(Self::Return),
            "var" => Some(Self::Var),
            "const" => Some(Self::Const),
            _ => None
        }
    }
}


/// The binary arithmetic operators. Unary negation is not an `Op`: it is represented directly on
/// the AST's unary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div
}


impl Op {
    /// Returns the spelling of this operator in the generated C++.
    pub fn as_cpp_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/"
        }
    }
}


/// All the possible types of tokens that a token may take in Waterlang.
///
/// The values of literals and identifiers are contained within their variant. `Error` is an
/// ordinary stream member carrying a diagnostic message: the scanner never aborts, it embeds
/// errors in the stream so that every lexical problem can be reported in one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Keyword(Keyword),
    Identifier(String),
    IntLiteral(i64),
    Operator(Op),
    OpenParen,
    CloseParen,
    Arrow,
    Semicolon,
    Colon,
    Assign,
    Eof,
    Error(String)
}


/// Metadata for tokens required for parsing and debugging/error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub loc: Location
}


impl Token {
    /// Creates a new token from the information passed as arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use waterlang::parser::token::{Location, Token, TokenType};
    ///
    /// let token = Token::new(TokenType::Semicolon, Location::new("main.wl", 4, 19));
    /// assert_eq!(token.to_string(), "main.wl:5:20: ';'");
    /// ```
    pub fn new(token_type: TokenType, loc: Location) -> Self {
        Self { token_type, loc }
    }


    /// Returns true if this token is a lexical error token.
    pub fn is_error(&self) -> bool {
        matches!(self.token_type, TokenType::Error(_))
    }


    /// Returns a short description of the token for diagnostics, without its location.
    ///
    /// For error tokens this is the embedded diagnostic message verbatim.
    pub fn describe(&self) -> String {
        match &self.token_type {
            TokenType::Keyword(kw) => format!("keyword '{:?}'", kw).to_lowercase(),
            TokenType::Identifier(id) => format!("identifier '{}'", id),
            TokenType::IntLiteral(n) => format!("integer literal {}", n),
            TokenType::Operator(op) => format!("operator '{}'", op.as_cpp_str()),
            TokenType::OpenParen => "'('".to_owned(),
            TokenType::CloseParen => "')'".to_owned(),
            TokenType::Arrow => "'->'".to_owned(),
            TokenType::Semicolon => "';'".to_owned(),
            TokenType::Colon => "':'".to_owned(),
            TokenType::Assign => "'='".to_owned(),
            TokenType::Eof => "end of input".to_owned(),
            TokenType::Error(msg) => msg.clone()
        }
    }
}


impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.loc, self.describe())
    }
}
