//! Lexical analysis and parsing of Waterlang source code.

pub mod ast;
pub mod errors;
pub mod lexing;
pub mod parsing;
pub mod token;
pub mod types;
