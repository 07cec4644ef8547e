//! Semantic state maintained while parsing, chiefly the lexical scope chain.

pub mod scope;
