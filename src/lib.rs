//! Compiler front end for the Waterlang programming language.
//!
//! Waterlang is a small imperative expression language which is lowered to
//! C++ and handed to a native toolchain by the driver binary. The library
//! covers the three stages of that lowering:
//!
//! ```text
//! source text → Scanner → tokens → Parser → AST → Transpiler → C++ text
//! ```
//!
//! 1. [`parser::lexing`] — turns raw source into a located token stream.
//!    Lexical errors are embedded in the stream as error tokens and
//!    collected by [`parser::lexing::Scanner::report`].
//! 2. [`parser::parsing`] — recursive-descent parser which builds the AST
//!    and resolves variable bindings in a single pass, tracking scopes with
//!    [`semantics::scope::ScopeArena`].
//! 3. [`transpiler::transpile_cpp`] — syntax-directed walk of the AST
//!    emitting the C++ translation.

pub mod parser;
pub mod semantics;
pub mod transpiler;
