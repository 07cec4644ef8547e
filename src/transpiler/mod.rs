//! Translation of the Waterlang AST into C++ source text.

pub mod transpile_cpp;
