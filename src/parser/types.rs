//! The value types of Waterlang and their C++ spellings.
use std::fmt;


/// A Waterlang value type. The language currently has a single type, `int`, but the parser and
/// transpiler are written against this enum so that further types slot in without reshaping the
/// AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int
}


impl ValueType {
    /// Resolves a source-level type annotation to a [`ValueType`], or `None` if the name does not
    /// name a type.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            _ => None
        }
    }


    /// Returns the spelling of this type in the generated C++.
    pub fn as_cpp_str(&self) -> &'static str {
        match self {
            Self::Int => "int"
        }
    }
}


impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_cpp_str())
    }
}
