//! Translates a Waterlang AST into C++ source text.
//!
//! The translation is purely syntax-directed: one output rule per AST node kind, emitted by a
//! depth-first walk. No symbol lookups or semantic recomputation happen here, because every
//! binding decision was already made by the parser; the transpiler only spells out, in C++, the
//! structure the parser built. Translating the same AST twice produces byte-identical output.
//!
//! Binary operations and unary negations are always emitted inside their own parentheses, so the
//! source's evaluation order survives the translation regardless of how C++ would rank the
//! operators.
//!
//! # Examples
//!
//! ```
//! use waterlang::parser::lexing::Scanner;
//! use waterlang::parser::parsing::Parser;
//! use waterlang::transpiler::transpile_cpp::Transpiler;
//!
//! let scanner = Scanner::new("func main() -> int is return 1 + 2 * 3; func", "main.wl");
//! let ast = Parser::new(scanner.tokens, true).parse().unwrap();
//! let cpp = Transpiler::new(ast).transpile_cpp();
//! assert_eq!(cpp, "int main()\nreturn (1+(2*3));\n\n");
//! ```
use crate::parser::ast::{Expr, FuncDecl, Stmt, Variable};
use crate::parser::token::TokenType;


/// The core of the transpiler module: holds the AST to be translated into C++.
pub struct Transpiler {
    ast: Vec<FuncDecl>
}


impl Transpiler {
    pub fn new(ast: Vec<FuncDecl>) -> Self {
        Transpiler { ast }
    }


    /// Emits the C++ translation of the whole program into a single in-memory buffer, ready to
    /// be written to a file and handed to a C++ compiler.
    pub fn transpile_cpp(&self) -> String {
        let mut out = String::new();
        for decl in &self.ast {
            out += &self.func_decl(decl);
        }

        out
    }


    /// Emits a function: its C++ return type and name on one line, then the body statement,
    /// then a blank separator line.
    fn func_decl(&self, decl: &FuncDecl) -> String {
        format!(
            "{} {}()\n{}\n\n",
            decl.return_type.as_cpp_str(),
            decl.name,
            self.stmt(&decl.body, 0)
        )
    }


    /// Emits a statement at the given nesting level, indented by two spaces per level. Blocks
    /// emit braces with one statement per line and their contents one level deeper.
    fn stmt(&self, stmt: &Stmt, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        match stmt {
            Stmt::Block(statements) => {
                let mut out = pad.clone() + "{\n";
                for statement in statements {
                    out += &self.stmt(statement, indent + 1);
                    out += "\n";
                }

                out + &pad + "}"
            }

            Stmt::Return(expr) => format!("{}return {};", pad, self.expr(expr)),

            Stmt::VarDecl(variable, Some(init)) =>
                format!("{}{} = {};", pad, self.declarator(variable), self.expr(init)),
            Stmt::VarDecl(variable, None) =>
                format!("{}{};", pad, self.declarator(variable)),

            Stmt::Reassign(variable, expr) =>
                format!("{}{} = {};", pad, variable.name, self.expr(expr))
        }
    }


    fn declarator(&self, variable: &Variable) -> String {
        if variable.is_const {
            format!("const {} {}", variable.v_type.as_cpp_str(), variable.name)
        } else {
            format!("{} {}", variable.v_type.as_cpp_str(), variable.name)
        }
    }


    /// Emits an expression, recursing left-to-right. Binary operations and unary negations are
    /// parenthesized unconditionally.
    ///
    /// # Panics
    ///
    /// Panics if a binary node's operator token is not an operator. The parser only builds
    /// binary nodes from operator tokens, so tripping this means the parser and transpiler have
    /// drifted out of sync; it is a defect in the compiler, not in the program being compiled.
    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(n, _) => n.to_string(),
            Expr::Variable(variable) => variable.name.clone(),
            Expr::Grouping(inner) => format!("({})", self.expr(inner)),

            Expr::Unary(negated, operand) => {
                if *negated {
                    format!("(-{})", self.expr(operand))
                } else {
                    self.expr(operand)
                }
            }

            Expr::Binary(left, op_token, right) => {
                let op = match &op_token.token_type {
                    TokenType::Operator(op) => op.as_cpp_str(),
                    other => panic!(
                        "transpiler out of sync with parser: binary node carries {:?} instead of an operator",
                        other
                    )
                };

                format!("({}{}{})", self.expr(left), op, self.expr(right))
            }
        }
    }
}
