//! The driver binary for the Waterlang compiler.
//!
//! Everything outside the lex/parse/translate core lives here: argument handling, file IO, and
//! the hand-off of the generated C++ to `g++`.
use std::env;
use std::fs;
use std::process::{exit, Command};

use waterlang::parser::lexing::Scanner;
use waterlang::parser::parsing::Parser;
use waterlang::transpiler::transpile_cpp::Transpiler;


fn main() {
    let cmd_args: Vec<String> = env::args().collect();
    let (input_filename, output_filename) = match (cmd_args.get(1), cmd_args.get(2)) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            eprintln!("Error: no input and output file provided");
            eprintln!("Usage: waterlang <input file> <output file>");
            exit(1);
        }
    };

    let source = match fs::read_to_string(input_filename) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("ERROR: could not read {}: {}", input_filename, e);
            exit(1);
        }
    };

    println!("Compiling {}...", input_filename);
    let scanner = Scanner::new(&source, input_filename);
    let report = scanner.report();
    if !report.success {
        // every lexical error is reported, not just the first
        for token in &report.tokens {
            eprintln!("ERROR: {}", token);
        }
        exit(1);
    }

    let mut parser = Parser::new(report.tokens, true);
    let ast = match parser.parse() {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    };

    let cpp = Transpiler::new(ast).transpile_cpp();
    let intermediate_filename = format!("{}.cpp", output_filename);
    if let Err(e) = fs::write(&intermediate_filename, cpp) {
        eprintln!("ERROR: could not write {}: {}", intermediate_filename, e);
        exit(1);
    }

    let status = Command::new("g++")
        .args([intermediate_filename.as_str(), "-o", output_filename.as_str(), "-g"])
        .status();
    match status {
        Ok(status) if status.success() => (),
        Ok(status) => {
            eprintln!("ERROR: g++ exited with {}", status);
            exit(1);
        }
        Err(e) => {
            eprintln!("ERROR: could not run g++: {}", e);
            exit(1);
        }
    }
}
