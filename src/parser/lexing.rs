//! Provides a struct `Scanner` for lexical analysis of Waterlang source text into a
//! `Vec<Token>`.
//!
//! The scanner consumes the whole input when constructed and leaves the resulting token stream in
//! its public `tokens` attribute. The stream always ends with exactly one end-of-input token, and
//! lexical errors appear in it as ordinary error tokens at the position they occurred: scanning
//! never aborts, so a single pass surfaces every lexical problem in the file. After scanning,
//! [`Scanner::report`] separates the error tokens from the stream so the driver can decide
//! whether to proceed to parsing.
//!
//! # Examples
//!
//! ```
//! use waterlang::parser::lexing::Scanner;
//!
//! let scanner = Scanner::new("func main() -> int is return 0; func", "main.wl");
//! assert!(scanner.report().success);
//! ```
use super::token::*;


/// Contains data and methods required to lexically analyse Waterlang source text, the output of
/// which is in the public `tokens` attribute.
///
/// The cursor walks the source a character at a time. The line and col attributes are the
/// 0-indexed position of the cursor in the source, used to tag each token with its
/// [`Location`]; a newline increments line and resets col to 0.
pub struct Scanner {
    pub tokens: Vec<Token>, // current stream of tokens
    chars: Vec<char>, // the source text being scanned
    file: String, // display name of the source, used in token locations
    pos: usize, // index of the cursor into chars
    line: usize,
    col: usize
}


/// The outcome of a full lex pass, as queried with [`Scanner::report`].
///
/// On success, `tokens` is the complete token stream ready for the parser. On failure, `tokens`
/// is the subset of error tokens, each of which formats as
/// `<file>:<line>:<col>: <message>`.
#[derive(Debug, Clone)]
pub struct LexReport {
    pub success: bool,
    pub tokens: Vec<Token>
}


impl Scanner {
    /// Performs lexical analysis of the given source text, tagging tokens with locations in the
    /// named file.
    ///
    /// The name is only used for diagnostics; reading the file is the caller's concern.
    pub fn new(source: &str, file: &str) -> Self {
        let mut scanner = Self {
            tokens: Vec::new(),
            chars: source.chars().collect(),
            file: file.to_owned(),
            pos: 0,
            line: 0,
            col: 0
        };

        scanner.scan_source();
        scanner
    }


    /// Separates error tokens from the stream produced by the scan.
    ///
    /// If any error tokens were produced the whole input is considered rejected and the report
    /// carries only the error tokens; otherwise it carries the full stream.
    pub fn report(&self) -> LexReport {
        let errors: Vec<Token> = self.tokens.iter()
                                            .filter(|t| t.is_error())
                                            .cloned()
                                            .collect();

        if errors.is_empty() {
            LexReport { success: true, tokens: self.tokens.clone() }
        } else {
            LexReport { success: false, tokens: errors }
        }
    }


    /// Scans the whole source, pushing tokens (including error tokens) onto `self.tokens` and
    /// terminating the stream with a single end-of-input token.
    fn scan_source(&mut self) {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.col = 0;
                }

                c if c.is_whitespace() => self.advance(1),

                // a "//" comment runs through, but does not include, the next newline
                '/' if self.peek(1) == Some('/') => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.advance(1);
                    }
                }

                '(' => self.push_token(TokenType::OpenParen, 1),
                ')' => self.push_token(TokenType::CloseParen, 1),
                ';' => self.push_token(TokenType::Semicolon, 1),
                ':' => self.push_token(TokenType::Colon, 1),
                '=' => self.push_token(TokenType::Assign, 1),
                '+' => self.push_token(TokenType::Operator(Op::Add), 1),
                '*' => self.push_token(TokenType::Operator(Op::Mul), 1),
                '/' => self.push_token(TokenType::Operator(Op::Div), 1),

                // this could be a minus or an arrow -> depending on the next character
                '-' => {
                    if self.peek(1) == Some('>') {
                        self.push_token(TokenType::Arrow, 2);
                    } else {
                        self.push_token(TokenType::Operator(Op::Sub), 1);
                    }
                }

                c if c.is_ascii_digit() => self.scan_number(),
                c if c == '_' || c.is_ascii_alphabetic() => self.scan_word(),

                // error recovery is "skip one character and continue"
                other => self.push_token(TokenType::Error(format!("unknown symbol {}", other)), 1)
            }
        }

        let eof_loc = self.here();
        self.tokens.push(Token::new(TokenType::Eof, eof_loc));
    }


    /// Returns the character at the given offset from the cursor, or `None` past end of input.
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }


    /// Advances the cursor by `n` characters within the current line.
    fn advance(&mut self, n: usize) {
        self.pos += n;
        self.col += n;
    }


    /// The location of the cursor, used as the start position of the token about to be produced.
    fn here(&self) -> Location {
        Location::new(&self.file, self.line, self.col)
    }


    /// Pushes a token of the given type starting at the cursor and spanning `width` characters,
    /// then advances past it.
    fn push_token(&mut self, token_type: TokenType, width: usize) {
        let loc = self.here();
        self.advance(width);
        self.tokens.push(Token::new(token_type, loc));
    }


    /// Scans an integer literal of one or more digits.
    ///
    /// A literal which does not fit the language's integer type becomes an error token carrying
    /// the reason, located at the first digit, and scanning continues after it.
    fn scan_number(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.peek(text.chars().count()) {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
        }

        let token_type = match text.parse::<i64>() {
            Ok(n) => TokenType::IntLiteral(n),
            Err(_) => TokenType::Error(format!("integer literal {} is out of range", text))
        };

        let width = text.chars().count();
        self.push_token(token_type, width);
    }


    /// Scans an identifier matching `[A-Za-z_][A-Za-z0-9_]*` and classifies it as a keyword if it
    /// exactly matches a reserved word.
    fn scan_word(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.peek(text.chars().count()) {
            if c != '_' && !c.is_ascii_alphanumeric() {
                break;
            }
            text.push(c);
        }

        let token_type = match Keyword::lookup(&text) {
            Some(kw) => TokenType::Keyword(kw),
            None => TokenType::Identifier(text.clone())
        };

        let width = text.chars().count();
        self.push_token(token_type, width);
    }
}


#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lex(source: &str) -> Vec<TokenType> {
        Scanner::new(source, "test.wl").tokens
                                       .into_iter()
                                       .map(|t| t.token_type)
                                       .collect()
    }

    #[test]
    fn scans_function_declaration() {
        let tokens = lex("func main() -> int is return 1 + 2 * 3; func");
        assert_eq!(tokens, vec![
            TokenType::Keyword(Keyword::Func),
            TokenType::Identifier("main".to_owned()),
            TokenType::OpenParen,
            TokenType::CloseParen,
            TokenType::Arrow,
            TokenType::Identifier("int".to_owned()),
            TokenType::Keyword(Keyword::Is),
            TokenType::Keyword(Keyword::Return),
            TokenType::IntLiteral(1),
            TokenType::Operator(Op::Add),
            TokenType::IntLiteral(2),
            TokenType::Operator(Op::Mul),
            TokenType::IntLiteral(3),
            TokenType::Semicolon,
            TokenType::Keyword(Keyword::Func),
            TokenType::Eof
        ]);
    }

    #[rstest]
    #[case("", 1)]
    #[case("   \n\t\n", 1)]
    #[case("// only a comment", 1)]
    #[case("var x: int = 5;", 8)]
    fn stream_ends_with_exactly_one_eof(#[case] source: &str, #[case] expected_len: usize) {
        let tokens = lex(source);
        assert_eq!(tokens.len(), expected_len);
        assert_eq!(tokens.last(), Some(&TokenType::Eof));
        let eofs = tokens.iter().filter(|t| **t == TokenType::Eof).count();
        assert_eq!(eofs, 1);
    }

    #[test]
    fn locations_are_zero_based_and_newline_resets_column() {
        let scanner = Scanner::new("var x\n  = 1\n", "test.wl");
        let positions: Vec<(usize, usize)> = scanner.tokens.iter()
                                                           .map(|t| (t.loc.line, t.loc.col))
                                                           .collect();

        // var@(0,0) x@(0,4) =@(1,2) 1@(1,4) eof@(2,0)
        assert_eq!(positions, vec![(0, 0), (0, 4), (1, 2), (1, 4), (2, 0)]);
    }

    #[test]
    fn arrow_is_matched_before_minus() {
        assert_eq!(lex("->"), vec![TokenType::Arrow, TokenType::Eof]);
        assert_eq!(lex("- >"), vec![
            TokenType::Operator(Op::Sub),
            TokenType::Error("unknown symbol >".to_owned()),
            TokenType::Eof
        ]);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = lex("var // x: int = $\nend");
        assert_eq!(tokens, vec![
            TokenType::Keyword(Keyword::Var),
            TokenType::Keyword(Keyword::End),
            TokenType::Eof
        ]);
    }

    #[test]
    fn unknown_symbol_becomes_error_token_and_scanning_continues() {
        let scanner = Scanner::new("var $ x", "test.wl");
        let error = scanner.tokens.iter().find(|t| t.is_error()).unwrap();

        assert_eq!(error.token_type, TokenType::Error("unknown symbol $".to_owned()));
        assert_eq!((error.loc.line, error.loc.col), (0, 4));
        assert_eq!(error.to_string(), "test.wl:1:5: unknown symbol $");

        // the identifier after the error is still scanned
        assert!(scanner.tokens.iter().any(|t| t.token_type == TokenType::Identifier("x".to_owned())));
    }

    #[test]
    fn out_of_range_literal_becomes_error_token() {
        let tokens = lex("99999999999999999999");
        assert_eq!(tokens, vec![
            TokenType::Error("integer literal 99999999999999999999 is out of range".to_owned()),
            TokenType::Eof
        ]);
    }

    #[test]
    fn report_collects_every_error_token() {
        let scanner = Scanner::new("$ var ? x", "test.wl");
        let report = scanner.report();

        assert!(!report.success);
        assert_eq!(report.tokens.len(), 2);
        assert!(report.tokens.iter().all(|t| t.is_error()));
    }

    #[test]
    fn report_passes_through_clean_stream() {
        let scanner = Scanner::new("return 5;", "test.wl");
        let report = scanner.report();

        assert!(report.success);
        assert_eq!(report.tokens, scanner.tokens);
    }
}
