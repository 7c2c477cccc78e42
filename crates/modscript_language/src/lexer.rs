//! Lexer for Clausewitz script.
//!
//! The lexer converts source text into a stream of tokens. It does not
//! interpret keys or values: everything that is not a brace, an operator,
//! or a comment is a [`TokenKind::Text`].
//!
//! Two quirks of the format are handled here:
//! - Double-quoted segments are kept verbatim (quotes included) and may
//!   contain whitespace, braces, and operators.
//! - Inside square brackets (`@[ a + b ]`, `[[param] ... ]`) whitespace and
//!   operators do not split a word. Brackets toggle a flag; they do not nest.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// The default comment marker for `.txt`-style scripts.
pub const DEFAULT_COMMENT_MARKER: &str = "#";

/// Lexer for Clausewitz script.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Marker that starts a line comment.
    comment: &'src str,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer using `#` comments.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_comment_marker(source, DEFAULT_COMMENT_MARKER)
    }

    /// Creates a new lexer with a custom comment marker (`--` for Lua,
    /// `//` for shaders).
    #[must_use]
    pub fn with_comment_marker(source: &'src str, comment: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
            comment,
        }
    }

    /// Returns the source being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = if self.at_comment() {
            self.scan_comment()
        } else {
            match c {
                '{' => {
                    self.advance();
                    TokenKind::LBrace
                }
                '}' => {
                    self.advance();
                    TokenKind::RBrace
                }
                c if self.at_operator(c) => self.scan_operator(),
                c if c.is_control() => {
                    self.advance();
                    TokenKind::Error(format!("unexpected control character U+{:04X}", c as u32))
                }
                _ => self.scan_text(),
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        Self::tokenize_with_comment_marker(source, DEFAULT_COMMENT_MARKER)
    }

    /// Tokenizes all source using a custom comment marker.
    #[must_use]
    pub fn tokenize_with_comment_marker(source: &str, comment: &str) -> Vec<Token> {
        let mut lexer = Lexer::with_comment_marker(source, comment);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace and a byte order mark.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || c == '\u{feff}' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn at_comment(&self) -> bool {
        !self.comment.is_empty() && self.rest.starts_with(self.comment)
    }

    fn at_operator(&self, c: char) -> bool {
        is_operator_char(c) || (c == '?' && self.peek_char_n(1) == Some('='))
    }

    /// Scans a comment up to the end of the line.
    fn scan_comment(&mut self) -> TokenKind {
        for _ in self.comment.chars() {
            self.advance();
        }
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Comment(text.trim_end().to_string())
    }

    /// Scans a maximal run of operator characters.
    fn scan_operator(&mut self) -> TokenKind {
        let mut op = String::new();
        while let Some(c) = self.peek_char() {
            if !self.at_operator(c) {
                break;
            }
            op.push(c);
            self.advance();
        }
        TokenKind::Operator(op)
    }

    /// Scans a word, including any quoted segments and bracketed sections.
    fn scan_text(&mut self) -> TokenKind {
        let mut text = String::new();
        let mut in_brackets = false;

        while let Some(c) = self.peek_char() {
            match c {
                '"' => {
                    if let Err(message) = self.scan_quoted(&mut text) {
                        return TokenKind::Error(message);
                    }
                }
                '{' | '}' | '\n' | '\r' => break,
                '[' => {
                    in_brackets = true;
                    text.push(c);
                    self.advance();
                }
                ']' => {
                    in_brackets = false;
                    text.push(c);
                    self.advance();
                }
                c if !in_brackets
                    && (c.is_whitespace() || self.at_operator(c) || self.at_comment()) =>
                {
                    break;
                }
                c if c.is_control() && !c.is_whitespace() => break,
                c => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        TokenKind::Text(text)
    }

    /// Scans a double-quoted segment into `text`, quotes included.
    ///
    /// Backslash escapes are kept literally.
    fn scan_quoted(&mut self, text: &mut String) -> Result<(), String> {
        let (line, column) = (self.line, self.column);
        text.push('"');
        self.advance();

        while let Some(c) = self.peek_char() {
            match c {
                '"' => {
                    text.push(c);
                    self.advance();
                    return Ok(());
                }
                '\\' => {
                    text.push(c);
                    self.advance();
                    if let Some(escaped) = self.peek_char() {
                        text.push(escaped);
                        self.advance();
                    }
                }
                c => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        Err(format!(
            "unterminated string starting at line {line}, column {column}"
        ))
    }
}

/// Returns true for characters that form comparison and assignment operators.
#[must_use]
pub const fn is_operator_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!')
}
