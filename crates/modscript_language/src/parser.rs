//! Parser for Clausewitz script.
//!
//! The parser converts a stream of tokens into a [`ScriptElement`] tree.
//!
//! In strict mode any structural fault is an error. In tolerant mode the
//! parser recovers: stray operators and closing braces are skipped, an
//! operator without a value yields a leaf with no value, and blocks left
//! open at end of input are closed.

use modscript_foundation::{Error, ErrorKind, Result};

use crate::ast::{ScriptElement, is_inline_operator};
use crate::lexer::{DEFAULT_COMMENT_MARKER, Lexer};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Maximum block nesting depth.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser for Clausewitz script.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source text (for error messages).
    source: &'src str,
    /// Whether to recover from structural faults.
    tolerant: bool,
    /// Current block nesting depth.
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Creates a strict parser using `#` comments.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, DEFAULT_COMMENT_MARKER, false)
    }

    /// Creates a parser with a custom comment marker and recovery mode.
    #[must_use]
    pub fn with_options(source: &'src str, comment: &'src str, tolerant: bool) -> Self {
        let mut lexer = Lexer::with_comment_marker(source, comment);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
            tolerant,
            depth: 0,
        }
    }

    /// Parses all elements from the source.
    ///
    /// # Errors
    /// Returns a [`ErrorKind::ParseError`] if the source cannot be parsed.
    pub fn parse_all(&mut self) -> Result<Vec<ScriptElement>> {
        self.parse_elements(None)
    }

    /// Parses elements until end of input, or until the closing brace of
    /// the block opened at `open`.
    fn parse_elements(&mut self, open: Option<Span>) -> Result<Vec<ScriptElement>> {
        let mut elements = Vec::new();

        loop {
            self.skip_trivia();
            match &self.current.kind {
                TokenKind::Eof => {
                    match open {
                        Some(open) if !self.tolerant => {
                            return Err(self.error_at(open, "block is never closed"));
                        }
                        _ => break,
                    }
                }
                TokenKind::RBrace => {
                    if open.is_some() {
                        break;
                    }
                    if !self.tolerant {
                        return Err(self.error("unexpected '}'"));
                    }
                    self.advance();
                }
                TokenKind::LBrace => {
                    let children = self.parse_body()?;
                    elements.push(ScriptElement::Block {
                        key: String::new(),
                        operator: None,
                        children,
                    });
                }
                TokenKind::Operator(op) => {
                    if !self.tolerant {
                        return Err(self.error(&format!("unexpected operator '{op}'")));
                    }
                    self.advance();
                }
                TokenKind::Error(msg) => {
                    if !self.tolerant {
                        return Err(self.error(&msg.clone()));
                    }
                    self.advance();
                }
                TokenKind::Text(key) => {
                    let key = key.clone();
                    elements.push(self.parse_keyed(key)?);
                }
                TokenKind::Comment(_) => self.advance(),
            }
        }

        Ok(elements)
    }

    /// Parses a braced body. The current token must be `{`.
    fn parse_body(&mut self) -> Result<Vec<ScriptElement>> {
        let open = self.current.span;
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_at(open, "blocks are nested too deeply"));
        }
        self.expect(&TokenKind::LBrace)?;

        self.depth += 1;
        let children = self.parse_elements(Some(open));
        self.depth -= 1;
        let children = children?;

        if self.current.kind == TokenKind::RBrace {
            self.advance();
        }
        Ok(children)
    }

    /// Parses an element that starts with a key.
    fn parse_keyed(&mut self, key: String) -> Result<ScriptElement> {
        self.advance();
        self.skip_trivia();

        match &self.current.kind {
            TokenKind::LBrace => {
                let children = self.parse_body()?;
                Ok(ScriptElement::Block {
                    key,
                    operator: None,
                    children,
                })
            }
            TokenKind::Operator(op) => {
                let operator = op.clone();
                let op_span = self.current.span;
                self.advance();
                self.skip_trivia();
                self.parse_operand(key, operator, op_span)
            }
            _ => Ok(ScriptElement::Leaf {
                key,
                operator: None,
                value: None,
            }),
        }
    }

    /// Parses what follows `key op`.
    fn parse_operand(&mut self, key: String, operator: String, op_span: Span) -> Result<ScriptElement> {
        match &self.current.kind {
            TokenKind::LBrace => {
                let children = self.parse_body()?;
                Ok(ScriptElement::Block {
                    key,
                    operator: Some(operator),
                    children,
                })
            }
            TokenKind::Text(value) => {
                let value = value.clone();
                self.advance();
                self.skip_trivia();
                if is_inline_operator(&value) && self.current.kind == TokenKind::LBrace {
                    let children = self.parse_body()?;
                    return Ok(ScriptElement::Block {
                        key,
                        operator: Some(operator),
                        children: vec![ScriptElement::Block {
                            key: value,
                            operator: None,
                            children,
                        }],
                    });
                }
                Ok(ScriptElement::Leaf {
                    key,
                    operator: Some(operator),
                    value: Some(value),
                })
            }
            _ if self.tolerant => Ok(ScriptElement::Leaf {
                key,
                operator: Some(operator),
                value: None,
            }),
            TokenKind::Error(msg) => Err(self.error(&msg.clone())),
            _ => Err(self.error_at(
                op_span,
                &format!(
                    "expected a value after '{operator}', found {}",
                    self.current.kind.name()
                ),
            )),
        }
    }

    /// Skips comments.
    fn skip_trivia(&mut self) {
        while self.current.kind.is_trivia() {
            self.advance();
        }
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Expects a specific token kind and advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        let matches =
            std::mem::discriminant(&self.current.kind) == std::mem::discriminant(expected);

        if matches {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.current.kind.name()
            )))
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::new(ErrorKind::ParseError {
            message: message.to_string(),
            line: span.line,
            column: span.column,
            context: span.line_text(self.source).to_string(),
        })
    }
}

/// Parses source strictly using `#` comments.
///
/// # Errors
/// Returns an error if the source cannot be parsed.
pub fn parse(source: &str) -> Result<Vec<ScriptElement>> {
    Parser::new(source).parse_all()
}

/// Parses source, recovering from structural faults.
///
/// # Errors
/// Returns an error only for blocks nested deeper than [`MAX_NESTING_DEPTH`].
pub fn parse_tolerant(source: &str) -> Result<Vec<ScriptElement>> {
    Parser::with_options(source, DEFAULT_COMMENT_MARKER, true).parse_all()
}
