//! Token types for Clausewitz script.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types for Clausewitz script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `=`, `>`, `<`, `>=`, `<=`, `!=`, `==` or `?=`.
    Operator(String),
    /// A bare word or quoted string. Quotes are kept.
    Text(String),
    /// A comment, without its marker.
    Comment(String),
    /// End of input.
    Eof,
    /// Illegal input with a description.
    Error(String),
}

impl TokenKind {
    /// Returns a human-readable name for error messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::Operator(op) => format!("operator '{op}'"),
            Self::Text(text) => format!("'{text}'"),
            Self::Comment(_) => "comment".to_string(),
            Self::Eof => "end of input".to_string(),
            Self::Error(_) => "invalid input".to_string(),
        }
    }

    /// Returns true for tokens the parser skips.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}
