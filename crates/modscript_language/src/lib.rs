//! Clausewitz script tokenizer, parser, validation, and formatting.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenizes script text, honoring quotes, brackets and comments
//! - [`Parser`] - Builds a [`ScriptElement`] tree, strictly or tolerantly
//! - [`validate`] - Pre-parse validity and line length checks
//! - [`pretty`] - Canonical code formatting
//! - [`CodeParser`] - The per-file facade, configured by [`ScriptConfig`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod code_parser;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;
pub mod validate;

pub use ast::{INLINE_OPERATORS, ScriptElement, is_inline_operator, unquote};
pub use code_parser::{CodeParser, ParseResult};
pub use config::{CommentStyle, FALLBACK_TO_SIMPLE_COMMENT, ScriptConfig};
pub use lexer::Lexer;
pub use parser::{Parser, parse, parse_tolerant};
pub use pretty::{FormatConfig, format_all, format_code, format_code_with_config};
pub use span::Span;
pub use token::{Token, TokenKind};
