//! Validity checks run before a script tree is built.
//!
//! The strict check runs the full lexer and tracks brace balance, so it
//! catches unterminated quotes and illegal characters too. The simple check
//! is a character scan for brace balance only; it is used for very large
//! files and files that opt out of strict checking.

use modscript_foundation::{Error, Result};

use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::TokenKind;

/// Rejects lines longer than `limit` characters.
///
/// # Errors
/// Returns [`ErrorKind::LengthExceeded`](modscript_foundation::ErrorKind::LengthExceeded)
/// for the first offending line.
pub fn verify_allowed_length<S: AsRef<str>>(lines: &[S], limit: usize) -> Result<()> {
    for (index, line) in lines.iter().enumerate() {
        let length = line.as_ref().chars().count();
        if length > limit {
            return Err(Error::length_exceeded(line_number(index), length, limit));
        }
    }
    Ok(())
}

/// Runs the lexer over `source` and checks brace balance.
///
/// # Errors
/// Returns a validation error at the first illegal token, the first
/// unmatched `}`, or the earliest `{` left open.
pub fn check_structure(source: &str, comment: &str) -> Result<()> {
    let mut lexer = Lexer::with_comment_marker(source, comment);
    let mut open: Vec<Span> = Vec::new();

    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Error(message) => {
                return Err(validation_at(message, token.span.line, token.span.column));
            }
            TokenKind::LBrace => open.push(token.span),
            TokenKind::RBrace => {
                if open.pop().is_none() {
                    return Err(validation_at(
                        "unexpected closing bracket",
                        token.span.line,
                        token.span.column,
                    ));
                }
            }
            _ => {}
        }
    }

    match open.first() {
        Some(span) => Err(validation_at(
            "opening bracket is never closed",
            span.line,
            span.column,
        )),
        None => Ok(()),
    }
}

/// Checks brace balance, ignoring quoted text and comments.
///
/// Quotes do not carry across lines.
///
/// # Errors
/// Returns a validation error at the first unmatched `}` or the earliest
/// `{` left open.
pub fn check_brackets(source: &str, comment: &str) -> Result<()> {
    let mut open: Vec<(u32, u32)> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = line_number(index);
        let mut in_quote = false;
        let mut column: u32 = 0;
        let mut rest = line;

        while let Some(c) = rest.chars().next() {
            column += 1;
            if !in_quote && !comment.is_empty() && rest.starts_with(comment) {
                break;
            }
            match c {
                '"' => in_quote = !in_quote,
                '{' if !in_quote => open.push((line_no, column)),
                '}' if !in_quote => {
                    if open.pop().is_none() {
                        return Err(validation_at(
                            "open and close curly brackets do not match",
                            line_no,
                            column,
                        ));
                    }
                }
                _ => {}
            }
            rest = &rest[c.len_utf8()..];
        }
    }

    match open.first() {
        Some(&(line, column)) => Err(validation_at(
            "open and close curly brackets do not match",
            line,
            column,
        )),
        None => Ok(()),
    }
}

fn validation_at(message: impl Into<String>, line: u32, column: u32) -> Error {
    Error::validation(message, Some(line), Some(column))
}

fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
