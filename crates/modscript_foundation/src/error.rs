//! Error types for the Modscript system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Modscript operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The file the error was raised for, when known.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the error with its file context prefixed, when it has one.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.context {
            Some(context) => format!("{context}: {self}"),
            None => self.to_string(),
        }
    }

    /// Creates a syntax error at a known position.
    #[must_use]
    pub fn parse_error(
        message: impl Into<String>,
        line: u32,
        column: u32,
        context: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context: context.into(),
        })
    }

    /// Creates a structural validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self::new(ErrorKind::ValidationError {
            message: message.into(),
            line,
            column,
        })
    }

    /// Creates a line length error.
    #[must_use]
    pub fn length_exceeded(line: u32, length: usize, limit: usize) -> Self {
        Self::new(ErrorKind::LengthExceeded {
            line,
            length,
            limit,
        })
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Creates an error for use of a disposed store.
    #[must_use]
    pub fn store_disposed() -> Self {
        Self::new(ErrorKind::StoreDisposed)
    }

    /// Returns the 1-based line this error points at, if known.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match &self.kind {
            ErrorKind::ParseError { line, .. } | ErrorKind::LengthExceeded { line, .. } => {
                Some(*line)
            }
            ErrorKind::ValidationError { line, .. } => *line,
            _ => None,
        }
    }

    /// Returns the 1-based column this error points at, if known.
    #[must_use]
    pub fn column(&self) -> Option<u32> {
        match &self.kind {
            ErrorKind::ParseError { column, .. } => Some(*column),
            ErrorKind::ValidationError { column, .. } => *column,
            ErrorKind::LengthExceeded { limit, .. } => {
                Some(u32::try_from(*limit).map_or(u32::MAX, |l| l.saturating_add(1)))
            }
            _ => None,
        }
    }

    /// Returns the human-readable message without position information.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            ErrorKind::ParseError { message, .. } | ErrorKind::ValidationError { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// Returns true if this is a syntax fault raised while building the script tree.
    #[must_use]
    pub const fn is_syntax_fault(&self) -> bool {
        matches!(self.kind, ErrorKind::ParseError { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Syntax fault while building the script tree.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// Structural defect found by a validity check.
    #[error("validation error{}: {message}", position_suffix(.line, .column))]
    ValidationError {
        /// Description of the defect.
        message: String,
        /// Line number (1-indexed), when known.
        line: Option<u32>,
        /// Column number (1-indexed), when known.
        column: Option<u32>,
    },

    /// A line exceeds the allowed length.
    #[error("line {line} is {length} characters long, the limit is {limit}")]
    LengthExceeded {
        /// Line number (1-indexed).
        line: u32,
        /// Actual length in characters.
        length: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A batch operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The definition store was disposed and can no longer be used.
    #[error("definition store has been disposed")]
    StoreDisposed,
}

/// Formats an optional position as ` at line:column`.
fn position_suffix(line: &Option<u32>, column: &Option<u32>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at {line}:{column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

/// The file an error was raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Logical path of the file.
    pub file: String,
    /// Owning mod, when known.
    pub mod_name: Option<String>,
}

impl ErrorContext {
    /// Creates a context for a file.
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            mod_name: None,
        }
    }

    /// Sets the owning mod. An empty name is ignored.
    #[must_use]
    pub fn with_mod(mut self, mod_name: impl Into<String>) -> Self {
        let mod_name = mod_name.into();
        if !mod_name.is_empty() {
            self.mod_name = Some(mod_name);
        }
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(mod_name) = &self.mod_name {
            write!(f, " ({mod_name})")?;
        }
        Ok(())
    }
}

/// Result type alias for Modscript operations.
pub type Result<T> = std::result::Result<T, Error>;
