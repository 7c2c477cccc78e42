//! The script parsing facade.
//!
//! [`CodeParser`] ties the lexer, the validity checks, the tree builder and
//! the formatter together behind the per-file operations definition parsers
//! need.

use modscript_foundation::{Error, Result, path, text};
use tracing::trace;

use crate::ast::ScriptElement;
use crate::config::{CommentStyle, ScriptConfig};
use crate::parser::Parser;
use crate::pretty::{FormatConfig, format_code_with_config};
use crate::validate;

/// Outcome of parsing one file.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Top-level elements. Empty when `error` is set.
    pub elements: Vec<ScriptElement>,
    /// The first validation or syntax fault, if any.
    pub error: Option<Error>,
    /// Whether the simple validity check and tolerant builder were used.
    pub use_simple_validation: bool,
}

impl ParseResult {
    /// Returns true if the file parsed without error.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(error: Error, use_simple_validation: bool) -> Self {
        Self {
            elements: Vec::new(),
            error: Some(error),
            use_simple_validation,
        }
    }
}

/// Parses, validates and formats Clausewitz script.
#[derive(Clone, Debug, Default)]
pub struct CodeParser {
    config: ScriptConfig,
}

impl CodeParser {
    /// Creates a code parser with the given configuration.
    #[must_use]
    pub const fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Parses a file: length check, validity check, then tree building.
    ///
    /// With `simple_check` the validity check only looks at brace balance
    /// and the tree builder recovers from grammar faults.
    #[must_use]
    pub fn parse_script(&self, lines: &[String], file: &str, simple_check: bool) -> ParseResult {
        let simple = simple_check || self.config.always_simple;

        if let Err(error) = self.verify_allowed_length(lines) {
            return ParseResult::failed(error, simple);
        }
        if let Err(error) = self.perform_validity_check(lines, file, simple) {
            trace!(file, simple, %error, "validity check failed");
            return ParseResult::failed(error, simple);
        }

        let source = lines.join("\n");
        let marker = &self.comment_style(file).marker;
        match Parser::with_options(&source, marker, simple).parse_all() {
            Ok(elements) => ParseResult {
                elements,
                error: None,
                use_simple_validation: simple,
            },
            Err(error) => {
                trace!(file, simple, %error, "tree building failed");
                ParseResult::failed(error, simple)
            }
        }
    }

    /// Parses a file with the tolerant builder and no validity check.
    #[must_use]
    pub fn parse_script_without_validation(&self, lines: &[String], file: &str) -> ParseResult {
        let source = lines.join("\n");
        let marker = &self.comment_style(file).marker;
        match Parser::with_options(&source, marker, true).parse_all() {
            Ok(elements) => ParseResult {
                elements,
                error: None,
                use_simple_validation: true,
            },
            Err(error) => ParseResult::failed(error, true),
        }
    }

    /// Checks a file's structure without building a tree.
    ///
    /// # Errors
    /// Returns a validation error with the position of the first defect.
    pub fn perform_validity_check(&self, lines: &[String], file: &str, simple_check: bool) -> Result<()> {
        let source = lines.join("\n");
        let marker = &self.comment_style(file).marker;
        if simple_check || self.config.always_simple {
            validate::check_brackets(&source, marker)
        } else {
            validate::check_structure(&source, marker)
        }
    }

    /// Rejects files with a line longer than the configured maximum.
    ///
    /// # Errors
    /// Returns a length error for the first offending line.
    pub fn verify_allowed_length(&self, lines: &[String]) -> Result<()> {
        validate::verify_allowed_length(lines, self.config.max_line_length)
    }

    /// Formats an element at the given indentation level.
    #[must_use]
    pub fn format_code(&self, element: &ScriptElement, indent_level: usize) -> String {
        crate::pretty::format_code(element, indent_level)
    }

    /// Formats an element with custom configuration.
    #[must_use]
    pub fn format_code_with_config(&self, element: &ScriptElement, config: &FormatConfig) -> String {
        format_code_with_config(element, config)
    }

    /// Collapses whitespace for hashing.
    #[must_use]
    pub fn clean_whitespace(&self, line: &str) -> String {
        text::clean_whitespace(line)
    }

    /// Strips comments and blank lines using the file's comment style.
    #[must_use]
    pub fn clean_code(&self, file: &str, lines: &[String]) -> Vec<String> {
        let marker = &self.comment_style(file).marker;
        lines
            .iter()
            .map(|line| strip_comment(line, marker).trim_end())
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Returns true for Lua files.
    #[must_use]
    pub fn is_lua(&self, file: &str) -> bool {
        path::extension(file) == ".lua"
    }

    /// Returns the comment style for a file.
    #[must_use]
    pub fn comment_style(&self, file: &str) -> &CommentStyle {
        self.config.comment_style(file)
    }

    /// Returns true if a file should use the simple validity check.
    #[must_use]
    pub fn should_use_simple_check(&self, lines: &[String]) -> bool {
        if self.config.always_simple {
            return true;
        }
        if self
            .config
            .simple_validation_threshold
            .is_some_and(|threshold| lines.len() > threshold)
        {
            return true;
        }
        self.config
            .fallback_comment
            .as_deref()
            .is_some_and(|sentinel| lines.iter().any(|line| line.trim() == sentinel))
    }
}

/// Cuts a line at the first comment marker outside quotes.
fn strip_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return line;
    }
    let mut in_quote = false;
    for (index, c) in line.char_indices() {
        if c == '"' {
            in_quote = !in_quote;
        } else if !in_quote && line[index..].starts_with(marker) {
            return &line[..index];
        }
    }
    line
}
