//! Code formatter for script elements.
//!
//! Formatting is the canonical text form of an element: definition code and
//! definition hashes are computed from it, so the output must be stable.
//!
//! - Leaves render as `key op value`, `key value`, or `key`.
//! - A block with an operator whose only child is an inline value block
//!   without an operator renders on the key's line: `color = hsv {`.
//! - Other blocks render as `key op {`, one child per line indented by one
//!   level, then `}` at the block's indentation.
//!
//! # Example
//!
//! ```
//! use modscript_language::{parse, pretty::format_code};
//!
//! let elements = parse("a={b=1}").unwrap();
//! assert_eq!(format_code(&elements[0], 0), "a = {\n    b = 1\n}");
//! ```

use crate::ast::{ScriptElement, is_inline_operator};

/// Configuration for formatting.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Indentation level of the element itself.
    pub indent_level: usize,
    /// Number of spaces for each indentation level.
    pub indent_width: usize,
    /// Omit `@variable` leaves nested inside blocks.
    pub skip_variables: bool,
    /// Wrap the element in `parent_key = { ... }`.
    pub parent_key: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_level: 0,
            indent_width: 4,
            skip_variables: false,
            parent_key: None,
        }
    }
}

impl FormatConfig {
    /// Sets the indentation level.
    #[must_use]
    pub const fn with_indent_level(mut self, indent_level: usize) -> Self {
        self.indent_level = indent_level;
        self
    }

    /// Omits nested `@variable` leaves.
    #[must_use]
    pub const fn with_skip_variables(mut self, skip: bool) -> Self {
        self.skip_variables = skip;
        self
    }

    /// Wraps the output in a parent block.
    #[must_use]
    pub fn with_parent_key(mut self, key: impl Into<String>) -> Self {
        self.parent_key = Some(key.into());
        self
    }
}

/// Formats an element at the given indentation level.
#[must_use]
pub fn format_code(element: &ScriptElement, indent_level: usize) -> String {
    format_code_with_config(
        element,
        &FormatConfig::default().with_indent_level(indent_level),
    )
}

/// Formats an element with custom configuration.
#[must_use]
pub fn format_code_with_config(element: &ScriptElement, config: &FormatConfig) -> String {
    let mut formatter = CodeFormatter::new(config);
    match &config.parent_key {
        Some(parent) => {
            formatter.pad(config.indent_level);
            formatter.output.push_str(parent);
            formatter.output.push_str(" = {\n");
            formatter.write_element(element, config.indent_level + 1, false);
            formatter.output.push('\n');
            formatter.pad(config.indent_level);
            formatter.output.push('}');
        }
        None => formatter.write_element(element, config.indent_level, false),
    }
    formatter.output
}

/// Formats several elements, one per line.
#[must_use]
pub fn format_all(elements: &[ScriptElement]) -> String {
    elements
        .iter()
        .map(|element| format_code(element, 0))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the child rendered on its parent's line, if any.
///
/// Only `key op hsv { ... }` reads back as the same tree, so the parent needs
/// an operator and exactly one child: an operator-less inline value block.
fn inline_child<'e>(
    operator: Option<&str>,
    children: &[&'e ScriptElement],
) -> Option<&'e ScriptElement> {
    let [child] = children else {
        return None;
    };
    let inline = operator.is_some()
        && child.operator().is_none()
        && !child.is_simple_type()
        && is_inline_operator(child.key());
    inline.then_some(*child)
}

struct CodeFormatter<'a> {
    config: &'a FormatConfig,
    output: String,
}

impl<'a> CodeFormatter<'a> {
    fn new(config: &'a FormatConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    fn pad(&mut self, indent: usize) {
        for _ in 0..indent * self.config.indent_width {
            self.output.push(' ');
        }
    }

    /// Writes an element. `inline` elements continue the current line.
    fn write_element(&mut self, element: &ScriptElement, indent: usize, inline: bool) {
        match element {
            ScriptElement::Leaf {
                key,
                operator,
                value,
            } => {
                if !inline {
                    self.pad(indent);
                }
                self.output.push_str(key);
                let value = value.as_deref().filter(|v| !v.trim().is_empty());
                if let Some(value) = value {
                    if let Some(op) = operator.as_deref().filter(|op| !op.trim().is_empty()) {
                        self.output.push(' ');
                        self.output.push_str(op);
                    }
                    self.output.push(' ');
                    self.output.push_str(value);
                }
            }
            ScriptElement::Block {
                key,
                operator,
                children,
            } => {
                let children: Vec<&ScriptElement> = children
                    .iter()
                    .filter(|child| !(self.config.skip_variables && child.is_variable()))
                    .collect();

                if !inline {
                    self.pad(indent);
                }
                self.output.push_str(key);
                if let Some(op) = operator {
                    self.output.push(' ');
                    self.output.push_str(op);
                }

                if let Some(child) = inline_child(operator.as_deref(), &children) {
                    self.output.push(' ');
                    self.write_element(child, indent, true);
                    return;
                }

                if !key.is_empty() || operator.is_some() {
                    self.output.push(' ');
                }
                self.output.push_str("{\n");
                for child in children {
                    self.write_element(child, indent + 1, false);
                    self.output.push('\n');
                }
                self.pad(indent);
                self.output.push('}');
            }
        }
    }
}
