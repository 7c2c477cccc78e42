//! Script tree produced by the parser.
//!
//! A Clausewitz script is a sequence of elements. An element is either a
//! leaf (`key`, `key = value`) or a block (`key = { ... }`, `key { ... }`,
//! or an anonymous `{ ... }` with an empty key).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keywords that introduce an inline value block, as in `color = hsv { 1 2 3 }`.
pub const INLINE_OPERATORS: [&str; 2] = ["hsv", "rgb"];

/// Returns true if `key` introduces an inline value block.
#[must_use]
pub fn is_inline_operator(key: &str) -> bool {
    INLINE_OPERATORS
        .iter()
        .any(|op| op.eq_ignore_ascii_case(key))
}

/// A parsed script element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScriptElement {
    /// A key with an optional operator and value.
    Leaf {
        /// The key, quotes preserved.
        key: String,
        /// The operator, if any.
        operator: Option<String>,
        /// The value, quotes preserved.
        value: Option<String>,
    },
    /// A key with a braced body.
    Block {
        /// The key. Empty for anonymous blocks.
        key: String,
        /// The operator, if any.
        operator: Option<String>,
        /// Nested elements, in source order.
        children: Vec<ScriptElement>,
    },
}

impl ScriptElement {
    /// Creates a leaf element.
    #[must_use]
    pub fn leaf(key: impl Into<String>, operator: Option<&str>, value: Option<&str>) -> Self {
        Self::Leaf {
            key: key.into(),
            operator: operator.map(str::to_string),
            value: value.map(str::to_string),
        }
    }

    /// Creates a `key = value` leaf.
    #[must_use]
    pub fn assign(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Leaf {
            key: key.into(),
            operator: Some("=".to_string()),
            value: Some(value.into()),
        }
    }

    /// Creates a block element.
    #[must_use]
    pub fn block(key: impl Into<String>, operator: Option<&str>, children: Vec<Self>) -> Self {
        Self::Block {
            key: key.into(),
            operator: operator.map(str::to_string),
            children,
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Leaf { key, .. } | Self::Block { key, .. } => key,
        }
    }

    /// Returns the operator, if any.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        match self {
            Self::Leaf { operator, .. } | Self::Block { operator, .. } => operator.as_deref(),
        }
    }

    /// Returns the value of a leaf.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Leaf { value, .. } => value.as_deref(),
            Self::Block { .. } => None,
        }
    }

    /// Returns the value with surrounding quotes removed.
    #[must_use]
    pub fn unquoted_value(&self) -> Option<&str> {
        self.value().map(unquote)
    }

    /// Returns the children of a block, or an empty slice for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Block { children, .. } => children,
        }
    }

    /// Returns true for leaves.
    #[must_use]
    pub const fn is_simple_type(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Returns true for a leaf whose key starts with `@`.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.is_simple_type() && self.key().starts_with('@')
    }

    /// Returns true for a block with an empty key.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        !self.is_simple_type() && self.key().is_empty()
    }

    /// Finds the first direct child with the given key, ignoring case.
    #[must_use]
    pub fn find_child(&self, key: &str) -> Option<&Self> {
        self.children()
            .iter()
            .find(|child| child.key().eq_ignore_ascii_case(key))
    }

    /// Finds the value of the first direct leaf child with the given key.
    #[must_use]
    pub fn child_value(&self, key: &str) -> Option<&str> {
        self.children()
            .iter()
            .filter(|child| child.is_simple_type())
            .find(|child| child.key().eq_ignore_ascii_case(key))
            .and_then(Self::unquoted_value)
    }
}

/// Removes one pair of surrounding double quotes.
#[must_use]
pub fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}
