//! Classification types shared by definitions and the index.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The role a definition plays when mods are merged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueType {
    /// The whole file is one opaque unit.
    WholeTextFile,
    /// An `@variable` assignment.
    Variable,
    /// A variable with folder-specific merge priority.
    SpecialVariable,
    /// A `namespace`/`add_namespace` declaration.
    Namespace,
    /// A keyed script object.
    #[default]
    Object,
    /// An object where the last mod wins per object.
    OverwrittenObject,
    /// An overwritten object that must keep its original file name.
    OverwrittenObjectWithPreserveFileName,
    /// An overwritten object whose folder is merged into a single file.
    OverwrittenObjectSingleFile,
    /// Non-text content identified only by file name and hash.
    Binary,
    /// Content that failed to parse.
    Invalid,
}

impl ValueType {
    /// All value types, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::WholeTextFile,
        Self::Variable,
        Self::SpecialVariable,
        Self::Namespace,
        Self::Object,
        Self::OverwrittenObject,
        Self::OverwrittenObjectWithPreserveFileName,
        Self::OverwrittenObjectSingleFile,
        Self::Binary,
        Self::Invalid,
    ];

    /// Returns true for the plain and special variable types.
    #[must_use]
    pub const fn is_variable(self) -> bool {
        matches!(self, Self::Variable | Self::SpecialVariable)
    }

    /// Returns true for any of the overwritten object variants.
    #[must_use]
    pub const fn is_overwritten(self) -> bool {
        matches!(
            self,
            Self::OverwrittenObject
                | Self::OverwrittenObjectWithPreserveFileName
                | Self::OverwrittenObjectSingleFile
        )
    }

    /// Returns the name of this value type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WholeTextFile => "whole-text-file",
            Self::Variable => "variable",
            Self::SpecialVariable => "special-variable",
            Self::Namespace => "namespace",
            Self::Object => "object",
            Self::OverwrittenObject => "overwritten-object",
            Self::OverwrittenObjectWithPreserveFileName => "overwritten-object-preserve-file-name",
            Self::OverwrittenObjectSingleFile => "overwritten-object-single-file",
            Self::Binary => "binary",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conflict solver reset state of a definition or hierarchy node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResetType {
    /// Not reset.
    #[default]
    None,
    /// A previously resolved conflict was reset.
    Resolved,
    /// A previously ignored conflict was reset.
    Ignored,
}

impl ResetType {
    /// Returns true unless this is [`ResetType::None`].
    #[must_use]
    pub const fn is_reset(self) -> bool {
        !matches!(self, Self::None)
    }
}
