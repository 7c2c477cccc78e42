//! Inputs to parser selection and parsing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use modscript_foundation::{ErrorContext, path};

/// The game a file belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameType {
    /// Stellaris.
    Stellaris,
    /// Hearts of Iron IV.
    Hoi4,
    /// Any other Clausewitz game. Only generic and default parsers apply.
    #[default]
    Other,
}

/// How much structural checking a file gets before its tree is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidationType {
    /// Strict check, falling back to simple mode when the file asks for it.
    #[default]
    Full,
    /// Brace balance only, with the tolerant tree builder.
    SimpleOnly,
    /// No validity check at all.
    SkipAll,
}

/// Arguments to [`crate::DefinitionParser::can_parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CanParseArgs {
    /// Logical path relative to the game or mod root.
    pub file: String,
    /// The game being parsed.
    pub game: GameType,
    /// Root folder of the mod or game, when known.
    pub root_folder: Option<String>,
    /// Decoded lines, for parsers that claim files by content.
    pub lines: Vec<String>,
}

impl CanParseArgs {
    /// Creates arguments for a file of a game.
    #[must_use]
    pub fn new(file: impl Into<String>, game: GameType) -> Self {
        Self {
            file: path::normalize(&file.into()),
            game,
            root_folder: None,
            lines: Vec::new(),
        }
    }

    /// Sets the file content.
    #[must_use]
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the root folder.
    #[must_use]
    pub fn with_root_folder(mut self, root_folder: impl Into<String>) -> Self {
        self.root_folder = Some(root_folder.into());
        self
    }

    /// Returns the lowercase extension including the dot.
    #[must_use]
    pub fn extension(&self) -> String {
        path::extension(&self.file)
    }

    /// Returns the directory part of the file.
    #[must_use]
    pub fn directory(&self) -> String {
        path::parent_directory(&self.file)
    }

    /// Returns true for Stellaris files.
    #[must_use]
    pub fn is_stellaris(&self) -> bool {
        self.game == GameType::Stellaris
    }

    /// Returns true for Hearts of Iron IV files.
    #[must_use]
    pub fn is_hoi4(&self) -> bool {
        self.game == GameType::Hoi4
    }
}

/// Arguments to [`crate::DefinitionParser::parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserArgs {
    /// Decoded lines of the file.
    pub lines: Vec<String>,
    /// Logical path relative to the game or mod root.
    pub file: String,
    /// Name of the owning mod.
    pub mod_name: String,
    /// Declared dependencies of the owning mod.
    pub dependencies: Vec<String>,
    /// Hash of the raw file content.
    pub content_sha: String,
    /// Validation mode.
    pub validation_type: ValidationType,
    /// The file belongs to the base game.
    pub is_from_game: bool,
}

impl ParserArgs {
    /// Creates arguments for a file with the given lines.
    #[must_use]
    pub fn new<I, S>(file: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            file: path::normalize(&file.into()),
            ..Self::default()
        }
    }

    /// Splits a whole text into lines.
    #[must_use]
    pub fn from_text(file: impl Into<String>, text: &str) -> Self {
        Self::new(file, text.lines())
    }

    /// Sets the mod name.
    #[must_use]
    pub fn with_mod(mut self, mod_name: impl Into<String>) -> Self {
        self.mod_name = mod_name.into();
        self
    }

    /// Sets the mod dependencies.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Sets the content hash.
    #[must_use]
    pub fn with_content_sha(mut self, sha: impl Into<String>) -> Self {
        self.content_sha = sha.into();
        self
    }

    /// Sets the validation mode.
    #[must_use]
    pub const fn with_validation(mut self, validation_type: ValidationType) -> Self {
        self.validation_type = validation_type;
        self
    }

    /// Marks the file as base game content.
    #[must_use]
    pub const fn from_game(mut self, is_from_game: bool) -> Self {
        self.is_from_game = is_from_game;
        self
    }

    /// Returns the lowercase extension including the dot.
    #[must_use]
    pub fn extension(&self) -> String {
        path::extension(&self.file)
    }

    /// Returns the directory part of the file.
    #[must_use]
    pub fn directory(&self) -> String {
        path::parent_directory(&self.file)
    }

    /// Returns the last path segment.
    #[must_use]
    pub fn file_name(&self) -> String {
        path::file_name(&self.file)
    }

    /// Returns the error context naming this file and its mod.
    #[must_use]
    pub fn error_context(&self) -> ErrorContext {
        ErrorContext::new(self.file.clone()).with_mod(self.mod_name.clone())
    }
}

/// Arguments to [`crate::ParserManager::parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserManagerArgs {
    /// The file and its content.
    pub parser_args: ParserArgs,
    /// The game being parsed.
    pub game: GameType,
    /// Root folder of the mod or game, when known.
    pub root_folder: Option<String>,
}

impl ParserManagerArgs {
    /// Creates manager arguments.
    #[must_use]
    pub const fn new(parser_args: ParserArgs, game: GameType) -> Self {
        Self {
            parser_args,
            game,
            root_folder: None,
        }
    }

    /// Sets the root folder.
    #[must_use]
    pub fn with_root_folder(mut self, root_folder: impl Into<String>) -> Self {
        self.root_folder = Some(root_folder.into());
        self
    }

    /// Returns the selection arguments for this file.
    #[must_use]
    pub fn can_parse_args(&self) -> CanParseArgs {
        CanParseArgs {
            file: self.parser_args.file.clone(),
            game: self.game,
            root_folder: self.root_folder.clone(),
            lines: self.parser_args.lines.clone(),
        }
    }
}
