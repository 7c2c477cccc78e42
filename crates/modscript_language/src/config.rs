//! Configuration for script parsing.

use modscript_foundation::path;

/// Marker line that forces the simple validity check for a file.
pub const FALLBACK_TO_SIMPLE_COMMENT: &str = "# Dear Irony please fallback to simple parser";

/// Comment conventions for a file type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentStyle {
    /// Marker that starts a line comment.
    pub marker: String,
    /// Comment written into files that only exist to blank out another mod's file.
    pub empty_overwrite_comment: String,
}

impl CommentStyle {
    /// Creates a comment style with the standard empty-overwrite text.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let empty_overwrite_comment =
            format!("{marker} This mod contains empty code. Possibly to overwrite other mods.");
        Self {
            marker,
            empty_overwrite_comment,
        }
    }

    /// `#` comments used by `.txt`, `.gui`, `.gfx` and most script files.
    #[must_use]
    pub fn script() -> Self {
        Self::new("#")
    }

    /// `--` comments used by Lua files.
    #[must_use]
    pub fn lua() -> Self {
        Self::new("--")
    }

    /// `//` comments used by shader files.
    #[must_use]
    pub fn shader() -> Self {
        Self::new("//")
    }
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self::script()
    }
}

/// Configuration for [`CodeParser`](crate::CodeParser).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Files with more lines than this use the simple validity check.
    /// `None` disables the size rule.
    pub simple_validation_threshold: Option<usize>,
    /// A line equal to this comment forces the simple validity check.
    pub fallback_comment: Option<String>,
    /// Always use the simple validity check.
    pub always_simple: bool,
    /// Maximum characters allowed on a single line.
    pub max_line_length: usize,
    /// Comment style by lowercase extension, including the dot.
    pub comment_styles: Vec<(String, CommentStyle)>,
    /// Comment style for extensions not in the table.
    pub default_comment_style: CommentStyle,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            simple_validation_threshold: Some(25_000),
            fallback_comment: Some(FALLBACK_TO_SIMPLE_COMMENT.to_string()),
            always_simple: false,
            max_line_length: 50_000,
            comment_styles: vec![
                (".lua".to_string(), CommentStyle::lua()),
                (".shader".to_string(), CommentStyle::shader()),
                (".fxh".to_string(), CommentStyle::shader()),
            ],
            default_comment_style: CommentStyle::script(),
        }
    }
}

impl ScriptConfig {
    /// Creates a configuration that never switches to the simple check on its own.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            simple_validation_threshold: None,
            fallback_comment: None,
            ..Self::default()
        }
    }

    /// Creates a configuration that always uses the simple check.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            always_simple: true,
            ..Self::default()
        }
    }

    /// Builder method to set the simple-validation threshold.
    #[must_use]
    pub fn with_simple_validation_threshold(mut self, threshold: Option<usize>) -> Self {
        self.simple_validation_threshold = threshold;
        self
    }

    /// Builder method to set the fallback comment.
    #[must_use]
    pub fn with_fallback_comment(mut self, comment: Option<String>) -> Self {
        self.fallback_comment = comment;
        self
    }

    /// Builder method to set the maximum line length.
    #[must_use]
    pub fn with_max_line_length(mut self, length: usize) -> Self {
        self.max_line_length = length;
        self
    }

    /// Builder method to register a comment style for an extension.
    #[must_use]
    pub fn with_comment_style(mut self, extension: &str, style: CommentStyle) -> Self {
        let extension = extension.to_lowercase();
        self.comment_styles.retain(|(ext, _)| *ext != extension);
        self.comment_styles.push((extension, style));
        self
    }

    /// Returns the comment style for a file.
    #[must_use]
    pub fn comment_style(&self, file: &str) -> &CommentStyle {
        let extension = path::extension(file);
        self.comment_styles
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map_or(&self.default_comment_style, |(_, style)| style)
    }
}
