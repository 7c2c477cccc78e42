//! The definition entity.
//!
//! A [`Definition`] is the atomic unit of parsed content: one object,
//! variable, namespace or whole file contributed by a mod. Two definitions
//! describe the same game object when their [`Definition::type_and_id`]
//! match, and carry identical content when their
//! [`Definition::definition_sha`] match.
//!
//! Derived fields are computed eagerly by the setters that own them:
//! - `set_type`/`set_id` recompute `type_and_id`
//! - `set_file` recomputes the case-insensitive file, the parent directory
//!   and prunes the file alias sets
//! - `set_code` recomputes the single line projection and its hash

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::path;
use crate::text;
use crate::types::{ResetType, ValueType};

/// A parsed and classified unit of script content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Definition {
    id: String,
    def_type: String,
    type_and_id: String,
    file: String,
    file_ci: String,
    parent_directory: String,
    parent_directory_ci: String,
    disk_file: Option<String>,
    disk_file_ci: Option<String>,
    virtual_path: Option<String>,
    virtual_parent_directory: Option<String>,
    code: String,
    single_line_code: String,
    code_sha: String,
    sha_override: Option<String>,
    additional_file_names: BTreeSet<String>,
    generated_file_names: BTreeSet<String>,
    overwritten_file_names: BTreeSet<String>,
    tags: Vec<String>,

    /// Code as close to the source formatting as feasible, used for display.
    pub original_code: String,
    /// Id before any parser rewrote it.
    pub original_id: Option<String>,
    /// File name before any merge renamed it.
    pub original_file_name: Option<String>,
    /// Name of the mod this definition came from.
    pub mod_name: String,
    /// Name of the mod before it was merged into a patch.
    pub original_mod_name: Option<String>,
    /// Declared dependencies of the owning mod.
    pub dependencies: Vec<String>,
    /// Hash of the raw file content.
    pub content_sha: String,
    /// Classification of this definition.
    pub value_type: ValueType,
    /// The same id may legitimately appear more than once.
    pub allow_duplicate: bool,
    /// The folder merges into a single file.
    pub is_special_folder: bool,
    /// The definition came from the base game.
    pub is_from_game: bool,
    /// The id was derived from an inline script.
    pub contains_inline_identifier: bool,
    /// Children should be concatenated rather than replaced on merge.
    pub flat_merge: bool,
    /// The file was parsed in simple validation mode.
    pub use_simple_validation: bool,
    /// Closing separator of the enclosing block, when the code was wrapped.
    pub code_separator: Option<String>,
    /// Key of the enclosing block, when the code was wrapped.
    pub code_tag: Option<String>,
    /// Conflict solver reset state.
    pub reset_type: ResetType,
    /// Name of the parser that produced this definition.
    pub used_parser: Option<String>,
    /// Position of this definition within its file.
    pub order: usize,
    /// Version number a localization key declared (`KEY:2 "text"`).
    pub custom_priority_order: i32,
    /// Line of the parse error, for invalid definitions.
    pub error_line: Option<u32>,
    /// Column of the parse error, for invalid definitions.
    pub error_column: Option<u32>,
    /// Parse error message, for invalid definitions.
    pub error_message: Option<String>,
}

impl Definition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the id and recomputes `type_and_id`.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.refresh_type_and_id();
    }

    /// Returns the type.
    #[must_use]
    pub fn def_type(&self) -> &str {
        &self.def_type
    }

    /// Sets the type and recomputes `type_and_id`.
    pub fn set_type(&mut self, def_type: impl Into<String>) {
        self.def_type = def_type.into();
        self.refresh_type_and_id();
    }

    /// Returns `{type}-{id}`.
    #[must_use]
    pub fn type_and_id(&self) -> &str {
        &self.type_and_id
    }

    fn refresh_type_and_id(&mut self) {
        self.type_and_id = format!("{}-{}", self.def_type, self.id);
    }

    // =========================================================================
    // Provenance
    // =========================================================================

    /// Returns the logical file path.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the lowercase logical file path.
    #[must_use]
    pub fn file_ci(&self) -> &str {
        &self.file_ci
    }

    /// Sets the logical file path.
    ///
    /// The new file is removed from the raw alias sets since the accessors
    /// always report the current file implicitly.
    pub fn set_file(&mut self, file: impl Into<String>) {
        self.file = path::normalize(&file.into());
        self.file_ci = self.file.to_lowercase();
        self.parent_directory = path::parent_directory(&self.file);
        self.parent_directory_ci = self.parent_directory.to_lowercase();
        self.additional_file_names.remove(&self.file);
        self.generated_file_names.remove(&self.file);
        self.overwritten_file_names.remove(&self.file);
    }

    /// Returns the directory containing the file.
    #[must_use]
    pub fn parent_directory(&self) -> &str {
        &self.parent_directory
    }

    /// Returns the lowercase directory containing the file.
    #[must_use]
    pub fn parent_directory_ci(&self) -> &str {
        &self.parent_directory_ci
    }

    /// Returns the path on disk, when it differs from the logical path.
    #[must_use]
    pub fn disk_file(&self) -> Option<&str> {
        self.disk_file.as_deref()
    }

    /// Returns the lowercase path on disk.
    #[must_use]
    pub fn disk_file_ci(&self) -> Option<&str> {
        self.disk_file_ci.as_deref()
    }

    /// Sets the path on disk.
    pub fn set_disk_file(&mut self, disk_file: Option<String>) {
        self.disk_file = disk_file.map(|f| path::normalize(&f));
        self.disk_file_ci = self.disk_file.as_ref().map(|f| f.to_lowercase());
    }

    /// Returns the virtual path, used when a file lands somewhere else in game.
    #[must_use]
    pub fn virtual_path(&self) -> Option<&str> {
        self.virtual_path.as_deref()
    }

    /// Returns the directory of the virtual path.
    #[must_use]
    pub fn virtual_parent_directory(&self) -> Option<&str> {
        self.virtual_parent_directory.as_deref()
    }

    /// Sets the virtual path.
    pub fn set_virtual_path(&mut self, virtual_path: Option<String>) {
        self.virtual_path = virtual_path.map(|p| path::normalize(&p));
        self.virtual_parent_directory = self.virtual_path.as_deref().map(path::parent_directory);
    }

    /// Returns the directory used for hierarchical grouping.
    ///
    /// This is the virtual parent directory when a virtual path is set.
    #[must_use]
    pub fn hierarchy_directory(&self) -> &str {
        self.virtual_parent_directory
            .as_deref()
            .unwrap_or(&self.parent_directory)
    }

    // =========================================================================
    // File aliases
    // =========================================================================

    /// Returns the additional file names, always including the current file.
    #[must_use]
    pub fn additional_file_names(&self) -> BTreeSet<String> {
        self.with_current_file(&self.additional_file_names)
    }

    /// Adds an additional file name.
    pub fn add_additional_file_name(&mut self, name: impl Into<String>) {
        let name = path::normalize(&name.into());
        if name != self.file {
            self.additional_file_names.insert(name);
        }
    }

    /// Returns the generated file names, always including the current file.
    #[must_use]
    pub fn generated_file_names(&self) -> BTreeSet<String> {
        self.with_current_file(&self.generated_file_names)
    }

    /// Adds a generated file name.
    pub fn add_generated_file_name(&mut self, name: impl Into<String>) {
        let name = path::normalize(&name.into());
        if name != self.file {
            self.generated_file_names.insert(name);
        }
    }

    /// Returns the overwritten file names, always including the current file.
    #[must_use]
    pub fn overwritten_file_names(&self) -> BTreeSet<String> {
        self.with_current_file(&self.overwritten_file_names)
    }

    /// Adds an overwritten file name.
    pub fn add_overwritten_file_name(&mut self, name: impl Into<String>) {
        let name = path::normalize(&name.into());
        if name != self.file {
            self.overwritten_file_names.insert(name);
        }
    }

    fn with_current_file(&self, names: &BTreeSet<String>) -> BTreeSet<String> {
        let mut all = names.clone();
        if !self.file.is_empty() {
            all.insert(self.file.clone());
        }
        all
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Returns the normalized code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the whitespace-collapsed single line projection of the code.
    #[must_use]
    pub fn single_line_code(&self) -> &str {
        &self.single_line_code
    }

    /// Sets the code, dropping blank lines, and recomputes the single line
    /// projection and its hash.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code
            .into()
            .replace('\t', "    ")
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        self.single_line_code = text::single_line(&self.code);
        self.code_sha = sha256_hex(&text::clean_whitespace(&self.single_line_code));
    }

    /// Returns the content hash used for conflict comparison.
    ///
    /// An explicit override wins, binary content uses the raw content hash,
    /// and everything else hashes the whitespace-cleaned single line code.
    #[must_use]
    pub fn definition_sha(&self) -> &str {
        if let Some(sha) = &self.sha_override {
            return sha;
        }
        if self.value_type == ValueType::Binary {
            return &self.content_sha;
        }
        &self.code_sha
    }

    /// Overrides the content hash.
    pub fn set_definition_sha(&mut self, sha: Option<String>) {
        self.sha_override = sha;
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Returns the search tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Adds a tag, lowercased, unless an equal tag exists.
    pub fn add_tag(&mut self, tag: &str) {
        let lower = tag.trim().to_lowercase();
        if !lower.is_empty() && !self.tags.contains(&lower) {
            self.tags.push(lower);
        }
    }

    /// Returns true if `"{mod_name} - {id}"` starts with the term, ignoring case.
    #[must_use]
    pub fn is_match(&self, term: &str) -> bool {
        format!("{} - {}", self.mod_name, self.id)
            .to_lowercase()
            .starts_with(&term.to_lowercase())
    }
}

/// Hex encoded SHA-256 of a string.
#[must_use]
pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}
