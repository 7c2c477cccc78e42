//! Hierarchical definition nodes.
//!
//! The hierarchy is a two-level view: one node per parent directory, one
//! child per distinct definition id inside it. It is the shape the conflict
//! browser displays.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::ResetType;

/// A node in the directory → id tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HierarchicalDefinition {
    /// Display name: the directory for top-level nodes, the id for children.
    pub name: String,
    /// Lookup key: the directory for top-level nodes, `type_and_id` for children.
    pub key: String,
    /// Files contributing to this node, without duplicates.
    pub file_names: Vec<String>,
    /// Mods contributing to this node, without duplicates.
    pub mods: Vec<String>,
    /// Child nodes.
    pub children: Vec<HierarchicalDefinition>,
    /// Number of contributing definitions that are not from the base game.
    pub non_game_definitions: usize,
    /// Conflict solver reset state.
    pub reset_type: ResetType,
}

impl HierarchicalDefinition {
    /// Creates a node with the given name and key.
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Returns true if the name starts with the term, ignoring case.
    #[must_use]
    pub fn is_match(&self, term: &str) -> bool {
        self.name.to_lowercase().starts_with(&term.to_lowercase())
    }

    /// Sorts children by name, case-insensitively, recursively.
    pub fn sort_children(&mut self) {
        self.children
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        for child in &mut self.children {
            child.sort_children();
        }
    }
}
