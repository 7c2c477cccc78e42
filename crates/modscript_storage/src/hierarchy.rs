//! The directory → id tree maintained alongside the flat indexes.
//!
//! Nodes keep a list of contributions (one per definition added) rather than
//! the finished `file_names`/`mods` lists, so removing a definition only
//! removes its own contribution. The display lists are rebuilt from the
//! contributions when the tree is read.

use std::collections::HashMap;

use modscript_foundation::{Definition, HierarchicalDefinition, ResetType};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Contribution {
    file: String,
    mod_name: String,
    is_from_game: bool,
}

impl Contribution {
    fn of(definition: &Definition) -> Self {
        Self {
            file: definition.file().to_string(),
            mod_name: definition.mod_name.clone(),
            is_from_game: definition.is_from_game,
        }
    }
}

#[derive(Clone, Debug)]
struct ChildNode {
    name: String,
    key: String,
    contributions: Vec<Contribution>,
    reset_type: ResetType,
}

#[derive(Clone, Debug)]
struct DirectoryNode {
    name: String,
    children: HashMap<String, ChildNode>,
}

/// Directory → id tree keyed case-insensitively at both levels.
#[derive(Clone, Debug, Default)]
pub struct HierarchyMap {
    directories: HashMap<String, DirectoryNode>,
}

fn directory_key(definition: &Definition) -> String {
    definition.hierarchy_directory().to_lowercase()
}

fn child_key(definition: &Definition) -> String {
    definition.id().to_lowercase()
}

impl HierarchyMap {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a definition under its directory and id.
    pub fn add(&mut self, definition: &Definition) {
        let directory = self
            .directories
            .entry(directory_key(definition))
            .or_insert_with(|| DirectoryNode {
                name: definition.hierarchy_directory().to_string(),
                children: HashMap::new(),
            });
        let child = directory
            .children
            .entry(child_key(definition))
            .or_insert_with(|| ChildNode {
                name: definition.id().to_string(),
                key: definition.type_and_id().to_string(),
                contributions: Vec::new(),
                reset_type: ResetType::None,
            });
        child.contributions.push(Contribution::of(definition));
    }

    /// Removes one contribution of a definition. Empty children and
    /// directories are dropped. Returns true if a contribution was found.
    pub fn remove(&mut self, definition: &Definition) -> bool {
        let dir_key = directory_key(definition);
        let Some(directory) = self.directories.get_mut(&dir_key) else {
            return false;
        };
        let id_key = child_key(definition);
        let Some(child) = directory.children.get_mut(&id_key) else {
            return false;
        };
        let contribution = Contribution::of(definition);
        let Some(position) = child.contributions.iter().position(|c| *c == contribution) else {
            return false;
        };
        child.contributions.remove(position);
        if child.contributions.is_empty() {
            directory.children.remove(&id_key);
        }
        if directory.children.is_empty() {
            self.directories.remove(&dir_key);
        }
        true
    }

    /// Sets the reset state of the child node for a definition. Returns
    /// true if the node exists.
    pub fn set_reset_type(&mut self, definition: &Definition, reset_type: ResetType) -> bool {
        self.directories
            .get_mut(&directory_key(definition))
            .and_then(|directory| directory.children.get_mut(&child_key(definition)))
            .map(|child| child.reset_type = reset_type)
            .is_some()
    }

    /// Returns true if any child node carries a reset state.
    #[must_use]
    pub fn has_reset(&self) -> bool {
        self.directories
            .values()
            .flat_map(|directory| directory.children.values())
            .any(|child| child.reset_type.is_reset())
    }

    /// Returns the number of directory nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Builds the display tree, sorted by name at both levels.
    #[must_use]
    pub fn build(&self) -> Vec<HierarchicalDefinition> {
        let mut nodes: Vec<HierarchicalDefinition> = self
            .directories
            .iter()
            .map(|(key, directory)| build_directory(key, directory))
            .collect();
        nodes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        nodes
    }
}

fn build_directory(key: &str, directory: &DirectoryNode) -> HierarchicalDefinition {
    let mut node = HierarchicalDefinition::new(directory.name.clone(), key);
    node.children = directory.children.values().map(build_child).collect();
    node.sort_children();
    for child in &node.children {
        for mod_name in &child.mods {
            push_unique(&mut node.mods, mod_name);
        }
        node.non_game_definitions += child.non_game_definitions;
    }
    node.reset_type = directory_reset_type(&node.children);
    node
}

fn build_child(child: &ChildNode) -> HierarchicalDefinition {
    let mut node = HierarchicalDefinition::new(child.name.clone(), child.key.clone());
    for contribution in &child.contributions {
        push_unique(&mut node.file_names, &contribution.file);
        if !contribution.is_from_game {
            push_unique(&mut node.mods, &contribution.mod_name);
            node.non_game_definitions += 1;
        }
    }
    node.reset_type = child.reset_type;
    node
}

/// A directory is resolved if any child is, otherwise ignored if any child is.
fn directory_reset_type(children: &[HierarchicalDefinition]) -> ResetType {
    if children.iter().any(|c| c.reset_type == ResetType::Resolved) {
        ResetType::Resolved
    } else if children.iter().any(|c| c.reset_type == ResetType::Ignored) {
        ResetType::Ignored
    } else {
        ResetType::None
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
