//! Tag prefix search.
//!
//! A character trie over definition tags. Each node holds the definitions
//! whose tag ends there; a prefix query collects the whole subtree.

use std::collections::BTreeMap;
use std::sync::Arc;

use modscript_foundation::Definition;

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    entries: Vec<Arc<Definition>>,
}

impl TrieNode {
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.entries.is_empty()
    }

    fn collect(&self, out: &mut Vec<Arc<Definition>>) {
        for entry in &self.entries {
            if !out.iter().any(|seen| Arc::ptr_eq(seen, entry)) {
                out.push(Arc::clone(entry));
            }
        }
        for child in self.children.values() {
            child.collect(out);
        }
    }

    /// Removes `definition` below the path `chars`. Returns true if this
    /// node became empty.
    fn remove(&mut self, mut chars: std::str::Chars<'_>, definition: &Arc<Definition>) -> bool {
        match chars.next() {
            None => self.entries.retain(|entry| !Arc::ptr_eq(entry, definition)),
            Some(c) => {
                let emptied = self
                    .children
                    .get_mut(&c)
                    .is_some_and(|child| child.remove(chars, definition));
                if emptied {
                    self.children.remove(&c);
                }
            }
        }
        self.is_empty()
    }
}

/// A trie over lowercase tags.
#[derive(Clone, Debug, Default)]
pub struct TagTrie {
    root: TrieNode,
}

impl TagTrie {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every tag of a definition.
    pub fn insert(&mut self, definition: &Arc<Definition>) {
        for tag in definition.tags() {
            let mut node = &mut self.root;
            for c in tag.chars() {
                node = node.children.entry(c).or_default();
            }
            if !node.entries.iter().any(|entry| Arc::ptr_eq(entry, definition)) {
                node.entries.push(Arc::clone(definition));
            }
        }
    }

    /// Removes every tag of a definition, pruning empty branches.
    pub fn remove(&mut self, definition: &Arc<Definition>) {
        for tag in definition.tags() {
            self.root.remove(tag.chars(), definition);
        }
    }

    /// Returns definitions with a tag equal to or starting with `term`.
    ///
    /// The term is lowercased. An empty term matches nothing.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Arc<Definition>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        let mut node = &self.root;
        for c in term.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        node.collect(&mut out);
        out
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
