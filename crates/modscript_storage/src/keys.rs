//! Reference-counted key sets with cheap snapshots.
//!
//! Several definitions can share a key (a file holds many objects, a type
//! spans many files). A key stays in the set until the last definition
//! carrying it is removed. Snapshots are persistent `im::HashSet`s, so
//! handing one out does not copy the set.

use std::collections::HashMap;

/// A multiset of keys exposed as a set.
#[derive(Clone, Debug, Default)]
pub struct KeySet {
    counts: HashMap<String, usize>,
    keys: im::HashSet<String>,
}

impl KeySet {
    /// Creates an empty key set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one reference to a key.
    pub fn add(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        let count = self.counts.entry(key.to_string()).or_insert(0);
        if *count == 0 {
            self.keys.insert(key.to_string());
        }
        *count += 1;
    }

    /// Drops one reference to a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        let Some(count) = self.counts.get_mut(key) else {
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(key);
            self.keys.remove(key);
        }
    }

    /// Returns true if at least one reference to the key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    /// Returns a snapshot of the current keys.
    #[must_use]
    pub fn snapshot(&self) -> im::HashSet<String> {
        self.keys.clone()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
