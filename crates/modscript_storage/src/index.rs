//! The indexed definition store.
//!
//! [`IndexedDefinitions`] holds one mutable set of definitions, usually the
//! files of one mod or an aggregated multi-mod view, and answers lookups by
//! file, directory, type, id and value type. It also maintains the
//! hierarchical browsing tree and, once initialized, a tag search trie.
//!
//! All indexes live behind one `RwLock`, so every add and remove is atomic
//! to readers. A poisoned lock is recovered: each mutation leaves the
//! indexes consistent before it can panic.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use modscript_foundation::{Definition, Error, HierarchicalDefinition, Result, ValueType, path};
use tracing::{trace, warn};

use crate::hierarchy::HierarchyMap;
use crate::keys::KeySet;
use crate::search::TagTrie;

/// A lookup table from key to the definitions carrying it.
#[derive(Debug)]
struct Lookup<K> {
    buckets: HashMap<K, Vec<Arc<Definition>>>,
}

impl<K> Default for Lookup<K> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq> Lookup<K> {
    fn insert(&mut self, key: K, definition: &Arc<Definition>) {
        self.buckets
            .entry(key)
            .or_default()
            .push(Arc::clone(definition));
    }

    fn remove(&mut self, key: &K, definition: &Arc<Definition>) {
        if let Some(bucket) = self.buckets.get_mut(key) {
            bucket.retain(|d| !Arc::ptr_eq(d, definition));
            if bucket.is_empty() {
                self.buckets.remove(key);
            }
        }
    }

    fn get(&self, key: &K) -> Vec<Arc<Definition>> {
        self.buckets.get(key).cloned().unwrap_or_default()
    }
}

#[derive(Debug)]
struct Entry {
    definition: Arc<Definition>,
    in_hierarchy: bool,
}

#[derive(Debug)]
struct Inner {
    entries: Vec<Entry>,
    map_hierarchical: bool,
    by_file: Lookup<String>,
    by_disk_file: Lookup<String>,
    by_parent_directory: Lookup<String>,
    by_type: Lookup<String>,
    by_type_and_id: Lookup<String>,
    by_value_type: Lookup<ValueType>,
    file_keys: KeySet,
    type_keys: KeySet,
    type_and_id_keys: KeySet,
    directory_keys: KeySet,
    hierarchy: HierarchyMap,
    search: Option<TagTrie>,
    game_definitions: usize,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            map_hierarchical: true,
            by_file: Lookup::default(),
            by_disk_file: Lookup::default(),
            by_parent_directory: Lookup::default(),
            by_type: Lookup::default(),
            by_type_and_id: Lookup::default(),
            by_value_type: Lookup::default(),
            file_keys: KeySet::new(),
            type_keys: KeySet::new(),
            type_and_id_keys: KeySet::new(),
            directory_keys: KeySet::new(),
            hierarchy: HierarchyMap::new(),
            search: None,
            game_definitions: 0,
        }
    }
}

/// Case-insensitive key for path-like lookups.
fn path_key(value: &str) -> String {
    path::normalize(value).to_lowercase()
}

/// Every file name a definition can be found under.
fn file_aliases(definition: &Definition) -> Vec<String> {
    let mut aliases = vec![definition.file_ci().to_string()];
    if let Some(disk) = definition.disk_file_ci() {
        aliases.push(disk.to_string());
    }
    aliases.extend(definition.overwritten_file_names().iter().map(|n| path_key(n)));
    aliases.sort();
    aliases.dedup();
    aliases
}

impl Inner {
    fn add(&mut self, definition: Arc<Definition>, force_ignore_hierarchical: bool) {
        self.by_file.insert(definition.file_ci().to_string(), &definition);
        if let Some(disk) = definition.disk_file_ci() {
            self.by_disk_file.insert(disk.to_string(), &definition);
        }
        self.by_parent_directory
            .insert(definition.parent_directory_ci().to_string(), &definition);
        let type_key = definition.def_type().to_lowercase();
        self.by_type.insert(type_key.clone(), &definition);
        self.by_type_and_id
            .insert(definition.type_and_id().to_string(), &definition);
        self.by_value_type.insert(definition.value_type, &definition);

        for alias in file_aliases(&definition) {
            self.file_keys.add(&alias);
        }
        self.type_keys.add(&type_key);
        self.type_and_id_keys.add(definition.type_and_id());
        self.directory_keys.add(definition.parent_directory_ci());

        let in_hierarchy = self.map_hierarchical && !force_ignore_hierarchical;
        if in_hierarchy {
            self.hierarchy.add(&definition);
        }
        if let Some(search) = &mut self.search {
            search.insert(&definition);
        }
        if definition.is_from_game {
            self.game_definitions += 1;
        }

        trace!(type_and_id = definition.type_and_id(), file = definition.file(), "definition added");
        self.entries.push(Entry {
            definition,
            in_hierarchy,
        });
    }

    fn remove(&mut self, definition: &Definition) -> bool {
        let found = self
            .by_type_and_id
            .get(&definition.type_and_id().to_string())
            .into_iter()
            .find(|candidate| **candidate == *definition);
        let Some(stored) = found else {
            return false;
        };
        let Some(position) = self
            .entries
            .iter()
            .position(|entry| Arc::ptr_eq(&entry.definition, &stored))
        else {
            return false;
        };
        let entry = self.entries.remove(position);

        self.by_file.remove(&stored.file_ci().to_string(), &stored);
        if let Some(disk) = stored.disk_file_ci() {
            self.by_disk_file.remove(&disk.to_string(), &stored);
        }
        self.by_parent_directory
            .remove(&stored.parent_directory_ci().to_string(), &stored);
        let type_key = stored.def_type().to_lowercase();
        self.by_type.remove(&type_key, &stored);
        self.by_type_and_id
            .remove(&stored.type_and_id().to_string(), &stored);
        self.by_value_type.remove(&stored.value_type, &stored);

        for alias in file_aliases(&stored) {
            self.file_keys.remove(&alias);
        }
        self.type_keys.remove(&type_key);
        self.type_and_id_keys.remove(stored.type_and_id());
        self.directory_keys.remove(stored.parent_directory_ci());

        if entry.in_hierarchy {
            self.hierarchy.remove(&stored);
        }
        if let Some(search) = &mut self.search {
            search.remove(&stored);
        }
        if stored.is_from_game {
            self.game_definitions -= 1;
        }

        trace!(type_and_id = stored.type_and_id(), file = stored.file(), "definition removed");
        true
    }
}

/// A concurrent, multi-key index over definitions.
///
/// Mutations take `&self` and may be called from many threads. After
/// [`dispose`](Self::dispose) mutations fail with
/// [`ErrorKind::StoreDisposed`](modscript_foundation::ErrorKind::StoreDisposed)
/// and reads return empty results.
#[derive(Debug)]
pub struct IndexedDefinitions {
    inner: RwLock<Option<Inner>>,
}

impl Default for IndexedDefinitions {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedDefinitions {
    /// Creates an empty store that maintains the hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Some(Inner::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Inner>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Inner>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a mutation, failing if the store was disposed.
    fn mutate<T>(&self, operation: &str, f: impl FnOnce(&mut Inner) -> T) -> Result<T> {
        let mut guard = self.write();
        match guard.as_mut() {
            Some(inner) => Ok(f(inner)),
            None => {
                warn!(operation, "definition store used after dispose");
                Err(Error::store_disposed())
            }
        }
    }

    /// Runs a read, returning the default when the store was disposed.
    fn query<T: Default>(&self, f: impl FnOnce(&Inner) -> T) -> T {
        self.read().as_ref().map(f).unwrap_or_default()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Adds definitions in bulk and chooses whether the hierarchy is maintained.
    ///
    /// # Errors
    /// Returns an error if the store was disposed.
    pub fn init_map<I>(&self, definitions: I, map_hierarchical: bool) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Arc<Definition>>,
    {
        self.mutate("init_map", |inner| {
            inner.map_hierarchical = map_hierarchical;
            for definition in definitions {
                inner.add(definition.into(), false);
            }
        })
    }

    /// Adds a definition to every index.
    ///
    /// With `force_ignore_hierarchical` the hierarchy is left untouched.
    ///
    /// # Errors
    /// Returns an error if the store was disposed.
    pub fn add_to_map(
        &self,
        definition: impl Into<Arc<Definition>>,
        force_ignore_hierarchical: bool,
    ) -> Result<()> {
        let definition = definition.into();
        self.mutate("add_to_map", |inner| {
            inner.add(definition, force_ignore_hierarchical);
        })
    }

    /// Removes a definition equal to `definition` from every index.
    ///
    /// Returns `Ok(false)` if no such definition is stored.
    ///
    /// # Errors
    /// Returns an error if the store was disposed.
    pub fn remove(&self, definition: &Definition) -> Result<bool> {
        self.mutate("remove", |inner| inner.remove(definition))
    }

    /// Builds the tag search trie over every stored definition.
    ///
    /// # Errors
    /// Returns an error if the store was disposed.
    pub fn init_search(&self) -> Result<()> {
        self.mutate("init_search", |inner| {
            let mut trie = TagTrie::new();
            for entry in &inner.entries {
                trie.insert(&entry.definition);
            }
            inner.search = Some(trie);
        })
    }

    /// Copies the reset state of `definition` onto its hierarchy node.
    ///
    /// Returns `Ok(false)` if the node does not exist.
    ///
    /// # Errors
    /// Returns an error if the store was disposed.
    pub fn change_hierarchical_reset_state(&self, definition: &Definition) -> Result<bool> {
        self.mutate("change_hierarchical_reset_state", |inner| {
            inner
                .hierarchy
                .set_reset_type(definition, definition.reset_type)
        })
    }

    /// Releases every index. The store cannot be mutated afterwards.
    pub fn dispose(&self) {
        *self.write() = None;
    }

    /// Returns true if the store was disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.read().is_none()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns every definition in insertion order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Arc<Definition>> {
        self.query(|inner| {
            inner
                .entries
                .iter()
                .map(|entry| Arc::clone(&entry.definition))
                .collect()
        })
    }

    /// Returns the number of stored definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.query(|inner| inner.entries.len())
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns definitions from a logical file, ignoring case.
    #[must_use]
    pub fn get_by_file(&self, file: &str) -> Vec<Arc<Definition>> {
        self.query(|inner| inner.by_file.get(&path_key(file)))
    }

    /// Returns definitions from a disk file, ignoring case.
    #[must_use]
    pub fn get_by_disk_file(&self, file: &str) -> Vec<Arc<Definition>> {
        self.query(|inner| inner.by_disk_file.get(&path_key(file)))
    }

    /// Returns definitions whose file sits directly in `directory`, ignoring case.
    #[must_use]
    pub fn get_by_parent_directory(&self, directory: &str) -> Vec<Arc<Definition>> {
        self.query(|inner| inner.by_parent_directory.get(&path_key(directory)))
    }

    /// Returns definitions of a type, ignoring case.
    #[must_use]
    pub fn get_by_type(&self, def_type: &str) -> Vec<Arc<Definition>> {
        self.query(|inner| inner.by_type.get(&def_type.to_lowercase()))
    }

    /// Returns definitions with an exact `type_and_id`.
    #[must_use]
    pub fn get_by_type_and_id(&self, type_and_id: &str) -> Vec<Arc<Definition>> {
        self.query(|inner| inner.by_type_and_id.get(&type_and_id.to_string()))
    }

    /// Returns definitions of a value type.
    #[must_use]
    pub fn get_by_value_type(&self, value_type: ValueType) -> Vec<Arc<Definition>> {
        self.query(|inner| inner.by_value_type.get(&value_type))
    }

    /// Returns true if any definition is known under `file`, counting
    /// disk files and overwritten file names.
    #[must_use]
    pub fn exists_by_file(&self, file: &str) -> bool {
        self.query(|inner| inner.file_keys.contains(&path_key(file)))
    }

    /// Returns true if any stored definition comes from the base game.
    #[must_use]
    pub fn has_game_definitions(&self) -> bool {
        self.query(|inner| inner.game_definitions > 0)
    }

    /// Returns true if any hierarchy node carries a reset state.
    #[must_use]
    pub fn has_reset_definitions(&self) -> bool {
        self.query(|inner| inner.hierarchy.has_reset())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Returns every lowercase file alias.
    #[must_use]
    pub fn get_all_file_keys(&self) -> im::HashSet<String> {
        self.query(|inner| inner.file_keys.snapshot())
    }

    /// Returns every lowercase type, each usable with [`Self::get_by_type`].
    #[must_use]
    pub fn get_all_type_keys(&self) -> im::HashSet<String> {
        self.query(|inner| inner.type_keys.snapshot())
    }

    /// Returns every `type_and_id`.
    #[must_use]
    pub fn get_all_type_and_id_keys(&self) -> im::HashSet<String> {
        self.query(|inner| inner.type_and_id_keys.snapshot())
    }

    /// Returns every lowercase parent directory.
    #[must_use]
    pub fn get_all_directory_keys(&self) -> im::HashSet<String> {
        self.query(|inner| inner.directory_keys.snapshot())
    }

    // =========================================================================
    // Hierarchy and search
    // =========================================================================

    /// Returns the directory → id tree, sorted by name at both levels.
    #[must_use]
    pub fn get_hierarchical_definitions(&self) -> Vec<HierarchicalDefinition> {
        self.query(|inner| inner.hierarchy.build())
    }

    /// Returns definitions with a tag equal to or starting with `term`,
    /// ignoring case. Returns nothing before [`init_search`](Self::init_search).
    #[must_use]
    pub fn search_definitions(&self, term: &str) -> Vec<Arc<Definition>> {
        self.query(|inner| {
            inner
                .search
                .as_ref()
                .map(|trie| trie.search(term))
                .unwrap_or_default()
        })
    }
}
