//! Integration tests for the hierarchy
//!
//! Tests grouping, sorting, mod lists, reset propagation, and consistency
//! after arbitrary adds and removes.

use std::collections::{BTreeMap, BTreeSet};

use modscript_foundation::ResetType;
use modscript_storage::IndexedDefinitions;
use proptest::prelude::*;

use crate::def;

#[test]
fn grouped_by_directory_and_id() {
    let store = IndexedDefinitions::new();
    store.add_to_map(def("common/b/1.txt", "zeta", "Mod A"), false).unwrap();
    store.add_to_map(def("common/b/2.txt", "alpha", "Mod B"), false).unwrap();
    store.add_to_map(def("common/b/3.txt", "alpha", "Mod C"), false).unwrap();
    store.add_to_map(def("common/a/1.txt", "x", "Mod A"), false).unwrap();

    let tree = store.get_hierarchical_definitions();
    let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["common/a", "common/b"]);

    let b = &tree[1];
    let children: Vec<_> = b.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(children, ["alpha", "zeta"]);
    assert_eq!(b.children[0].mods, ["Mod B", "Mod C"]);
    assert_eq!(b.children[0].file_names.len(), 2);
    assert_eq!(b.children[0].key, "common/b/txt-alpha");
}

#[test]
fn game_definitions_are_not_mods() {
    let store = IndexedDefinitions::new();
    let mut game = def("common/a/1.txt", "x", "Game");
    game.is_from_game = true;
    store.add_to_map(game, false).unwrap();
    store.add_to_map(def("common/a/2.txt", "x", "Mod"), false).unwrap();

    let tree = store.get_hierarchical_definitions();
    assert_eq!(tree[0].children[0].mods, ["Mod"]);
    assert_eq!(tree[0].children[0].non_game_definitions, 1);
}

#[test]
fn reset_state_marks_directory() {
    let store = IndexedDefinitions::new();
    let mut d = def("common/a/1.txt", "x", "m");
    store.add_to_map(d.clone(), false).unwrap();
    store.add_to_map(def("common/a/1.txt", "y", "m"), false).unwrap();

    d.reset_type = ResetType::Ignored;
    store.change_hierarchical_reset_state(&d).unwrap();
    let tree = store.get_hierarchical_definitions();
    assert_eq!(tree[0].reset_type, ResetType::Ignored);
    assert_eq!(tree[0].children[0].reset_type, ResetType::Ignored);
    assert_eq!(tree[0].children[1].reset_type, ResetType::None);
}

#[test]
fn virtual_path_groups_under_virtual_directory() {
    let store = IndexedDefinitions::new();
    let mut d = def("interface/replace/main.gui", "main", "m");
    d.set_virtual_path(Some("interface/main.gui".to_string()));
    store.add_to_map(d, false).unwrap();
    assert_eq!(store.get_hierarchical_definitions()[0].name, "interface");
}

#[test]
fn flat_store_has_no_hierarchy() {
    let store = IndexedDefinitions::new();
    store
        .init_map(vec![def("common/a/1.txt", "x", "m")], false)
        .unwrap();
    assert!(store.get_hierarchical_definitions().is_empty());
    store.add_to_map(def("common/a/2.txt", "y", "m"), true).unwrap();
    assert!(store.get_hierarchical_definitions().is_empty());
}

#[derive(Clone, Debug)]
enum Op {
    Add(usize, usize),
    Remove(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..4usize).prop_map(|(d, i)| Op::Add(d, i)),
        (0..3usize, 0..4usize).prop_map(|(d, i)| Op::Remove(d, i)),
    ]
}

proptest! {
    #[test]
    fn hierarchy_matches_stored_definitions(ops in prop::collection::vec(op(), 0..40)) {
        let store = IndexedDefinitions::new();
        for op in ops {
            match op {
                Op::Add(d, i) => {
                    store
                        .add_to_map(def(&format!("common/dir_{d}/f.txt"), &format!("id_{i}"), "m"), false)
                        .unwrap();
                }
                Op::Remove(d, i) => {
                    store
                        .remove(&def(&format!("common/dir_{d}/f.txt"), &format!("id_{i}"), "m"))
                        .unwrap();
                }
            }
        }

        let mut expected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for definition in store.get_all() {
            expected
                .entry(definition.parent_directory_ci().to_string())
                .or_default()
                .insert(definition.id().to_string());
        }

        let tree = store.get_hierarchical_definitions();
        prop_assert_eq!(tree.len(), expected.len());
        for node in &tree {
            prop_assert!(!node.children.is_empty());
            let ids: BTreeSet<String> = node.children.iter().map(|c| c.name.clone()).collect();
            prop_assert_eq!(Some(&ids), expected.get(&node.key));
        }
    }
}
