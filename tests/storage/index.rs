//! Integration tests for IndexedDefinitions
//!
//! Tests lookups, file aliases, key snapshots, removal, disposal, and
//! concurrent use.

use std::sync::Arc;
use std::thread;

use modscript_foundation::{ErrorKind, ValueType};
use modscript_storage::IndexedDefinitions;
use proptest::prelude::*;

use crate::def;

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn lookups_by_every_key() {
    let store = IndexedDefinitions::new();
    store
        .add_to_map(def("common/buildings/a.txt", "building_a", "Mod A"), false)
        .unwrap();
    store
        .add_to_map(def("common/buildings/b.txt", "building_b", "Mod B"), false)
        .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get_by_file("COMMON/Buildings/A.txt").len(), 1);
    assert_eq!(store.get_by_parent_directory("common/buildings").len(), 2);
    assert_eq!(store.get_by_type("Common/Buildings/TXT").len(), 2);
    assert_eq!(
        store
            .get_by_type_and_id("common/buildings/txt-building_a")
            .len(),
        1
    );
    assert!(store
        .get_by_type_and_id("common/buildings/txt-BUILDING_A")
        .is_empty());
    assert_eq!(store.get_by_value_type(ValueType::Object).len(), 2);
}

#[test]
fn misses_are_empty() {
    let store = IndexedDefinitions::new();
    assert!(store.get_by_file("nothing.txt").is_empty());
    assert!(store.get_by_type("nothing").is_empty());
    assert!(!store.exists_by_file("nothing.txt"));
}

#[test]
fn init_map_adds_in_bulk() {
    let store = IndexedDefinitions::new();
    store
        .init_map(
            vec![
                def("common/a/a.txt", "x", "m"),
                def("common/a/b.txt", "y", "m"),
            ],
            true,
        )
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get_hierarchical_definitions().len(), 1);
}

// =============================================================================
// File Aliases
// =============================================================================

#[test]
fn exists_by_file_covers_disk_and_overwritten_names() {
    let store = IndexedDefinitions::new();
    let mut d = def("common/ethics/00_ethics.txt", "ethic_a", "m");
    d.set_disk_file(Some("common/ethics/zz_merged.txt".to_string()));
    d.add_overwritten_file_name("common/ethics/01_old.txt");
    store.add_to_map(d.clone(), false).unwrap();

    assert!(store.exists_by_file("common/ethics/00_ethics.txt"));
    assert!(store.exists_by_file("COMMON/ETHICS/ZZ_MERGED.TXT"));
    assert!(store.exists_by_file("common/ethics/01_old.txt"));
    assert_eq!(store.get_by_disk_file("common/ethics/zz_merged.txt").len(), 1);

    store.remove(&d).unwrap();
    assert!(!store.exists_by_file("common/ethics/01_old.txt"));
    assert!(store.get_all_file_keys().is_empty());
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn key_snapshots_are_detached() {
    let store = IndexedDefinitions::new();
    store.add_to_map(def("common/a/a.txt", "x", "m"), false).unwrap();
    let types = store.get_all_type_keys();
    store.add_to_map(def("events/b.txt", "y", "m"), false).unwrap();

    assert_eq!(types.len(), 1);
    assert_eq!(store.get_all_type_keys().len(), 2);
    assert!(store.get_all_directory_keys().contains("events"));
    assert!(store.get_all_type_and_id_keys().contains("common/a/txt-x"));
}

#[test]
fn type_keys_resolve_through_get_by_type() {
    let store = IndexedDefinitions::new();
    store.add_to_map(def("Common/Buildings/a.txt", "x", "m"), false).unwrap();
    store.add_to_map(def("common/buildings/b.txt", "y", "m"), false).unwrap();

    let types = store.get_all_type_keys();
    assert_eq!(types.len(), 1);
    assert!(types.contains("common/buildings/txt"));
    for key in &types {
        assert_eq!(store.get_by_type(key).len(), 2);
    }
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_unknown_is_noop() {
    let store = IndexedDefinitions::new();
    store.add_to_map(def("common/a/a.txt", "x", "m"), false).unwrap();
    assert!(!store.remove(&def("common/a/a.txt", "other", "m")).unwrap());
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_keeps_shared_keys_alive() {
    let store = IndexedDefinitions::new();
    let a = def("common/a/a.txt", "x", "m");
    let b = def("common/a/a.txt", "y", "m");
    store.add_to_map(a.clone(), false).unwrap();
    store.add_to_map(b, false).unwrap();

    store.remove(&a).unwrap();
    assert!(store.exists_by_file("common/a/a.txt"));
    assert!(store.get_all_type_keys().contains("common/a/txt"));
    assert!(!store.get_all_type_and_id_keys().contains("common/a/txt-x"));
}

// =============================================================================
// Disposal
// =============================================================================

#[test]
fn disposed_store_rejects_mutation() {
    let store = IndexedDefinitions::new();
    store.add_to_map(def("common/a/a.txt", "x", "m"), false).unwrap();
    store.dispose();

    assert!(store.is_empty());
    assert!(store.get_hierarchical_definitions().is_empty());
    let err = store.remove(&def("common/a/a.txt", "x", "m")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StoreDisposed));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_adds_are_all_visible() {
    let store = Arc::new(IndexedDefinitions::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    let file = format!("common/dir_{t}/file.txt");
                    store
                        .add_to_map(def(&file, &format!("id_{i}"), "m"), false)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 400);
    assert_eq!(store.get_all_directory_keys().len(), 8);
}

proptest! {
    #[test]
    fn file_aliases_resolve_case_insensitively(
        dir in "[a-z]{1,6}",
        name in "[a-zA-Z]{1,6}",
        disk in "[a-zA-Z]{1,6}",
    ) {
        let store = IndexedDefinitions::new();
        let file = format!("common/{dir}/{name}.txt");
        let disk_file = format!("common/{dir}/{disk}_disk.txt");
        let mut d = def(&file, "x", "m");
        d.set_disk_file(Some(disk_file.clone()));
        store.add_to_map(d, false).unwrap();

        prop_assert!(store.exists_by_file(&file.to_uppercase()));
        prop_assert!(store.exists_by_file(&disk_file.to_lowercase()));
    }
}
