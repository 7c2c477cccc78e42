//! Conflict detection tests
//!
//! Two mods defining the same object share a `type_and_id` and differ in
//! hash when their content differs. The store groups them for browsing.

use std::sync::atomic::AtomicBool;

use modscript::parser::{GameType, ParserArgs, ParserManager, ParserManagerArgs};
use modscript::storage::IndexedDefinitions;

fn file(mod_name: &str, path: &str, text: &str) -> ParserManagerArgs {
    ParserManagerArgs::new(
        ParserArgs::from_text(path, text).with_mod(mod_name),
        GameType::Stellaris,
    )
}

fn store_with_two_mods() -> IndexedDefinitions {
    let store = IndexedDefinitions::new();
    let files = vec![
        file("Mod A", "common/buildings/a_buildings.txt", "building_capital = {\n    cost = 100\n}"),
        file("Mod B", "common/buildings/b_buildings.txt", "building_capital = {\n    cost = 200\n}\nbuilding_farm = { }"),
        file("Mod B", "events/b_events.txt", "namespace = b\nb.1 = { id = b.1 }"),
    ];
    ParserManager::default()
        .parse_into(&files, &store, &AtomicBool::new(false))
        .unwrap();
    store
}

#[test]
fn same_object_from_two_mods() {
    let store = store_with_two_mods();
    let capital = store.get_by_type_and_id("common/buildings/txt-building_capital");
    assert_eq!(capital.len(), 2);
    assert_ne!(capital[0].definition_sha(), capital[1].definition_sha());
    let mut mods: Vec<_> = capital.iter().map(|d| d.mod_name.as_str()).collect();
    mods.sort_unstable();
    assert_eq!(mods, ["Mod A", "Mod B"]);
}

#[test]
fn hierarchy_groups_conflicts() {
    let store = store_with_two_mods();
    let tree = store.get_hierarchical_definitions();
    let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["common/buildings", "events"]);

    let buildings = &tree[0];
    assert_eq!(buildings.children.len(), 2);
    let capital = &buildings.children[0];
    assert_eq!(capital.name, "building_capital");
    assert_eq!(capital.mods.len(), 2);
    assert_eq!(capital.file_names.len(), 2);
}

#[test]
fn search_and_aliases() {
    let store = store_with_two_mods();
    store.init_search().unwrap();
    assert_eq!(store.search_definitions("building_").len(), 3);
    assert_eq!(store.search_definitions("b.1").len(), 1);
    assert!(store.exists_by_file("COMMON/BUILDINGS/A_BUILDINGS.TXT"));
    assert_eq!(store.get_by_parent_directory("events").len(), 2);
}

#[test]
fn removing_one_side_keeps_the_other() {
    let store = store_with_two_mods();
    let capital = store.get_by_type_and_id("common/buildings/txt-building_capital");
    let mod_a = capital
        .iter()
        .find(|d| d.mod_name == "Mod A")
        .unwrap()
        .as_ref()
        .clone();
    assert!(store.remove(&mod_a).unwrap());

    assert_eq!(store.get_by_type_and_id("common/buildings/txt-building_capital").len(), 1);
    assert!(!store.exists_by_file("common/buildings/a_buildings.txt"));
    let tree = store.get_hierarchical_definitions();
    assert_eq!(tree[0].children[0].mods, ["Mod B"]);
}
