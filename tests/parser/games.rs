//! Integration tests for the game specific parsers
//!
//! Runs Stellaris and Hearts of Iron IV files through the manager.

use modscript_foundation::ValueType;
use modscript_parser::GameType;

use crate::{ids, parse};

// =============================================================================
// Stellaris
// =============================================================================

#[test]
fn stellaris_overwritten_objects() {
    let defs = parse(
        GameType::Stellaris,
        "common/buildings/00_buildings.txt",
        "building_capital = {\n    base_buildtime = 100\n}\nbuilding_farm = { }",
    );
    assert_eq!(ids(&defs), ["building_capital", "building_farm"]);
    assert!(defs.iter().all(|d| d.value_type == ValueType::OverwrittenObject));
    assert!(defs
        .iter()
        .all(|d| d.used_parser.as_deref() == Some("StellarisOverwrittenParser")));
    assert_eq!(defs[0].mod_name, "Test Mod");
}

#[test]
fn stellaris_single_file_duplicates() {
    let defs = parse(
        GameType::Stellaris,
        "common/ethics/00_ethics.txt",
        "ethic_categories = {\n    a = 1\n}\nethic_militarist = {\n    cost = 1\n}",
    );
    assert_eq!(defs.len(), 2);
    assert!(defs[0].allow_duplicate);
    assert!(defs[0].is_special_folder);
    assert_eq!(defs[1].value_type, ValueType::OverwrittenObjectSingleFile);
}

#[test]
fn stellaris_scripted_variables() {
    let defs = parse(
        GameType::Stellaris,
        "common/scripted_variables/00_vars.txt",
        "@tier1cost = 10\n@tier2cost = 20",
    );
    assert_eq!(ids(&defs), ["@tier1cost", "@tier2cost"]);
    assert!(defs.iter().all(|d| d.value_type == ValueType::SpecialVariable));
}

#[test]
fn stellaris_whole_text_is_tagged() {
    let defs = parse(
        GameType::Stellaris,
        "common/name_lists/HUM1.txt",
        "HUM1 = {\n    randomized = no\n    ship_names = { generic = { Alpha } }\n}",
    );
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].value_type, ValueType::WholeTextFile);
    assert_eq!(defs[0].id(), "HUM1.txt");
    assert!(defs[0].tags().contains(&"hum1".to_string()));
}

#[test]
fn stellaris_inline_script_ids() {
    let defs = parse(
        GameType::Stellaris,
        "common/megastructures/00_mega.txt",
        "mega = {\n    inline_script = {\n        script = megastructures/base\n        TYPE = nexus_storm\n    }\n}",
    );
    assert_eq!(defs[0].id(), "nexus_storm");
    assert!(defs[0].contains_inline_identifier);
}

#[test]
fn stellaris_inline_script_leaf_keeps_block_key() {
    let defs = parse(
        GameType::Stellaris,
        "common/megastructures/a.txt",
        "mega = {\n    inline_script = \"giga/base\"\n}",
    );
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].id(), "mega");
    assert_eq!(defs[0].value_type, ValueType::Object);
    assert!(defs[0].contains_inline_identifier);
}

#[test]
fn stellaris_namespaces_and_languages() {
    let defs = parse(
        GameType::Stellaris,
        "events/my_events.txt",
        "namespace = my_events\nlarge_title_font = {\n    languages = { l_russian l_polish }\n    size = 20\n}",
    );
    assert_eq!(defs[0].value_type, ValueType::Namespace);
    assert_eq!(defs[0].id(), "my_events-namespace");
    assert_eq!(defs[1].id(), "l_polish-l_russian-large_title_font");
}

#[test]
fn stellaris_solar_system_initializers_keep_block_keys() {
    let defs = parse(
        GameType::Stellaris,
        "common/solar_system_initializers/sol.txt",
        "@test = 1\nsol_system_initializer = {\n    name = \"NAME_Sol\"\n}\nsol_system_initializer2 = {\n    name = \"NAME_Sol\"\n}",
    );
    assert_eq!(ids(&defs), ["@test", "sol_system_initializer", "sol_system_initializer2"]);
    assert!(defs
        .iter()
        .all(|d| d.used_parser.as_deref() == Some("StellarisSolarSystemInitializersParser")));
    assert!(defs
        .iter()
        .all(|d| d.def_type() == "common/solar_system_initializers/txt"));
}

// =============================================================================
// Hearts of Iron IV
// =============================================================================

#[test]
fn hoi4_country_tags() {
    let defs = parse(
        GameType::Hoi4,
        "common/country_tags/00_countries.txt",
        "GER = \"countries/Germany.txt\"\nSOV = \"countries/Soviet Union.txt\"",
    );
    assert_eq!(ids(&defs), ["GER", "SOV"]);
    assert!(defs.iter().all(|d| d.value_type == ValueType::Object));
    assert_eq!(defs[1].order, 1);
}

#[test]
fn hoi4_bookmarks_and_characters() {
    let bookmarks = parse(
        GameType::Hoi4,
        "common/bookmarks/blitzkrieg.txt",
        "bookmarks = {\n    bookmark = {\n        name = BLITZKRIEG_NAME\n    }\n}",
    );
    assert_eq!(ids(&bookmarks), ["BLITZKRIEG_NAME"]);
    assert_eq!(bookmarks[0].used_parser.as_deref(), Some("HOI4KeyParser"));

    let characters = parse(
        GameType::Hoi4,
        "common/characters/ENG.txt",
        "characters = {\n    ENG_churchill = { name = x }\n}",
    );
    assert_eq!(ids(&characters), ["ENG_churchill"]);
    assert_eq!(characters[0].def_type(), "common/characters/characters/txt");
}

#[test]
fn hoi4_whole_text_file() {
    let defs = parse(
        GameType::Hoi4,
        "common/graphicalculturetype.txt",
        "western_european_gfx\neastern_european_gfx",
    );
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].value_type, ValueType::WholeTextFile);
}
