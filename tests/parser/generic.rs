//! Integration tests for the generic parsers
//!
//! Tests graphics, defines, localization, keyed objects, whole text, and
//! binary files through the manager.

use modscript_foundation::ValueType;
use modscript_parser::{GameType, ParserArgs, ParserManager, ParserManagerArgs};

use crate::{ids, parse};

#[test]
fn graphics_second_level_by_name() {
    let defs = parse(
        GameType::Stellaris,
        "interface/frontend.gui",
        "guiTypes = {\n    containerWindowType = {\n        name = \"mainmenu\"\n    }\n    windowType = {\n        name = \"options\"\n    }\n}",
    );
    assert_eq!(ids(&defs), ["mainmenu", "options"]);
    assert!(defs[0].code().starts_with("guiTypes = {"));
    assert_eq!(defs[0].code_tag.as_deref(), Some("guiTypes"));
}

#[test]
fn graphics_replace_folder() {
    let defs = parse(
        GameType::Stellaris,
        "interface/replace/frontend.gui",
        "guiTypes = {\n    windowType = { name = w }\n}",
    );
    assert_eq!(defs[0].virtual_path(), Some("interface/frontend.gui"));
}

#[test]
fn defines_script_and_lua() {
    let script = parse(
        GameType::Stellaris,
        "common/defines/00_defines.txt",
        "NGameplay = {\n    MAX_PLANETS = 10\n}",
    );
    assert_eq!(ids(&script), ["MAX_PLANETS"]);
    assert_eq!(script[0].value_type, ValueType::SpecialVariable);

    let lua = parse(
        GameType::Hoi4,
        "common/defines/00_defines.lua",
        "NDefines.NGame.START_DATE = \"1936.1.1.12\"",
    );
    assert_eq!(ids(&lua), ["START_DATE"]);
    assert_eq!(lua[0].used_parser.as_deref(), Some("GenericDefinesParser"));
}

#[test]
fn on_actions_are_whole_text() {
    let defs = parse(
        GameType::Stellaris,
        "common/on_actions/00_on_actions.txt",
        "on_game_start = {\n    events = { my.1 }\n}",
    );
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].value_type, ValueType::WholeTextFile);
    assert!(defs[0].tags().contains(&"on_game_start".to_string()));
}

#[test]
fn binary_files_use_content_hash() {
    let args = ParserArgs::new("gfx/models/ship.mesh", Vec::<String>::new()).with_content_sha("0a1b");
    let defs = ParserManager::default().parse(&ParserManagerArgs::new(args, GameType::Stellaris));
    assert_eq!(defs[0].value_type, ValueType::Binary);
    assert_eq!(defs[0].definition_sha(), "0a1b");
    assert_eq!(defs[0].def_type(), "gfx/models/binary");
}

#[test]
fn keyed_objects_take_their_generic_key() {
    let defs = parse(
        GameType::Hoi4,
        "events/germany.txt",
        "add_namespace = germany\ncountry_event = {\n    id = germany.1\n    title = x\n}",
    );
    assert_eq!(ids(&defs), ["germany-add_namespace", "germany.1"]);
    assert_eq!(defs[1].value_type, ValueType::Object);
    assert!(defs
        .iter()
        .all(|d| d.used_parser.as_deref() == Some("GenericKeyParser")));
}

#[test]
fn localization_through_manager() {
    let defs = parse(
        GameType::Stellaris,
        "localisation/english/my_mod_l_english.yml",
        "l_english:\n MY_KEY:0 \"Hello\"\n MY_OTHER_KEY:1 \"World\"",
    );
    assert_eq!(ids(&defs), ["MY_KEY", "MY_OTHER_KEY"]);
    assert!(defs.iter().all(|d| d.value_type == ValueType::SpecialVariable));
    assert_eq!(defs[0].used_parser.as_deref(), Some("GenericLocalizationParser"));
    assert_eq!(defs[1].type_and_id(), "localisation/english/l_english-yml-MY_OTHER_KEY");
    assert_eq!(defs[1].custom_priority_order, 1);
}

#[test]
fn localization_versions_do_not_change_the_hash() {
    let first = parse(
        GameType::Stellaris,
        "localisation/a_l_english.yml",
        "l_english:\n KEY:0 \"Same\"",
    );
    let second = parse(
        GameType::Stellaris,
        "localisation/english/b_l_english.yml",
        "l_english:\n KEY:7 \"Same\"",
    );
    assert_eq!(first[0].type_and_id(), second[0].type_and_id());
    assert_eq!(first[0].definition_sha(), second[0].definition_sha());
}
