//! Integration tests for parser selection
//!
//! Selection is deterministic: the same registry picks the same parser for
//! the same path, and independent registries agree.

use modscript_parser::{CanParseArgs, GameType, ParserConfig, ParserRegistry};
use proptest::prelude::*;
use std::sync::Arc;

fn selected(registry: &ParserRegistry, file: &str, game: GameType) -> String {
    registry.select(&CanParseArgs::new(file, game)).name().to_string()
}

#[test]
fn table_of_selections() {
    let registry = ParserRegistry::default();
    let cases = [
        ("common/buildings/00_buildings.txt", GameType::Stellaris, "StellarisOverwrittenParser"),
        ("common/strategic_resources/00.txt", GameType::Stellaris, "StellarisOverwrittenObjectWithPreserveFileNameParser"),
        ("common/ship_sizes/00.txt", GameType::Stellaris, "StellarisOverwrittenObjectSingleFileParser"),
        ("common/scripted_variables/00.txt", GameType::Stellaris, "StellarisScriptedVariablesParser"),
        ("common/name_lists/HUM1.txt", GameType::Stellaris, "StellarisWholeTextParser"),
        ("flags/human/flag.dds", GameType::Stellaris, "StellarisFlagsParser"),
        ("flagsX/human/flag.dds", GameType::Stellaris, "GenericBinaryParser"),
        ("common/component_tags/00.txt", GameType::Stellaris, "StellarisComponentTagsParser"),
        ("common/terraform/00.txt", GameType::Stellaris, "StellarisTerraformParser"),
        ("common/solar_system_initializers/00.txt", GameType::Stellaris, "StellarisSolarSystemInitializersParser"),
        ("common/bookmarks/00.txt", GameType::Hoi4, "HOI4KeyParser"),
        ("common/characters/GER.txt", GameType::Hoi4, "HOI4InnerLayerParser"),
        ("common/country_tags/00.txt", GameType::Hoi4, "HOI4KeyValuePairParser"),
        ("common/graphicalculturetype.txt", GameType::Hoi4, "HOI4WholeTextParser"),
        ("interface/main.gui", GameType::Hoi4, "GenericGraphicsParser"),
        ("common/defines/00_defines.lua", GameType::Hoi4, "GenericDefinesParser"),
        ("common/on_actions/00.txt", GameType::Stellaris, "GenericWholeTextParser"),
        ("music/song.ogg", GameType::Other, "GenericBinaryParser"),
        ("localisation/english/a_l_english.yml", GameType::Hoi4, "GenericLocalizationParser"),
        ("events/my_events.txt", GameType::Stellaris, "DefaultParser"),
        ("common/buildings/00_buildings.txt", GameType::Hoi4, "DefaultParser"),
    ];
    for (file, game, expected) in cases {
        assert_eq!(selected(&registry, file, game), expected, "{file} ({game:?})");
    }
}

fn game() -> impl Strategy<Value = GameType> {
    prop_oneof![Just(GameType::Stellaris), Just(GameType::Hoi4), Just(GameType::Other)]
}

fn logical_path() -> impl Strategy<Value = String> {
    let directory = prop_oneof![
        Just("common/buildings"),
        Just("common/ethics"),
        Just("common/strategic_resources"),
        Just("common/bookmarks"),
        Just("common/defines"),
        Just("common"),
        Just("flags"),
        Just("interface"),
        Just("gfx/FX"),
        Just("events"),
    ];
    let extension = prop_oneof![
        Just("txt"),
        Just("gui"),
        Just("lua"),
        Just("dds"),
        Just("shader"),
    ];
    (directory, "[a-zA-Z0-9_]{1,10}", extension)
        .prop_map(|(dir, name, ext)| format!("{dir}/{name}.{ext}"))
}

proptest! {
    #[test]
    fn selection_is_deterministic(file in logical_path(), game in game()) {
        let first = ParserRegistry::with_defaults(Arc::new(ParserConfig::default()));
        let second = ParserRegistry::with_defaults(Arc::new(ParserConfig::default()));
        let a = selected(&first, &file, game);
        let b = selected(&first, &file, game);
        let c = selected(&second, &file, game);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }

    #[test]
    fn case_does_not_change_selection(file in logical_path(), game in game()) {
        let registry = ParserRegistry::default();
        prop_assert_eq!(
            selected(&registry, &file, game),
            selected(&registry, &file.to_uppercase(), game)
        );
    }
}
