//! Integration tests for Definition
//!
//! Tests derived fields, tags, file aliases, and content hash stability.

use modscript_foundation::{Definition, ValueType, path};
use proptest::prelude::*;

fn definition(file: &str, id: &str, code: &str) -> Definition {
    let mut def = Definition::new();
    def.set_file(file);
    def.set_type(path::format_type(file, None));
    def.set_id(id);
    def.set_code(code);
    def
}

// =============================================================================
// Derived Fields
// =============================================================================

#[test]
fn type_and_id_is_type_dash_id() {
    let def = definition("common/buildings/00_buildings.txt", "building_capital", "x = 1");
    assert_eq!(def.def_type(), "common/buildings/txt");
    assert_eq!(def.type_and_id(), "common/buildings/txt-building_capital");
}

#[test]
fn file_derives_case_insensitive_fields() {
    let def = definition("Common/Buildings/00_Buildings.txt", "a", "a = 1");
    assert_eq!(def.file_ci(), "common/buildings/00_buildings.txt");
    assert_eq!(def.parent_directory(), "Common/Buildings");
    assert_eq!(def.parent_directory_ci(), "common/buildings");
}

#[test]
fn virtual_path_drives_hierarchy_directory() {
    let mut def = definition("interface/replace/main.gui", "a", "a = 1");
    assert_eq!(def.hierarchy_directory(), "interface/replace");
    def.set_virtual_path(Some("interface/main.gui".to_string()));
    assert_eq!(def.hierarchy_directory(), "interface");
}

#[test]
fn additional_file_names_include_current_file() {
    let mut def = definition("common/a/a.txt", "a", "a = 1");
    def.add_additional_file_name("common/a/b.txt");
    let names = def.additional_file_names();
    assert!(names.contains("common/a/a.txt"));
    assert!(names.contains("common/a/b.txt"));
}

// =============================================================================
// Tags
// =============================================================================

#[test]
fn tags_are_lowercase_and_unique() {
    let mut def = Definition::new();
    def.add_tag("Foo");
    def.add_tag("foo");
    def.add_tag("  ");
    def.add_tag("Bar");
    assert_eq!(def.tags(), ["foo", "bar"]);
}

#[test]
fn is_match_uses_mod_and_id() {
    let mut def = definition("common/a/a.txt", "Some_Object", "a = 1");
    def.mod_name = "My Mod".to_string();
    assert!(def.is_match("my mod - some"));
    assert!(!def.is_match("some"));
}

// =============================================================================
// Content Hash
// =============================================================================

#[test]
fn hash_ignores_whitespace_layout() {
    let a = definition("common/a/a.txt", "foo", "foo = {\n    bar = 1\n}");
    let b = definition("common/a/a.txt", "foo", "foo   =   {\n\n\tbar=1\n   }");
    assert_eq!(a.definition_sha(), b.definition_sha());
}

#[test]
fn hash_changes_with_tokens() {
    let a = definition("common/a/a.txt", "foo", "foo = { bar = 1 }");
    let b = definition("common/a/a.txt", "foo", "foo = { bar = 2 }");
    assert_ne!(a.definition_sha(), b.definition_sha());
}

#[test]
fn hash_sees_whitespace_inside_quotes() {
    let a = definition("common/a/a.txt", "foo", "foo = { name = \"a  b\" }");
    let b = definition("common/a/a.txt", "foo", "foo = { name = \"a b\" }");
    let c = definition("common/a/a.txt", "foo", "foo={\n\tname =   \"a  b\"\n}");
    assert_ne!(a.definition_sha(), b.definition_sha());
    assert_eq!(a.definition_sha(), c.definition_sha());
}

#[test]
fn binary_hash_is_content_hash() {
    let mut def = definition("gfx/a.dds", "a.dds", "");
    def.value_type = ValueType::Binary;
    def.content_sha = "deadbeef".to_string();
    assert_eq!(def.definition_sha(), "deadbeef");
}

#[test]
fn hash_override_wins() {
    let mut def = definition("common/a/a.txt", "foo", "foo = 1");
    def.set_definition_sha(Some("override".to_string()));
    assert_eq!(def.definition_sha(), "override");
}

fn token() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}".prop_map(String::from)
}

fn padding() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(" "), Just("\t"), Just("\n")], 0..4)
        .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn hash_stable_under_padding(
        key in token(),
        inner in token(),
        value in token(),
        pads in prop::collection::vec(padding(), 6),
    ) {
        let plain = format!("{key} = {{ {inner} = {value} }}");
        let padded = format!(
            "{}{key}{} ={}{{{}{inner} ={}{value}{}}}",
            pads[0], pads[1], pads[2], pads[3], pads[4], pads[5]
        );
        let a = definition("common/a/a.txt", &key, &plain);
        let b = definition("common/a/a.txt", &key, &padded);
        prop_assert_eq!(a.definition_sha(), b.definition_sha());
    }

    #[test]
    fn hash_differs_when_value_differs(key in token(), a in token(), b in token()) {
        prop_assume!(a != b);
        let first = definition("common/a/a.txt", &key, &format!("{key} = {{ x = {a} }}"));
        let second = definition("common/a/a.txt", &key, &format!("{key} = {{ x = {b} }}"));
        prop_assert_ne!(first.definition_sha(), second.definition_sha());
    }
}
