//! End-to-end parsing tests
//!
//! Parses a small file into definitions and checks ids, types, codes, and
//! hash stability under whitespace padding.

use modscript::foundation::ValueType;
use modscript::parser::{GameType, ParserArgs, ParserManager, ParserManagerArgs};
use proptest::prelude::*;

fn parse_lines(lines: &[&str]) -> Vec<modscript::foundation::Definition> {
    let args = ParserArgs::new("common/test/file.txt", lines.iter().copied()).with_mod("Mod");
    ParserManager::default().parse(&ParserManagerArgs::new(args, GameType::Stellaris))
}

#[test]
fn object_and_variable() {
    let defs = parse_lines(&["foo = { bar = 1 }", "@myvar = 5"]);
    assert_eq!(defs.len(), 2);

    let foo = &defs[0];
    assert_eq!(foo.value_type, ValueType::Object);
    assert_eq!(foo.id(), "foo");
    assert_eq!(foo.def_type(), "common/test/txt");
    assert_eq!(foo.type_and_id(), "common/test/txt-foo");
    assert_eq!(foo.code(), "foo = {\n    bar = 1\n}");
    assert_eq!(foo.order, 0);
    assert!(!foo.use_simple_validation);

    let var = &defs[1];
    assert_eq!(var.value_type, ValueType::Variable);
    assert_eq!(var.id(), "@myvar");
    assert_eq!(var.code(), "@myvar = 5");
    assert_eq!(var.order, 1);
}

#[test]
fn padded_input_hashes_the_same() {
    let plain = parse_lines(&["foo = { bar = 1 }", "@myvar = 5"]);
    let padded = parse_lines(&["", "   foo   =   {", "\t bar=1", "   }", "", "@myvar   =   5   "]);
    assert_eq!(plain.len(), padded.len());
    for (a, b) in plain.iter().zip(&padded) {
        assert_eq!(a.type_and_id(), b.type_and_id());
        assert_eq!(a.definition_sha(), b.definition_sha());
    }
}

#[test]
fn changed_value_changes_hash() {
    let a = parse_lines(&["foo = { bar = 1 }"]);
    let b = parse_lines(&["foo = { bar = 2 }"]);
    assert_ne!(a[0].definition_sha(), b[0].definition_sha());
}

#[test]
fn nested_variables_are_lifted() {
    let defs = parse_lines(&["foo = {", "    @inner = 3", "    bar = @inner", "}"]);
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[1].id(), "@inner");
    assert!(!defs[0].original_code.contains("@inner = 3"));
    assert!(defs[0].code().contains("@inner = 3"));
}

proptest! {
    #[test]
    fn whitespace_never_changes_hashes(
        indent in "[ \t]{0,4}",
        gap in "[ ]{1,4}",
    ) {
        let plain = parse_lines(&["foo = { bar = 1 }", "@myvar = 5"]);
        let first = format!("{indent}foo{gap}={gap}{{");
        let second = format!("{indent}{indent}bar{gap}={gap}1");
        let fourth = format!("@myvar{gap}={gap}5");
        let padded = parse_lines(&[&first, &second, "}", &fourth]);
        prop_assert_eq!(plain.len(), padded.len());
        for (a, b) in plain.iter().zip(&padded) {
            prop_assert_eq!(a.definition_sha(), b.definition_sha());
        }
    }
}
