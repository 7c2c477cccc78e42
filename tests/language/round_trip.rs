//! Property tests for formatting round trips
//!
//! Formatting a tree and parsing the output again yields the same tree, and
//! formatting that tree again yields the same text. The generated trees
//! include operator-less blocks and `hsv`/`rgb` value blocks in every
//! position, alone or next to siblings.

use modscript_language::{ScriptElement, format_all, is_inline_operator, parse};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z][a-z0-9_]{0,6}".prop_map(String::from),
        1 => prop_oneof![Just("hsv"), Just("rgb")].prop_map(String::from),
    ]
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}"
            .prop_filter("inline keyword value", |value| !is_inline_operator(value))
            .prop_map(String::from),
        "-?[0-9]{1,4}".prop_map(String::from),
        "\"[a-zA-Z ]{0,8}\"".prop_map(String::from),
        "@[a-z]{1,5}".prop_map(String::from),
    ]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("="), Just("<"), Just(">"), Just(">="), Just("!=")]
}

fn block_operator() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(Some("=")), Just(None)]
}

fn element() -> impl Strategy<Value = ScriptElement> {
    let leaf = (key(), operator(), value())
        .prop_map(|(key, op, value)| ScriptElement::leaf(key, Some(op), Some(&value)));
    leaf.prop_recursive(4, 32, 5, |inner| {
        let plain = (key(), block_operator(), prop::collection::vec(inner.clone(), 0..5))
            .prop_map(|(key, op, children)| ScriptElement::block(key, op, children));
        let colors = prop::collection::vec(
            (prop_oneof![Just("hsv"), Just("rgb")], prop::collection::vec(inner, 0..3))
                .prop_map(|(key, children)| ScriptElement::block(key, None, children)),
            1..3,
        );
        let colored = (key(), block_operator(), colors)
            .prop_map(|(key, op, children)| ScriptElement::block(key, op, children));
        prop_oneof![plain, colored]
    })
}

proptest! {
    #[test]
    fn format_then_parse_yields_same_tree(elements in prop::collection::vec(element(), 0..6)) {
        let text = format_all(&elements);
        let parsed = parse(&text).unwrap();
        prop_assert_eq!(&parsed, &elements, "formatted:\n{}", text);
        prop_assert_eq!(format_all(&parsed), text);
    }

    #[test]
    fn parse_never_panics(source in "[a-z0-9 ={}\"#@\n<>]{0,200}") {
        let _ = parse(&source);
        let _ = modscript_language::parse_tolerant(&source);
    }
}
