//! Integration tests for the tree builder
//!
//! Tests strict and tolerant parsing of Clausewitz script.

use modscript_language::{ScriptElement, parse, parse_tolerant};

#[test]
fn nested_blocks() {
    let elements = parse("foo = { bar = { baz = yes } count = 3 }").unwrap();
    assert_eq!(elements.len(), 1);
    let foo = &elements[0];
    assert_eq!(foo.key(), "foo");
    assert_eq!(foo.children().len(), 2);
    assert_eq!(foo.find_child("BAR").unwrap().child_value("baz"), Some("yes"));
    assert_eq!(foo.child_value("count"), Some("3"));
}

#[test]
fn variables_are_leaves() {
    let elements = parse("@cost = 10\nx = { a = @cost }").unwrap();
    assert!(elements[0].is_variable());
    assert!(!elements[1].is_variable());
}

#[test]
fn quoted_values_unquote() {
    let elements = parse("name = \"My Name\"").unwrap();
    assert_eq!(elements[0].value(), Some("\"My Name\""));
    assert_eq!(elements[0].unquoted_value(), Some("My Name"));
}

#[test]
fn value_lists_are_bare_leaves() {
    let elements = parse("list = { a b c }").unwrap();
    let children = elements[0].children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], ScriptElement::leaf("a", None, None));
}

#[test]
fn strict_rejects_unclosed_block() {
    let err = parse("a = {\n    b = 1\n").unwrap_err();
    assert!(err.is_syntax_fault());
    assert_eq!(err.line(), Some(1));
}

#[test]
fn strict_rejects_double_operator() {
    assert!(parse("a = = 1").is_err());
}

#[test]
fn tolerant_recovers() {
    let elements = parse_tolerant("a = {\n    b = 1\n").unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].child_value("b"), Some("1"));
}

#[test]
fn empty_source() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("\n# only comments\n").unwrap().is_empty());
}
