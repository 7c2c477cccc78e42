//! Integration tests for code formatting
//!
//! Tests indentation, parent wrapping, and variable skipping.

use modscript_language::{FormatConfig, format_all, format_code, format_code_with_config, parse};

#[test]
fn four_space_indentation() {
    let elements = parse("foo={bar=1 baz={x=y}}").unwrap();
    assert_eq!(
        format_code(&elements[0], 0),
        "foo = {\n    bar = 1\n    baz = {\n        x = y\n    }\n}"
    );
}

#[test]
fn parent_wrapping() {
    let elements = parse("windowType = { name = main }").unwrap();
    let config = FormatConfig::default().with_parent_key("guiTypes");
    assert_eq!(
        format_code_with_config(&elements[0], &config),
        "guiTypes = {\n    windowType = {\n        name = main\n    }\n}"
    );
}

#[test]
fn skip_variables_drops_nested_variables() {
    let elements = parse("foo = { @x = 1 bar = @x }").unwrap();
    let config = FormatConfig::default().with_skip_variables(true);
    assert_eq!(
        format_code_with_config(&elements[0], &config),
        "foo = {\n    bar = @x\n}"
    );
}

#[test]
fn format_all_one_per_line() {
    let elements = parse("a = 1 b = 2").unwrap();
    assert_eq!(format_all(&elements), "a = 1\nb = 2");
}
