//! Integration tests for Error
//!
//! Tests constructors, positions, messages, and syntax fault detection.

use modscript_foundation::{Error, ErrorContext, ErrorKind};

#[test]
fn parse_error_carries_position() {
    let err = Error::parse_error("unexpected `}`", 3, 7, "a = }");
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.column(), Some(7));
    assert!(err.is_syntax_fault());
    assert!(err.to_string().contains("3:7"));
}

#[test]
fn validation_error_is_not_syntax_fault() {
    let err = Error::validation("unbalanced braces", Some(2), None);
    assert!(!err.is_syntax_fault());
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.column(), None);
}

#[test]
fn length_exceeded_reports_line() {
    let err = Error::length_exceeded(4, 120, 100);
    assert_eq!(err.line(), Some(4));
    assert!(matches!(err.kind, ErrorKind::LengthExceeded { limit: 100, .. }));
}

#[test]
fn cancelled_and_disposed() {
    assert!(matches!(Error::cancelled().kind, ErrorKind::Cancelled));
    assert!(matches!(Error::store_disposed().kind, ErrorKind::StoreDisposed));
}

#[test]
fn context_names_file_and_mod() {
    let err = Error::validation("unbalanced braces", Some(2), None)
        .with_context(ErrorContext::new("common/a/a.txt").with_mod("My Mod"));
    assert_eq!(err.context.as_ref().map(|c| c.file.as_str()), Some("common/a/a.txt"));
    assert_eq!(
        err.describe(),
        "common/a/a.txt (My Mod): validation error at line 2: unbalanced braces"
    );
}
