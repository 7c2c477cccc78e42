//! Integration tests for the script language crate
//!
//! Tests for the lexer, the tree builder, validation, formatting, and the
//! code parser facade.

mod formatting;
mod parser;
mod round_trip;
