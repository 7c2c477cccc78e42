//! Integration tests for the foundation crate
//!
//! Tests for definitions, content hashing, errors, and logical paths.

mod definitions;
mod errors;
