//! Modscript - Clausewitz script parsing and definition indexing
//!
//! This crate re-exports all layers of the Modscript system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: modscript_parser     Definition parsers, strategies, registry, batches
//! Layer 1: modscript_language   Tokenizer, script tree, validation, formatting
//!          modscript_storage    Indexed definitions, hierarchy, tag search
//! Layer 0: modscript_foundation Core types (Definition, ValueType, Error)
//! ```

pub use modscript_foundation as foundation;
pub use modscript_language as language;
pub use modscript_parser as parser;
pub use modscript_storage as storage;
