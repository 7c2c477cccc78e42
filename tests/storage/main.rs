//! Integration tests for the storage crate
//!
//! Tests for the indexed definition store, the hierarchy, and tag search.

mod hierarchy;
mod index;

use modscript_foundation::{Definition, path};

/// Builds a definition with file, type, id, and a tag for its id.
pub fn def(file: &str, id: &str, mod_name: &str) -> Definition {
    let mut def = Definition::new();
    def.set_file(file);
    def.set_type(path::format_type(file, None));
    def.set_id(id);
    def.set_code(format!("{id} = {{ value = 1 }}"));
    def.mod_name = mod_name.to_string();
    def.add_tag(id);
    def
}
