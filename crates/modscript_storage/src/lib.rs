//! Indexed definition storage for Modscript.
//!
//! This crate provides:
//! - [`IndexedDefinitions`] - Concurrent multi-key index over definitions
//! - [`HierarchyMap`] - The directory → id browsing tree
//! - [`TagTrie`] - Tag prefix search
//! - [`KeySet`] - Reference-counted key sets with `im` snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod hierarchy;
pub mod index;
pub mod keys;
pub mod search;

pub use hierarchy::HierarchyMap;
pub use index::IndexedDefinitions;
pub use keys::KeySet;
pub use search::TagTrie;
