//! Definition parsers for Modscript.
//!
//! This crate provides:
//! - [`ParseEngine`] / [`DefinitionStrategy`] - The shared extraction algorithm and its hooks
//! - [`DefinitionParser`] / [`ParserRegistry`] - Parser families and deterministic selection
//! - [`ParserManager`] - Per-file dispatch and parallel batch parsing
//! - [`ParserConfig`] / [`PathTable`] - Path tables and flat-merge markers
//! - [`generic`], [`stellaris`], [`hoi4`] - The built-in parsers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod args;
pub mod config;
pub mod engine;
pub mod generic;
pub mod hoi4;
pub mod manager;
pub mod paths;
pub mod registry;
pub mod stellaris;

pub use args::{CanParseArgs, GameType, ParserArgs, ParserManagerArgs, ValidationType};
pub use config::{FlatMergeMarker, ParserConfig};
pub use engine::{DefaultStrategy, DefinitionStrategy, ParseEngine, ParsedFile};
pub use manager::ParserManager;
pub use paths::PathTable;
pub use registry::{DefaultParser, DefinitionParser, ParserFamily, ParserRegistry};
