//! Core types, definitions, and errors for Modscript.
//!
//! This crate provides:
//! - [`Definition`] - The atomic, hashable unit of parsed script content
//! - [`HierarchicalDefinition`] - Directory → id tree nodes for conflict browsing
//! - [`ValueType`] / [`ResetType`] - Definition classification
//! - [`Error`] - Rich error types with context
//! - [`path`] / [`text`] - Logical path and whitespace helpers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod definition;
pub mod error;
pub mod hierarchy;
pub mod path;
pub mod text;
pub mod types;

pub use definition::{Definition, sha256_hex};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use hierarchy::HierarchicalDefinition;
pub use types::{ResetType, ValueType};
