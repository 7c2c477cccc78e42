//! Parser selection and batch parsing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use modscript_foundation::{Definition, Error, Result};
use modscript_storage::IndexedDefinitions;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::args::ParserManagerArgs;
use crate::config::ParserConfig;
use crate::registry::ParserRegistry;

/// Selects a parser per file and stamps the results with its name.
#[derive(Debug, Default)]
pub struct ParserManager {
    registry: ParserRegistry,
}

impl ParserManager {
    /// Creates a manager with every built-in parser.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self {
            registry: ParserRegistry::with_defaults(Arc::new(config)),
        }
    }

    /// Creates a manager over an existing registry.
    #[must_use]
    pub const fn with_registry(registry: ParserRegistry) -> Self {
        Self { registry }
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Parses one file.
    #[must_use]
    pub fn parse(&self, args: &ParserManagerArgs) -> Vec<Definition> {
        let parser = self.registry.select(&args.can_parse_args());
        let mut definitions = parser.parse(&args.parser_args);
        for definition in &mut definitions {
            definition.used_parser = Some(parser.name().to_string());
        }
        trace!(
            file = %args.parser_args.file,
            parser = parser.name(),
            count = definitions.len(),
            "parsed file"
        );
        definitions
    }

    /// Parses many files in parallel. Results keep input order.
    ///
    /// `cancel` is checked before each file.
    ///
    /// # Errors
    /// Returns `Cancelled` once `cancel` is set, naming the first file that
    /// saw it.
    pub fn parse_batch(
        &self,
        files: &[ParserManagerArgs],
        cancel: &AtomicBool,
    ) -> Result<Vec<Definition>> {
        debug!(files = files.len(), "parsing batch");
        let parsed = files
            .par_iter()
            .map(|args| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(Error::cancelled().with_context(args.parser_args.error_context()));
                }
                Ok(self.parse(args))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parsed.into_iter().flatten().collect())
    }

    /// Parses many files in parallel and adds each file's definitions to
    /// `store` as the file completes.
    ///
    /// # Errors
    /// Returns `Cancelled` once `cancel` is set, or `StoreDisposed` if the
    /// store was disposed. Files added before the error stay in the store.
    pub fn parse_into(
        &self,
        files: &[ParserManagerArgs],
        store: &IndexedDefinitions,
        cancel: &AtomicBool,
    ) -> Result<()> {
        debug!(files = files.len(), "parsing batch into store");
        files.par_iter().try_for_each(|args| {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::cancelled().with_context(args.parser_args.error_context()));
            }
            for definition in self.parse(args) {
                store
                    .add_to_map(definition, false)
                    .map_err(|error| error.with_context(args.parser_args.error_context()))?;
            }
            Ok(())
        })
    }
}
