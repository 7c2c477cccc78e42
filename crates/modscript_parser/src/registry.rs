//! Parser registration and selection.
//!
//! A registry holds parsers in three families. Selection looks at the game
//! family first, then the generic family, and falls back to the default
//! parser. Within a family the highest priority wins and ties go to the
//! parser registered first, so the same registry always picks the same
//! parser for the same path.

use std::fmt;
use std::sync::Arc;

use modscript_foundation::Definition;
use tracing::debug;

use crate::args::{CanParseArgs, ParserArgs};
use crate::config::ParserConfig;
use crate::engine::{DefaultStrategy, ParserBase};
use crate::{generic, hoi4, stellaris};

/// The family a parser belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParserFamily {
    /// Game specific parsers. Consulted first.
    Game,
    /// Parsers shared by every game.
    Generic,
    /// The fallback parser.
    Default,
}

/// A definition parser.
///
/// `can_parse` must be pure. `parse` never fails: a file that cannot be
/// parsed yields a single `Invalid` definition.
pub trait DefinitionParser: Send + Sync {
    /// Returns the parser name, stamped into `used_parser`.
    fn name(&self) -> &str;

    /// Returns the parser family.
    fn family(&self) -> ParserFamily;

    /// Returns the selection priority. Higher wins. Among parsers of one
    /// family with equal priority, the one registered first wins.
    fn priority(&self) -> i32 {
        1
    }

    /// Returns true if this parser claims the file.
    fn can_parse(&self, args: &CanParseArgs) -> bool;

    /// Parses a file into definitions.
    fn parse(&self, args: &ParserArgs) -> Vec<Definition>;
}

// =============================================================================
// Default Parser
// =============================================================================

/// Runs the shared algorithm on top-level elements. Claims every file.
#[derive(Clone, Debug, Default)]
pub struct DefaultParser {
    base: ParserBase,
}

impl DefaultParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for DefaultParser {
    fn name(&self) -> &str {
        "DefaultParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Default
    }

    fn can_parse(&self, _args: &CanParseArgs) -> bool {
        true
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        self.base.engine.parse_root(args, &DefaultStrategy)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// An ordered set of parsers.
pub struct ParserRegistry {
    game: Vec<Box<dyn DefinitionParser>>,
    generic: Vec<Box<dyn DefinitionParser>>,
    default: Box<dyn DefinitionParser>,
}

impl ParserRegistry {
    /// Creates a registry with only a default parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            game: Vec::new(),
            generic: Vec::new(),
            default: Box::new(DefaultParser::new(config)),
        }
    }

    /// Creates a registry with every built-in parser.
    #[must_use]
    pub fn with_defaults(config: Arc<ParserConfig>) -> Self {
        let mut registry = Self::new(Arc::clone(&config));

        registry.register(stellaris::OverwrittenParser::new(Arc::clone(&config)));
        registry.register(stellaris::OverwrittenObjectWithPreserveFileNameParser::new(
            Arc::clone(&config),
        ));
        registry.register(stellaris::OverwrittenObjectSingleFileParser::new(
            Arc::clone(&config),
        ));
        registry.register(stellaris::ScriptedVariablesParser::new(Arc::clone(&config)));
        registry.register(stellaris::WholeTextParser::new(Arc::clone(&config)));
        registry.register(stellaris::FlagsParser::new(Arc::clone(&config)));
        registry.register(stellaris::ComponentTagsParser::new(Arc::clone(&config)));
        registry.register(stellaris::TerraformParser::new(Arc::clone(&config)));
        registry.register(stellaris::SolarSystemInitializersParser::new(Arc::clone(&config)));

        registry.register(hoi4::KeyParser::new(Arc::clone(&config)));
        registry.register(hoi4::InnerLayerParser::new(Arc::clone(&config)));
        registry.register(hoi4::KeyValuePairParser::new(Arc::clone(&config)));
        registry.register(hoi4::WholeTextParser::new(Arc::clone(&config)));

        registry.register(generic::GraphicsParser::new(Arc::clone(&config)));
        registry.register(generic::DefinesParser::new(Arc::clone(&config)));
        registry.register(generic::LocalizationParser::new(Arc::clone(&config)));
        registry.register(generic::WholeTextParser::new(Arc::clone(&config)));
        registry.register(generic::BinaryParser::new(Arc::clone(&config)));
        registry.register(generic::KeyParser::new(config));

        registry
    }

    /// Registers a parser. A `Default` family parser replaces the fallback.
    ///
    /// Registration order is the tie-break: a parser never displaces an
    /// earlier one of the same family and priority.
    pub fn register(&mut self, parser: impl DefinitionParser + 'static) {
        let parser: Box<dyn DefinitionParser> = Box::new(parser);
        match parser.family() {
            ParserFamily::Game => self.game.push(parser),
            ParserFamily::Generic => self.generic.push(parser),
            ParserFamily::Default => self.default = parser,
        }
    }

    /// Selects the parser for a file.
    ///
    /// The game family is searched first, then the generic family. Within a
    /// family the highest priority claiming parser wins and equal priorities
    /// resolve to the first registered. Falls back to the default parser.
    #[must_use]
    pub fn select(&self, args: &CanParseArgs) -> &dyn DefinitionParser {
        let parser = best_match(&self.game, args)
            .or_else(|| best_match(&self.generic, args))
            .unwrap_or(self.default.as_ref());
        debug!(file = %args.file, parser = parser.name(), "selected parser");
        parser
    }

    /// Returns every registered parser name, game family first.
    #[must_use]
    pub fn parser_names(&self) -> Vec<&str> {
        self.game
            .iter()
            .chain(&self.generic)
            .map(|parser| parser.name())
            .chain(std::iter::once(self.default.name()))
            .collect()
    }

    /// Returns the number of registered parsers, the default included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.game.len() + self.generic.len() + 1
    }

    /// Always false: a registry has a default parser.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults(Arc::default())
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.parser_names())
            .finish()
    }
}

/// The highest priority parser claiming the file.
///
/// Ties keep the earliest registered parser: a later parser only replaces
/// the current pick with a strictly higher priority.
fn best_match<'a>(
    parsers: &'a [Box<dyn DefinitionParser>],
    args: &CanParseArgs,
) -> Option<&'a dyn DefinitionParser> {
    let mut best: Option<&dyn DefinitionParser> = None;
    for parser in parsers.iter().filter(|parser| parser.can_parse(args)) {
        match best {
            Some(current) if parser.priority() <= current.priority() => {}
            _ => best = Some(parser.as_ref()),
        }
    }
    best
}
