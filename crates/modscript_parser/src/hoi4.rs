//! Hearts of Iron IV parsers.

use std::sync::Arc;

use modscript_foundation::{Definition, ValueType, path};
use modscript_language::ScriptElement;

use crate::args::{CanParseArgs, ParserArgs};
use crate::config::ParserConfig;
use crate::engine::{DefaultStrategy, DefinitionStrategy, ParserBase, add_generic_tags};
use crate::paths::hoi4::BOOKMARKS;
use crate::registry::{DefinitionParser, ParserFamily};

// =============================================================================
// Second Level
// =============================================================================

struct KeyStrategy {
    bookmark: bool,
}

impl DefinitionStrategy for KeyStrategy {
    fn eval_element_for_id(&self, element: &ScriptElement) -> Option<String> {
        if element.is_simple_type() {
            let key = element.key();
            if (self.bookmark && key.eq_ignore_ascii_case("name")) || key.eq_ignore_ascii_case("key") {
                return element.unquoted_value().map(str::to_string);
            }
        }
        DefaultStrategy.eval_element_for_id(element)
    }
}

/// Bookmarks and difficulty settings: second level objects identified by
/// their `key` (`name` for bookmarks).
#[derive(Clone, Debug, Default)]
pub struct KeyParser {
    base: ParserBase,
}

impl KeyParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for KeyParser {
    fn name(&self) -> &str {
        "HOI4KeyParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_hoi4() && self.base.config.hoi4.key.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let strategy = KeyStrategy {
            bookmark: path::starts_with(&args.file, BOOKMARKS),
        };
        self.base.engine.parse_second_level(args, &strategy)
    }
}

/// Abilities and characters: the top-level block is only a container.
#[derive(Clone, Debug, Default)]
pub struct InnerLayerParser {
    base: ParserBase,
}

impl InnerLayerParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for InnerLayerParser {
    fn name(&self) -> &str {
        "HOI4InnerLayerParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_hoi4() && self.base.config.hoi4.inner_layer.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        self.base.engine.parse_second_level(args, &DefaultStrategy)
    }
}

// =============================================================================
// Flat Lists
// =============================================================================

/// `common/country_tags`: every top-level entry, `GER = "countries/Germany.txt"`
/// included, is its own object.
#[derive(Clone, Debug, Default)]
pub struct KeyValuePairParser {
    base: ParserBase,
}

impl KeyValuePairParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for KeyValuePairParser {
    fn name(&self) -> &str {
        "HOI4KeyValuePairParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_hoi4() && self.base.config.hoi4.key_value_pair.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        let parsed = match engine.try_parse(args) {
            Ok(parsed) => parsed,
            Err(error) => return vec![engine.invalid_definition(args, &error)],
        };
        let definitions = parsed
            .elements
            .iter()
            .map(|element| {
                let mut definition = engine.new_definition(args, ValueType::Object);
                let id = DefaultStrategy.eval_definition_id(element.children(), element.key());
                definition.set_id(id.trim());
                let code = engine.format(element);
                definition.set_code(code.clone());
                definition.original_code = code;
                definition.add_tag(id.trim());
                add_generic_tags(&mut definition, element.children());
                definition
            })
            .collect();
        engine.finish(definitions, parsed.use_simple_validation)
    }
}

/// Whole text files such as `common/graphicalculturetype.txt`.
#[derive(Clone, Debug, Default)]
pub struct WholeTextParser {
    base: ParserBase,
}

impl WholeTextParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for WholeTextParser {
    fn name(&self) -> &str {
        "HOI4WholeTextParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_hoi4() && self.base.config.hoi4.whole_text.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        engine.finish(vec![engine.whole_text_definition(args, true)], false)
    }
}
