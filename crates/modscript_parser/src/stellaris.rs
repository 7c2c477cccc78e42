//! Stellaris parsers.
//!
//! Most Stellaris folders merge per object id and go through the default
//! parser. The folders here either merge per file (the overwritten
//! variants), are compared as whole files, or need a different id rule.

use std::sync::Arc;

use modscript_foundation::{Definition, ValueType, path};
use modscript_language::ScriptElement;

use crate::args::{CanParseArgs, ParserArgs};
use crate::config::ParserConfig;
use crate::engine::{DefaultStrategy, DefinitionStrategy, ParserBase};
use crate::paths::{is_generic_key, stellaris::PLANET_CLASSES};
use crate::registry::{DefinitionParser, ParserFamily};

/// Reclassifies `Object` results as `target`.
struct Reclassify {
    target: ValueType,
}

impl DefinitionStrategy for Reclassify {
    fn post_classify(&self, definition: &mut Definition, _element: &ScriptElement) {
        if definition.value_type == ValueType::Object {
            definition.value_type = self.target;
        }
    }
}

// =============================================================================
// Overwritten Objects
// =============================================================================

struct OverwrittenStrategy {
    generic_ids: bool,
}

impl DefinitionStrategy for OverwrittenStrategy {
    fn eval_element_for_id(&self, element: &ScriptElement) -> Option<String> {
        if self.generic_ids && element.is_simple_type() && is_generic_key(element.key()) {
            return element.unquoted_value().map(str::to_string);
        }
        DefaultStrategy.eval_element_for_id(element)
    }

    fn post_classify(&self, definition: &mut Definition, element: &ScriptElement) {
        Reclassify {
            target: ValueType::OverwrittenObject,
        }
        .post_classify(definition, element);
    }
}

/// Folders where the last file to define an object wins: jobs, traits,
/// districts, planet classes, buildings and similar.
///
/// Planet classes take their id from a generic key child when present.
#[derive(Clone, Debug, Default)]
pub struct OverwrittenParser {
    base: ParserBase,
}

impl OverwrittenParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for OverwrittenParser {
    fn name(&self) -> &str {
        "StellarisOverwrittenParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.overwritten.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let strategy = OverwrittenStrategy {
            generic_ids: path::starts_with(&args.file, PLANET_CLASSES),
        };
        self.base.engine.parse_root(args, &strategy)
    }
}

/// Overwritten objects whose file name must be kept when merged.
#[derive(Clone, Debug, Default)]
pub struct OverwrittenObjectWithPreserveFileNameParser {
    base: ParserBase,
}

impl OverwrittenObjectWithPreserveFileNameParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for OverwrittenObjectWithPreserveFileNameParser {
    fn name(&self) -> &str {
        "StellarisOverwrittenObjectWithPreserveFileNameParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.preserve_file_name.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let strategy = Reclassify {
            target: ValueType::OverwrittenObjectWithPreserveFileName,
        };
        self.base.engine.parse_root(args, &strategy)
    }
}

struct SingleFileStrategy<'a> {
    config: &'a ParserConfig,
    directory: String,
}

impl SingleFileStrategy<'_> {
    /// A block is flat-merged when every child uses the same configured
    /// marker key.
    fn is_flat_merge(&self, element: &ScriptElement) -> bool {
        let children = element.children();
        if children.is_empty() {
            return false;
        }
        self.config.flat_merge_keys(&self.directory).any(|marker| {
            children
                .iter()
                .all(|child| child.key().eq_ignore_ascii_case(marker))
        })
    }
}

impl DefinitionStrategy for SingleFileStrategy<'_> {
    fn post_classify(&self, definition: &mut Definition, element: &ScriptElement) {
        if definition.value_type != ValueType::Object {
            return;
        }
        definition.value_type = ValueType::OverwrittenObjectSingleFile;
        if self.config.allows_duplicate(&self.directory, definition.id()) {
            definition.allow_duplicate = true;
        }
        if self.is_flat_merge(element) {
            definition.flat_merge = true;
        }
    }
}

/// Folders the game reads as if they were one file: ethics, starbase
/// modules, ship sizes, strategic resources and authorities.
#[derive(Clone, Debug, Default)]
pub struct OverwrittenObjectSingleFileParser {
    base: ParserBase,
}

impl OverwrittenObjectSingleFileParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for OverwrittenObjectSingleFileParser {
    fn name(&self) -> &str {
        "StellarisOverwrittenObjectSingleFileParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.single_file.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let strategy = SingleFileStrategy {
            config: &self.base.config,
            directory: args.directory(),
        };
        let mut definitions = self.base.engine.parse_root(args, &strategy);
        for definition in &mut definitions {
            definition.is_special_folder = true;
        }
        definitions
    }
}

// =============================================================================
// Variables
// =============================================================================

/// `common/scripted_variables`: every top-level assignment is a variable
/// with a higher merge priority than ordinary variables.
#[derive(Clone, Debug, Default)]
pub struct ScriptedVariablesParser {
    base: ParserBase,
}

impl ScriptedVariablesParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for ScriptedVariablesParser {
    fn name(&self) -> &str {
        "StellarisScriptedVariablesParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.scripted_variables.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let mut definitions = self.base.engine.parse_complex_root(args, &DefaultStrategy);
        for definition in &mut definitions {
            if definition.value_type == ValueType::Variable {
                definition.value_type = ValueType::SpecialVariable;
            }
        }
        definitions
    }
}

// =============================================================================
// Whole Files
// =============================================================================

/// Folders compared as whole files: name lists, galaxy maps, portraits,
/// diplomatic phrases and similar.
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
        "StellarisWholeTextParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.whole_text.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        engine.finish(vec![engine.whole_text_definition(args, true)], false)
    }
}

/// Country flags: images are binary, the color and flag lists are whole
/// text.
#[derive(Clone, Debug, Default)]
pub struct FlagsParser {
    base: ParserBase,
}

impl FlagsParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for FlagsParser {
    fn name(&self) -> &str {
        "StellarisFlagsParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.flags.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        let definition = if path::is_text_file(&args.file) {
            engine.whole_text_definition(args, false)
        } else {
            engine.binary_definition(args)
        };
        engine.finish(vec![definition], false)
    }
}

// =============================================================================
// Line Oriented
// =============================================================================

/// `common/component_tags`: a bare list of tags, one per line. Each line is
/// its own variable.
#[derive(Clone, Debug, Default)]
pub struct ComponentTagsParser {
    base: ParserBase,
}

impl ComponentTagsParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for ComponentTagsParser {
    fn name(&self) -> &str {
        "StellarisComponentTagsParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.component_tags.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        let definitions = engine
            .code_parser()
            .clean_code(&args.file, &args.lines)
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| {
                let mut definition = engine.new_definition(args, ValueType::Variable);
                definition.set_id(line);
                definition.set_code(line);
                definition.original_code = line.to_string();
                definition.add_tag(line);
                definition
            })
            .collect();
        engine.finish(definitions, false)
    }
}

// =============================================================================
// Paired Keys
// =============================================================================

struct TerraformStrategy;

impl DefinitionStrategy for TerraformStrategy {
    fn eval_definition_id(&self, children: &[ScriptElement], default_id: &str) -> String {
        let side = |key: &str| {
            children
                .iter()
                .filter(|child| child.is_simple_type() && child.key().eq_ignore_ascii_case(key))
                .find_map(ScriptElement::unquoted_value)
                .filter(|value| !value.is_empty())
        };
        match (side("from"), side("to")) {
            (Some(from), Some(to)) => format!("{from}-{to}"),
            (Some(one), None) | (None, Some(one)) => one.to_string(),
            (None, None) => default_id.to_string(),
        }
    }
}

/// `common/terraform`: links are identified by their `from`/`to` pair.
#[derive(Clone, Debug, Default)]
pub struct TerraformParser {
    base: ParserBase,
}

impl TerraformParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for TerraformParser {
    fn name(&self) -> &str {
        "StellarisTerraformParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris() && self.base.config.stellaris.terraform.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        self.base.engine.parse_root(args, &TerraformStrategy)
    }
}

// =============================================================================
// Block Keys
// =============================================================================

struct BlockKeyStrategy;

impl DefinitionStrategy for BlockKeyStrategy {
    fn eval_element_for_id(&self, _element: &ScriptElement) -> Option<String> {
        None
    }
}

/// `common/solar_system_initializers`: initializers carry a display `name`
/// that several of them share, so the block key is always the id.
#[derive(Clone, Debug, Default)]
pub struct SolarSystemInitializersParser {
    base: ParserBase,
}

impl SolarSystemInitializersParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for SolarSystemInitializersParser {
    fn name(&self) -> &str {
        "StellarisSolarSystemInitializersParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Game
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        args.is_stellaris()
            && self
                .base
                .config
                .stellaris
                .solar_system_initializers
                .matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        self.base.engine.parse_root(args, &BlockKeyStrategy)
    }
}
