//! The shared definition extraction algorithm.
//!
//! Every script parser runs the same pipeline:
//! 1. Parse the lines into a script tree, retrying once in simple mode on a
//!    syntax fault. A file that still fails becomes one `Invalid` definition.
//! 2. Classify the top-level (or second-level) elements into definitions.
//! 3. Serialize each element into `code` and `original_code`.
//! 4. Lift `@variables` nested inside blocks into their own definitions.
//! 5. Tag each definition for search.
//! 6. Stamp source order, validation mode and type.
//!
//! Parsers differ only in where ids come from and how results are
//! reclassified. Those points are the hooks of [`DefinitionStrategy`].

use std::sync::Arc;

use modscript_foundation::{Definition, Error, Result, ValueType, path};
use modscript_language::{CodeParser, FormatConfig, ScriptConfig, ScriptElement, unquote};
use tracing::warn;

use crate::args::{ParserArgs, ValidationType};
use crate::config::ParserConfig;
use crate::paths::{
    INLINE_SCRIPT_KEY, INLINE_SCRIPT_PARAMETER, LANGUAGES_KEY, is_generic_key, is_namespace_key,
};

/// Separator closing a definition wrapped in its parent block.
pub const CODE_SEPARATOR: &str = "}";

/// Hooks that specialize the shared algorithm.
///
/// Every method has a default. A strategy is built per call to `parse`, so
/// per-file state lives in the strategy's fields.
pub trait DefinitionStrategy {
    /// Returns the id a child element supplies, if it supplies one.
    ///
    /// By default a leaf keyed `id` supplies its value.
    fn eval_element_for_id(&self, element: &ScriptElement) -> Option<String> {
        if element.is_simple_type() && element.key().eq_ignore_ascii_case("id") {
            element.unquoted_value().map(str::to_string)
        } else {
            None
        }
    }

    /// Computes the id of a block from its children.
    fn eval_definition_id(&self, children: &[ScriptElement], default_id: &str) -> String {
        definition_id(self, children, default_id)
    }

    /// Returns the id of a block that only wraps an inline script.
    fn eval_for_inlines(&self, element: &ScriptElement) -> Option<String> {
        inline_script_id(element)
    }

    /// Adjusts a definition after it has been classified.
    fn post_classify(&self, _definition: &mut Definition, _element: &ScriptElement) {}
}

/// Strategy with every hook at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStrategy;

impl DefinitionStrategy for DefaultStrategy {}

/// The default id rule: the first child that supplies an id, otherwise the
/// block key, prefixed by the sorted locales of a `languages` child.
pub fn definition_id<S: DefinitionStrategy + ?Sized>(
    strategy: &S,
    children: &[ScriptElement],
    default_id: &str,
) -> String {
    let id = children
        .iter()
        .find_map(|child| strategy.eval_element_for_id(child))
        .unwrap_or_else(|| default_id.to_string());

    let languages = children
        .iter()
        .find(|child| !child.is_simple_type() && child.key().eq_ignore_ascii_case(LANGUAGES_KEY));
    match languages {
        Some(languages) => {
            let mut locales: Vec<&str> = languages
                .children()
                .iter()
                .map(|locale| unquote(locale.key()))
                .filter(|locale| !locale.is_empty())
                .collect();
            locales.sort_unstable();
            locales.dedup();
            if locales.is_empty() {
                id
            } else {
                format!("{}-{id}", locales.join("-"))
            }
        }
        None => id,
    }
}

/// Returns true if the block's sole child is an `inline_script`, either the
/// leaf form `inline_script = path` or the parameterized block form.
#[must_use]
pub fn wraps_inline_script(element: &ScriptElement) -> bool {
    matches!(element.children(), [only] if only.key().eq_ignore_ascii_case(INLINE_SCRIPT_KEY))
}

/// Returns the script parameter naming a block whose sole child is an
/// `inline_script` block.
///
/// `x = { inline_script = { script = s TYPE = nexus_storm } }` gives `nexus_storm`.
#[must_use]
pub fn inline_script_id(element: &ScriptElement) -> Option<String> {
    let [only] = element.children() else {
        return None;
    };
    if only.is_simple_type() || !only.key().eq_ignore_ascii_case(INLINE_SCRIPT_KEY) {
        return None;
    }
    only.children()
        .iter()
        .filter(|parameter| parameter.is_simple_type())
        .filter(|parameter| !parameter.key().eq_ignore_ascii_case(INLINE_SCRIPT_PARAMETER))
        .find_map(|parameter| parameter.unquoted_value())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Returns the type suffix of a file: its text extension without the dot,
/// or `txt`.
#[must_use]
pub fn type_suffix(file: &str) -> String {
    let extension = path::extension(file);
    if path::TEXT_EXTENSIONS.contains(&extension.as_str()) {
        extension.trim_start_matches('.').to_string()
    } else {
        "txt".to_string()
    }
}

/// A successfully parsed file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Top-level elements.
    pub elements: Vec<ScriptElement>,
    /// Whether simple mode was used.
    pub use_simple_validation: bool,
}

/// State shared by the built-in parsers: the configuration and an engine
/// built from its script settings.
#[derive(Clone, Debug)]
pub(crate) struct ParserBase {
    pub(crate) config: Arc<ParserConfig>,
    pub(crate) engine: ParseEngine,
}

impl ParserBase {
    pub(crate) fn new(config: Arc<ParserConfig>) -> Self {
        let engine = ParseEngine::new(config.script.clone());
        Self { config, engine }
    }
}

impl Default for ParserBase {
    fn default() -> Self {
        Self::new(Arc::default())
    }
}

/// Runs the shared algorithm on top of a [`CodeParser`].
#[derive(Clone, Debug, Default)]
pub struct ParseEngine {
    code_parser: CodeParser,
}

impl ParseEngine {
    /// Creates an engine with the given script configuration.
    #[must_use]
    pub const fn new(config: ScriptConfig) -> Self {
        Self {
            code_parser: CodeParser::new(config),
        }
    }

    /// Returns the underlying code parser.
    #[must_use]
    pub const fn code_parser(&self) -> &CodeParser {
        &self.code_parser
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parses a file into a script tree.
    ///
    /// A syntax fault in strict mode is logged and retried once in simple
    /// mode. Validation and length errors are not retried.
    ///
    /// # Errors
    /// Returns the fault that remains after the retry, with the file and
    /// mod attached as context.
    pub fn try_parse(&self, args: &ParserArgs) -> Result<ParsedFile> {
        self.parse_tree(args)
            .map_err(|error| error.with_context(args.error_context()))
    }

    fn parse_tree(&self, args: &ParserArgs) -> Result<ParsedFile> {
        let simple = match args.validation_type {
            ValidationType::SkipAll => {
                let result = self
                    .code_parser
                    .parse_script_without_validation(&args.lines, &args.file);
                return match result.error {
                    None => Ok(ParsedFile {
                        elements: result.elements,
                        use_simple_validation: result.use_simple_validation,
                    }),
                    Some(error) => Err(error),
                };
            }
            ValidationType::SimpleOnly => true,
            ValidationType::Full => self.code_parser.should_use_simple_check(&args.lines),
        };

        let result = self.code_parser.parse_script(&args.lines, &args.file, simple);
        match result.error {
            None => Ok(ParsedFile {
                elements: result.elements,
                use_simple_validation: result.use_simple_validation,
            }),
            Some(error) if error.is_syntax_fault() && !result.use_simple_validation => {
                warn!(
                    mod_name = %args.mod_name,
                    file = %args.file,
                    %error,
                    "syntax fault, retrying in simple mode"
                );
                let retry = self.code_parser.parse_script(&args.lines, &args.file, true);
                match retry.error {
                    None => Ok(ParsedFile {
                        elements: retry.elements,
                        use_simple_validation: true,
                    }),
                    Some(error) => Err(error),
                }
            }
            Some(error) => Err(error),
        }
    }

    /// Builds the `Invalid` definition standing in for a file that failed
    /// to parse.
    #[must_use]
    pub fn invalid_definition(&self, args: &ParserArgs, error: &Error) -> Definition {
        warn!(
            mod_name = %args.mod_name,
            file = %args.file,
            line = ?error.line(),
            column = ?error.column(),
            %error,
            "invalid definition"
        );
        let mut definition = self.new_definition(args, ValueType::Invalid);
        definition.set_type(path::format_type(&args.file, Some("invalid")));
        definition.set_id(args.file_name());
        let code = args.lines.join("\n");
        definition.set_code(code.clone());
        definition.original_code = code;
        definition.error_line = error.line();
        definition.error_column = error.column();
        definition.error_message = Some(error.message());
        definition.add_tag(&args.file_name());
        definition
    }

    // =========================================================================
    // Algorithm variants
    // =========================================================================

    /// Classifies top-level elements.
    #[must_use]
    pub fn parse_root<S: DefinitionStrategy + ?Sized>(
        &self,
        args: &ParserArgs,
        strategy: &S,
    ) -> Vec<Definition> {
        self.parse_with(args, |parsed| self.classify_root(args, strategy, &parsed.elements, false))
    }

    /// Classifies top-level elements, turning every top-level leaf with an
    /// operator into a variable.
    #[must_use]
    pub fn parse_complex_root<S: DefinitionStrategy + ?Sized>(
        &self,
        args: &ParserArgs,
        strategy: &S,
    ) -> Vec<Definition> {
        self.parse_with(args, |parsed| self.classify_root(args, strategy, &parsed.elements, true))
    }

    /// Classifies the block children of each top-level block.
    #[must_use]
    pub fn parse_second_level<S: DefinitionStrategy + ?Sized>(
        &self,
        args: &ParserArgs,
        strategy: &S,
    ) -> Vec<Definition> {
        self.parse_with(args, |parsed| {
            self.classify_second_level(args, strategy, &parsed.elements)
        })
    }

    fn parse_with<F>(&self, args: &ParserArgs, classify: F) -> Vec<Definition>
    where
        F: FnOnce(&ParsedFile) -> Vec<Definition>,
    {
        match self.try_parse(args) {
            Ok(parsed) => {
                let definitions = classify(&parsed);
                self.finish(definitions, parsed.use_simple_validation)
            }
            Err(error) => vec![self.invalid_definition(args, &error)],
        }
    }

    /// Classifies top-level elements without finishing them.
    #[must_use]
    pub fn classify_root<S: DefinitionStrategy + ?Sized>(
        &self,
        args: &ParserArgs,
        strategy: &S,
        elements: &[ScriptElement],
        complex: bool,
    ) -> Vec<Definition> {
        let mut definitions = Vec::new();
        for element in elements {
            if element.is_simple_type() {
                if let Some(mut definition) = self.classify_leaf(args, element, complex) {
                    strategy.post_classify(&mut definition, element);
                    definitions.push(definition);
                }
                continue;
            }
            let mut definition = self.object_definition(args, strategy, element, None);
            strategy.post_classify(&mut definition, element);
            definitions.push(definition);
            self.lift_variables(args, element, None, &mut definitions);
        }
        definitions
    }

    /// Classifies second-level elements without finishing them.
    #[must_use]
    pub fn classify_second_level<S: DefinitionStrategy + ?Sized>(
        &self,
        args: &ParserArgs,
        strategy: &S,
        elements: &[ScriptElement],
    ) -> Vec<Definition> {
        let mut definitions = Vec::new();
        for element in elements {
            if element.is_simple_type() {
                if let Some(mut definition) = self.classify_leaf(args, element, false) {
                    strategy.post_classify(&mut definition, element);
                    definitions.push(definition);
                }
                continue;
            }
            let parent = element.key();
            for child in element.children() {
                if child.is_simple_type() {
                    if child.is_variable() {
                        let mut definition = self.variable_definition(args, child);
                        strategy.post_classify(&mut definition, child);
                        definitions.push(definition);
                    }
                    continue;
                }
                let mut definition = self.object_definition(args, strategy, child, Some(parent));
                strategy.post_classify(&mut definition, child);
                definitions.push(definition);
                self.lift_variables(args, child, Some(parent), &mut definitions);
            }
        }
        definitions
    }

    /// Stamps source order and validation mode, and fills in missing types.
    #[must_use]
    pub fn finish(
        &self,
        mut definitions: Vec<Definition>,
        use_simple_validation: bool,
    ) -> Vec<Definition> {
        for (order, definition) in definitions.iter_mut().enumerate() {
            definition.order = order;
            definition.use_simple_validation = use_simple_validation;
            if definition.def_type().is_empty() {
                let def_type = path::format_type(definition.file(), None);
                definition.set_type(def_type);
            }
        }
        definitions
    }

    // =========================================================================
    // Definition builders
    // =========================================================================

    /// Creates a definition carrying the file's provenance and default type.
    #[must_use]
    pub fn new_definition(&self, args: &ParserArgs, value_type: ValueType) -> Definition {
        let mut definition = Definition::new();
        definition.set_file(args.file.clone());
        definition.set_type(path::format_type(&args.file, None));
        definition.mod_name.clone_from(&args.mod_name);
        definition.dependencies.clone_from(&args.dependencies);
        definition.content_sha.clone_from(&args.content_sha);
        definition.is_from_game = args.is_from_game;
        definition.value_type = value_type;
        definition
    }

    /// Creates the single definition for a whole file.
    ///
    /// With `tagged`, the cleaned code is parsed tolerantly and the top-level
    /// keys and generic-key values become tags. Tagging never fails the file.
    #[must_use]
    pub fn whole_text_definition(&self, args: &ParserArgs, tagged: bool) -> Definition {
        let mut definition = self.new_definition(args, ValueType::WholeTextFile);
        let file_name = args.file_name();
        definition.set_id(file_name.clone());
        let code = args.lines.join("\n");
        definition.set_code(code.clone());
        definition.original_code = code;
        definition.add_tag(&file_name);
        if tagged {
            let cleaned = self.code_parser.clean_code(&args.file, &args.lines);
            let result = self
                .code_parser
                .parse_script_without_validation(&cleaned, &args.file);
            for element in &result.elements {
                if element.is_simple_type() {
                    continue;
                }
                definition.add_tag(unquote(element.key()));
                add_generic_tags(&mut definition, element.children());
            }
        }
        definition
    }

    /// Creates the definition for a binary file. Its hash is the content hash.
    #[must_use]
    pub fn binary_definition(&self, args: &ParserArgs) -> Definition {
        let mut definition = self.new_definition(args, ValueType::Binary);
        definition.set_type(path::format_type(&args.file, Some("binary")));
        let file_name = args.file_name();
        definition.set_id(file_name.clone());
        definition.set_code("");
        definition.add_tag(&file_name);
        definition
    }

    /// Creates a variable from a leaf.
    #[must_use]
    pub fn variable_definition(&self, args: &ParserArgs, element: &ScriptElement) -> Definition {
        let mut definition = self.new_definition(args, ValueType::Variable);
        definition.set_id(element.key());
        let code = self.format(element);
        definition.set_code(code.clone());
        definition.original_code = code;
        definition.add_tag(element.key());
        definition
    }

    /// Creates a namespace from a `namespace = value` leaf.
    #[must_use]
    pub fn namespace_definition(&self, args: &ParserArgs, element: &ScriptElement) -> Definition {
        let mut definition = self.new_definition(args, ValueType::Namespace);
        let value = element.unquoted_value().unwrap_or_default();
        definition.set_id(format!("{value}-{}", element.key()));
        let code = self.format(element);
        definition.set_code(code.clone());
        definition.original_code = code;
        definition.add_tag(value);
        definition
    }

    /// Creates an object from a block. With `parent`, the code is wrapped in
    /// the parent block and the type gains the parent key.
    #[must_use]
    pub fn object_definition<S: DefinitionStrategy + ?Sized>(
        &self,
        args: &ParserArgs,
        strategy: &S,
        element: &ScriptElement,
        parent: Option<&str>,
    ) -> Definition {
        let mut definition = self.new_definition(args, ValueType::Object);

        let inline_id = strategy.eval_for_inlines(element);
        definition.contains_inline_identifier = inline_id.is_some() || wraps_inline_script(element);
        let id = inline_id
            .unwrap_or_else(|| strategy.eval_definition_id(element.children(), element.key()));
        let id = if id.is_empty() { args.file_name() } else { id };
        definition.set_id(id.clone());

        let mut config = FormatConfig::default();
        if let Some(parent) = parent {
            config = config.with_parent_key(parent);
            definition.set_type(path::format_type(
                &args.file,
                Some(&format!("{parent}/{}", type_suffix(&args.file))),
            ));
            definition.code_tag = Some(parent.to_string());
            definition.code_separator = Some(CODE_SEPARATOR.to_string());
        }
        definition.set_code(self.code_parser.format_code_with_config(element, &config));
        definition.original_code = self
            .code_parser
            .format_code_with_config(element, &config.with_skip_variables(true));

        definition.add_tag(&id);
        add_generic_tags(&mut definition, element.children());
        definition
    }

    /// Classifies a top-level leaf. Returns `None` for leaves that do not
    /// produce a definition.
    fn classify_leaf(
        &self,
        args: &ParserArgs,
        element: &ScriptElement,
        complex: bool,
    ) -> Option<Definition> {
        if element.is_variable() {
            return Some(self.variable_definition(args, element));
        }
        if is_namespace_key(element.key()) && element.value().is_some() {
            return Some(self.namespace_definition(args, element));
        }
        if element.key().eq_ignore_ascii_case(INLINE_SCRIPT_KEY) {
            let target = element.unquoted_value().filter(|v| !v.is_empty())?;
            let mut definition = self.new_definition(args, ValueType::Object);
            definition.set_id(target);
            definition.contains_inline_identifier = true;
            let code = self.format(element);
            definition.set_code(code.clone());
            definition.original_code = code;
            definition.add_tag(target);
            return Some(definition);
        }
        if complex && element.operator().is_some() {
            return Some(self.variable_definition(args, element));
        }
        None
    }

    /// Emits a variable definition for every `@` leaf nested in a block.
    fn lift_variables(
        &self,
        args: &ParserArgs,
        element: &ScriptElement,
        parent: Option<&str>,
        out: &mut Vec<Definition>,
    ) {
        for child in element.children() {
            if child.is_variable() {
                let mut definition = self.variable_definition(args, child);
                if let Some(parent) = parent {
                    definition.code_tag = Some(parent.to_string());
                }
                out.push(definition);
            } else if !child.is_simple_type() {
                self.lift_variables(args, child, parent, out);
            }
        }
    }

    /// Formats an element at indentation zero.
    #[must_use]
    pub fn format(&self, element: &ScriptElement) -> String {
        self.code_parser.format_code(element, 0)
    }

    /// Formats an element with nested variables omitted.
    #[must_use]
    pub fn format_original(&self, element: &ScriptElement) -> String {
        self.code_parser
            .format_code_with_config(element, &FormatConfig::default().with_skip_variables(true))
    }
}

/// Tags a definition with the values of immediate children keyed by a
/// generic key.
pub fn add_generic_tags(definition: &mut Definition, children: &[ScriptElement]) {
    for child in children {
        if child.is_simple_type() && is_generic_key(child.key()) {
            if let Some(value) = child.unquoted_value() {
                definition.add_tag(value);
            }
        }
    }
}
