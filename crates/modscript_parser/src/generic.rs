//! Parsers shared by every game.

use std::sync::{Arc, LazyLock};

use modscript_foundation::{Definition, Error, ValueType, path, text};
use modscript_language::{FormatConfig, Lexer, ScriptElement, TokenKind, unquote};
use regex::Regex;

use crate::args::{CanParseArgs, ParserArgs, ValidationType};
use crate::config::ParserConfig;
use crate::engine::{
    CODE_SEPARATOR, DefaultStrategy, DefinitionStrategy, ParserBase, add_generic_tags,
};
use crate::paths::generic::{COMMON_ROOT, REPLACE_FOLDER, SOUND_PREFIX};
use crate::paths::is_generic_key;
use crate::paths::localization::{
    LOCALE_PREFIX, LOCALES, NORMALIZED_VERSION, SEPARATOR, TYPE_SUFFIX,
};
use crate::registry::{DefinitionParser, ParserFamily};

// =============================================================================
// Whole Text
// =============================================================================

/// Files that are compared as a whole: shaders, `on_actions`, sound text
/// files and files directly in `common`.
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
        "GenericWholeTextParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Generic
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        self.base.config.generic.whole_text.matches(&args.file)
            || (path::starts_with(&args.file, SOUND_PREFIX) && path::is_text_file(&args.file))
            || path::equals(&args.directory(), COMMON_ROOT)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        engine.finish(vec![engine.whole_text_definition(args, true)], false)
    }
}

// =============================================================================
// Binary
// =============================================================================

/// Files without a text extension. They are compared by content hash.
#[derive(Clone, Debug, Default)]
pub struct BinaryParser {
    base: ParserBase,
}

impl BinaryParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for BinaryParser {
    fn name(&self) -> &str {
        "GenericBinaryParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Generic
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        !path::is_text_file(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        engine.finish(vec![engine.binary_definition(args)], false)
    }
}

// =============================================================================
// Graphics
// =============================================================================

struct GraphicsStrategy;

impl DefinitionStrategy for GraphicsStrategy {
    fn eval_element_for_id(&self, element: &ScriptElement) -> Option<String> {
        if element.is_simple_type() && element.key().eq_ignore_ascii_case("name") {
            return element.unquoted_value().map(str::to_string);
        }
        None
    }
}

/// `.gui` and `.gfx` files, split at the second level and identified by
/// their `name`.
///
/// Files in a `replace` folder override the file of the same name one
/// folder up, so they get a virtual path there.
#[derive(Clone, Debug, Default)]
pub struct GraphicsParser {
    base: ParserBase,
}

impl GraphicsParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }
}

impl DefinitionParser for GraphicsParser {
    fn name(&self) -> &str {
        "GenericGraphicsParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Generic
    }

    fn priority(&self) -> i32 {
        2
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        self.base.config.generic.graphics.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let mut definitions = self.base.engine.parse_second_level(args, &GraphicsStrategy);
        let directory = args.directory();
        if let Some(target) = directory.strip_suffix(&format!("/{REPLACE_FOLDER}")) {
            let virtual_path = format!("{target}/{}", args.file_name());
            for definition in &mut definitions {
                definition.set_virtual_path(Some(virtual_path.clone()));
                definition.set_type(path::format_type(&virtual_path, None));
            }
        }
        definitions
    }
}

// =============================================================================
// Defines
// =============================================================================

static COMMA_BEFORE_BRACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[,;](\s*\})").ok());

static COMMA_AFTER_BRACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\}\s*)[,;]").ok());

fn replace_all(pattern: &LazyLock<Option<Regex>>, text: &str) -> String {
    match pattern.as_ref() {
        Some(regex) => regex.replace_all(text, "$1").into_owned(),
        None => text.to_string(),
    }
}

/// Removes `,` and `;` that are not inside a braced list, that is, whose
/// next brace is not a `}`. Quoted text is left alone.
fn strip_loose_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut closes_next = vec![false; chars.len()];
    let mut inside = false;
    for (index, c) in chars.iter().enumerate().rev() {
        match c {
            '}' => inside = true,
            '{' => inside = false,
            _ => {}
        }
        closes_next[index] = inside;
    }

    let mut out = String::with_capacity(text.len());
    let mut in_quote = false;
    for (index, &c) in chars.iter().enumerate() {
        match c {
            '"' => in_quote = !in_quote,
            '\n' => in_quote = false,
            ',' | ';' if !in_quote && !closes_next[index] => continue,
            _ => {}
        }
        out.push(c);
    }
    out
}

/// A Lua defines file is complex when its first assignment does not use dot
/// notation, as in `NDefines = { NGame = { ... } }`.
fn is_complex_lua(lines: &[String]) -> bool {
    lines
        .iter()
        .find(|line| line.contains('='))
        .and_then(|line| line.split('=').find(|part| !part.is_empty()))
        .is_some_and(|key| !key.contains('.'))
}

/// Engine defines: dot-notation Lua files, nested Lua tables and plain
/// `NGroup = { KEY = value }` script files.
///
/// Every value becomes a `SpecialVariable` typed by its group.
#[derive(Clone, Debug, Default)]
pub struct DefinesParser {
    base: ParserBase,
}

impl DefinesParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }

    /// Rewrites Lua defines into script syntax: comments, separators and
    /// anything after the last closing brace of a complex file are dropped.
    #[must_use]
    pub fn clean_lua(&self, args: &ParserArgs) -> Vec<String> {
        let code_parser = self.base.engine.code_parser();
        let complex = is_complex_lua(&args.lines);

        let mut lines = args.lines.clone();
        if complex {
            let text = args.lines.join("\n");
            let end = text.rfind('}').map_or(0, |i| i + 1);
            lines = text[..end].lines().map(str::to_string).collect();
        }

        let text = code_parser.clean_code(&args.file, &lines).join("\n");
        let text = replace_all(&COMMA_BEFORE_BRACE, &text);
        let text = strip_loose_separators(&text);
        let text = replace_all(&COMMA_AFTER_BRACE, &text);

        let mut opened = 0;
        let mut closed = 0;
        text.lines()
            .map(|line| {
                opened += line.matches('{').count();
                closed += line.matches('}').count();
                match line.strip_suffix([',', ';']) {
                    Some(stripped) if complex && opened == closed + 2 => stripped.to_string(),
                    _ => line.to_string(),
                }
            })
            .collect()
    }

    fn special_variable(&self, args: &ParserArgs, id: &str, def_type: &str) -> Definition {
        let mut definition = self
            .base
            .engine
            .new_definition(args, ValueType::SpecialVariable);
        definition.set_type(path::format_type(&args.file, Some(&format!("{def_type}-txt"))));
        definition.set_id(id.trim());
        definition.add_tag(id.trim());
        definition
    }

    /// `NGame.START_DATE = x` gives `START_DATE` typed `NGame`.
    fn dot_notation(&self, args: &ParserArgs, element: &ScriptElement) -> Option<Definition> {
        let key = element.key();
        let split = key.rfind('.')?;
        let engine = &self.base.engine;
        let mut definition = self.special_variable(args, &key[split + 1..], &key[..split]);
        definition.set_code(engine.format(element));
        definition.original_code = engine.format_original(element);
        Some(definition)
    }

    /// `NDefines = { NGame = { X = 1 } }` gives `X` typed `NDefines.NGame`.
    fn nested_lua(&self, args: &ParserArgs, outer: &ScriptElement, out: &mut Vec<Definition>) {
        let engine = &self.base.engine;
        for middle in outer.children().iter().filter(|m| !m.is_simple_type()) {
            let group = format!("{}.{}", outer.key(), middle.key());
            for item in middle.children() {
                let id = DefaultStrategy.eval_definition_id(item.children(), item.key());
                let mut definition = self.special_variable(args, &id, &group);
                definition.original_id = Some(item.key().trim().to_string());
                let code = format!("{group}.{}", engine.format_original(item));
                definition.set_code(code.clone());
                definition.original_code = code;
                add_generic_tags(&mut definition, item.children());
                out.push(definition);
            }
        }
    }

    /// `NGame = { X = 1 }` gives `X` typed `NGame`, wrapped in its group.
    fn nested_script(&self, args: &ParserArgs, group: &ScriptElement, out: &mut Vec<Definition>) {
        let engine = &self.base.engine;
        let code_parser = engine.code_parser();
        for item in group.children() {
            let id = DefaultStrategy.eval_definition_id(item.children(), item.key());
            let mut definition = self.special_variable(args, &id, group.key());
            definition.original_id = Some(item.key().trim().to_string());
            definition.set_code(code_parser.format_code_with_config(
                item,
                &FormatConfig::default().with_parent_key(group.key()),
            ));
            definition.original_code = engine.format_original(item);
            definition.code_separator = Some(CODE_SEPARATOR.to_string());
            definition.code_tag = Some(group.key().to_string());
            add_generic_tags(&mut definition, item.children());
            out.push(definition);
        }
    }
}

impl DefinitionParser for DefinesParser {
    fn name(&self) -> &str {
        "GenericDefinesParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Generic
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        self.base.config.generic.defines.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        let lua = engine.code_parser().is_lua(&args.file) && !args.lines.is_empty();

        let cleaned;
        let local = if lua {
            let mut local = args.clone();
            local.lines = self.clean_lua(args);
            if local.validation_type == ValidationType::Full {
                local.validation_type = ValidationType::SimpleOnly;
            }
            cleaned = local;
            &cleaned
        } else {
            args
        };

        let parsed = match engine.try_parse(local) {
            Ok(parsed) => parsed,
            Err(error) => return vec![engine.invalid_definition(local, &error)],
        };

        let mut definitions = Vec::new();
        for element in &parsed.elements {
            if element.is_simple_type() {
                if element.operator().is_none() {
                    let error = Error::validation(
                        format!("There appears to be a syntax error detected in: {}", local.file),
                        None,
                        None,
                    );
                    return vec![engine.invalid_definition(local, &error)];
                }
                if let Some(definition) = self.dot_notation(local, element) {
                    definitions.push(definition);
                }
            } else if lua {
                self.nested_lua(local, element, &mut definitions);
            } else {
                self.nested_script(local, element, &mut definitions);
            }
        }
        engine.finish(definitions, parsed.use_simple_validation)
    }
}

// =============================================================================
// Generic Keys
// =============================================================================

/// Returns true if a top-level block has a leaf child keyed by a generic key
/// with a non-empty value.
fn has_generic_key_child(lines: &[String]) -> bool {
    let source = lines.join("\n");
    let tokens: Vec<TokenKind> = Lexer::tokenize_all(&source)
        .into_iter()
        .map(|token| token.kind)
        .filter(|kind| !kind.is_trivia())
        .collect();

    let mut depth = 0usize;
    for (index, kind) in tokens.iter().enumerate() {
        match kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth = depth.saturating_sub(1),
            TokenKind::Text(key) if depth == 1 && is_generic_key(key) => {
                if let [TokenKind::Operator(_), TokenKind::Text(value), rest @ ..] = &tokens[index + 1..] {
                    let leaf = !matches!(rest.first(), Some(TokenKind::LBrace));
                    if leaf && !unquote(value).trim().is_empty() {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }
    false
}

struct GenericKeyStrategy;

impl DefinitionStrategy for GenericKeyStrategy {
    fn eval_element_for_id(&self, element: &ScriptElement) -> Option<String> {
        if element.is_simple_type() && is_generic_key(element.key()) {
            return element
                .unquoted_value()
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string);
        }
        None
    }
}

/// Text files whose objects carry their own identity in a generic key
/// child: `id`, `name`, `key`, `format`, `world` or `localization`.
///
/// Selection looks at the content, so it only applies when the file lines
/// are part of the selection arguments.
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
        "GenericKeyParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Generic
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        path::is_text_file(&args.file) && has_generic_key_child(&args.lines)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        self.base.engine.parse_root(args, &GenericKeyStrategy)
    }
}

// =============================================================================
// Localization
// =============================================================================

static LOCALIZATION_KEY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\w'_.-]*$").ok());

/// Returns the locale a header line such as `l_english:` declares.
fn header_locale(line: &str) -> Option<&'static str> {
    LOCALES.iter().copied().find(|locale| {
        line.get(..locale.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(locale))
            && line[locale.len()..].trim_start().starts_with(SEPARATOR)
    })
}

/// Returns the locale a file name implies: a `_l_english.yml` style suffix,
/// or a locale folder anywhere in the path.
fn file_locale(file: &str) -> Option<String> {
    let lower = file.to_lowercase();
    let by_suffix = LOCALES
        .iter()
        .filter(|locale| lower.ends_with(&format!("{locale}.yml")))
        .max_by_key(|locale| locale.len());
    if let Some(locale) = by_suffix {
        return Some((*locale).to_string());
    }
    let directory = path::parent_directory(&lower);
    LOCALES
        .iter()
        .filter_map(|locale| locale.strip_prefix(LOCALE_PREFIX))
        .find(|folder| directory.split('/').any(|segment| segment == *folder))
        .map(|folder| format!("{LOCALE_PREFIX}{folder}"))
}

/// Checks a key line, returning the error message for a bad one.
fn validate_key(line: &str, previous_key: &str) -> Option<String> {
    let cleaned = text::clean_whitespace(line);
    let Some((key, _)) = cleaned.split_once(SEPARATOR) else {
        return Some(format!("Missing separator near key: {previous_key}."));
    };
    let key = key.trim();
    let valid = LOCALIZATION_KEY
        .as_ref()
        .is_none_or(|regex| regex.is_match(key));
    if valid {
        None
    } else {
        Some(format!("Line contains invalid characters in key: {key}."))
    }
}

/// A key line rewritten to the normalized version.
struct LocalizationLine {
    code: String,
    version: i32,
}

/// Splits `KEY:2 "text"` into `KEY:1000 "text"` and its version.
fn normalize_line(line: &str) -> Result<LocalizationLine, String> {
    let Some(index) = line.find(SEPARATOR).filter(|index| *index > 0) else {
        return Ok(LocalizationLine {
            code: line.to_string(),
            version: 0,
        });
    };
    let (head, tail) = line.split_at(index + 1);
    if tail.trim().is_empty() {
        return Ok(LocalizationLine {
            code: line.to_string(),
            version: 0,
        });
    }
    let Some(quote) = tail.find('"') else {
        return Err(format!("Invalid quotes detected near line: {line}."));
    };
    Ok(LocalizationLine {
        code: format!("{head}{NORMALIZED_VERSION} {}", &tail[quote..]),
        version: tail[..quote].trim().parse().unwrap_or(0),
    })
}

/// Paradox `.yml` localization files.
///
/// Every key below a language header becomes a `SpecialVariable` typed by
/// its language. Keys are grouped under a virtual locale folder so that
/// files of one language conflict with each other wherever they live.
/// The version number after the colon is kept in `custom_priority_order`
/// and normalized in the code. Any malformed line turns the whole file into
/// one `Invalid` definition listing every problem.
#[derive(Clone, Debug, Default)]
pub struct LocalizationParser {
    base: ParserBase,
}

impl LocalizationParser {
    /// Creates the parser.
    #[must_use]
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self {
            base: ParserBase::new(config),
        }
    }

    fn key_definition(&self, args: &ParserArgs, locale: &str, line: LocalizationLine) -> Definition {
        let mut definition = self
            .base
            .engine
            .new_definition(args, ValueType::SpecialVariable);
        let root = args.file.split('/').next().unwrap_or_default();
        let folder = locale.strip_prefix(LOCALE_PREFIX).unwrap_or(locale);
        let virtual_path = format!("{root}/{folder}/{}", args.file_name());
        definition.set_type(path::format_type(
            &virtual_path,
            Some(&format!("{locale}-{TYPE_SUFFIX}")),
        ));
        definition.set_virtual_path(Some(virtual_path));
        definition.custom_priority_order = line.version;

        let key = line
            .code
            .split(SEPARATOR)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        definition.set_code(format!("{locale}:\n {}", line.code));
        definition.original_code = line.code;
        definition.code_separator = Some(SEPARATOR.to_string());
        definition.code_tag = Some(locale.to_string());
        definition.set_id(key.clone());
        definition.add_tag(&key);
        definition
    }
}

impl DefinitionParser for LocalizationParser {
    fn name(&self) -> &str {
        "GenericLocalizationParser"
    }

    fn family(&self) -> ParserFamily {
        ParserFamily::Generic
    }

    fn priority(&self) -> i32 {
        2
    }

    fn can_parse(&self, args: &CanParseArgs) -> bool {
        self.base.config.generic.localization.matches(&args.file)
    }

    fn parse(&self, args: &ParserArgs) -> Vec<Definition> {
        let engine = &self.base.engine;
        let from_file = file_locale(&args.file);
        let mut locale: Option<String> = None;
        let mut previous_key = String::new();
        let mut errors = Vec::new();
        let mut definitions = Vec::new();

        for raw in &args.lines {
            let line = raw.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(header) = header_locale(line) {
                locale = Some(from_file.clone().unwrap_or_else(|| header.to_string()));
                continue;
            }
            let Some(current) = locale.as_deref() else {
                continue;
            };
            if let Some(message) = validate_key(line, &previous_key) {
                errors.push(message);
                continue;
            }
            match normalize_line(line) {
                Ok(normalized) => {
                    let definition = self.key_definition(args, current, normalized);
                    previous_key = definition.id().to_string();
                    definitions.push(definition);
                }
                Err(message) => errors.push(message),
            }
        }

        if !errors.is_empty() {
            let error = Error::validation(errors.join("\n"), None, None);
            return vec![engine.invalid_definition(args, &error)];
        }
        engine.finish(definitions, false)
    }
}
