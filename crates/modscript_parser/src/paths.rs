//! Path tables that drive parser selection.
//!
//! Each specialized parser claims files through a [`PathTable`]. The default
//! tables are built from the constants below and can be replaced through
//! [`crate::ParserConfig`].

use modscript_foundation::path;

/// Generic keys whose values identify or label an object.
pub const GENERIC_KEYS: [&str; 6] = ["id", "name", "key", "format", "world", "localization"];

/// Keys that declare a namespace.
pub const NAMESPACE_KEYS: [&str; 2] = ["namespace", "add_namespace"];

/// Key of the locale list that prefixes ids.
pub const LANGUAGES_KEY: &str = "languages";

/// Key of an inline script directive.
pub const INLINE_SCRIPT_KEY: &str = "inline_script";

/// Parameter of an inline script block that names the script itself.
pub const INLINE_SCRIPT_PARAMETER: &str = "script";

/// Generic family tables.
pub mod generic {
    /// Whole text files by prefix.
    pub const WHOLE_TEXT_PREFIXES: &[&str] = &["common/on_actions"];
    /// Whole text files by extension.
    pub const WHOLE_TEXT_EXTENSIONS: &[&str] = &[".shader", ".fxh"];
    /// Files directly in this directory are whole text.
    pub const COMMON_ROOT: &str = "common";
    /// Text files under this prefix are whole text.
    pub const SOUND_PREFIX: &str = "sound";
    /// Graphics definitions by extension.
    pub const GRAPHICS_EXTENSIONS: &[&str] = &[".gui", ".gfx"];
    /// Folder segment that marks a graphics override.
    pub const REPLACE_FOLDER: &str = "replace";
    /// Engine defines.
    pub const DEFINES_PREFIXES: &[&str] = &["common/defines"];
    /// Localization files by extension.
    pub const LOCALIZATION_EXTENSIONS: &[&str] = &[".yml"];
}

/// Localization tables.
pub mod localization {
    /// Language headers a localization file may open with.
    pub const LOCALES: &[&str] = &[
        "l_default",
        "l_english",
        "l_braz_por",
        "l_french",
        "l_german",
        "l_polish",
        "l_russian",
        "l_simp_chinese",
        "l_spanish",
        "l_chinese",
        "l_traditional_chinese",
    ];
    /// Prefix shared by every locale. The rest names the locale folder.
    pub const LOCALE_PREFIX: &str = "l_";
    /// Separator between a key and its text.
    pub const SEPARATOR: char = ':';
    /// Version every key is rewritten to, so versions never cause conflicts.
    pub const NORMALIZED_VERSION: &str = "1000";
    /// Type suffix, after the locale.
    pub const TYPE_SUFFIX: &str = "yml";
}

/// Stellaris tables.
pub mod stellaris {
    /// Object becomes an overwritten object.
    pub const OVERWRITTEN_PREFIXES: &[&str] = &[
        "common/pop_jobs",
        "common/traits",
        "common/districts",
        "common/planet_classes",
        "common/prescripted_countries",
        "common/species_archetypes",
        "common/buildings",
    ];
    /// Generic keys provide the id below this prefix.
    pub const PLANET_CLASSES: &str = "common/planet_classes";
    /// Overwritten objects that keep their file name.
    pub const PRESERVE_FILE_NAME_DIRECTORIES: &[&str] = &["common/strategic_resources"];
    /// Folders that merge into a single file.
    pub const SINGLE_FILE_DIRECTORIES: &[&str] = &[
        "common/ethics",
        "common/starbase_modules",
        "common/ship_sizes",
        "common/strategic_resources",
        "common/governments/authorities",
    ];
    /// Ids that may repeat inside a single file folder.
    pub const ALLOWED_DUPLICATE_IDS: &[(&str, &str)] = &[("common/ethics", "ethic_categories")];
    /// Variables with a higher merge priority.
    pub const SCRIPTED_VARIABLES_PREFIXES: &[&str] = &["common/scripted_variables"];
    /// Whole text folders.
    pub const WHOLE_TEXT_PREFIXES: &[&str] = &[
        "common/diplo_phrases",
        "map/galaxy",
        "common/name_lists",
        "common/species_names",
        "gfx/portraits/portraits",
        "common/random_names/base",
        "common/random_names",
        "common/start_screen_messages",
        "map/setup_scenarios",
        "common/country_container",
        "common/diplomacy_economy",
        "common/inline_scripts",
        "common/economic_plans",
        "common/species_classes",
        "common/gamesetup_settings",
    ];
    /// Country flags.
    pub const FLAGS_PREFIXES: &[&str] = &["flags"];
    /// Line-oriented tag lists.
    pub const COMPONENT_TAGS_PREFIXES: &[&str] = &["common/component_tags"];
    /// Terraform links keyed by their from/to pair.
    pub const TERRAFORM_PREFIXES: &[&str] = &["common/terraform"];
    /// Initializers are always identified by their block key.
    pub const SOLAR_SYSTEM_INITIALIZERS_PREFIXES: &[&str] = &["common/solar_system_initializers"];
}

/// Hearts of Iron IV tables.
pub mod hoi4 {
    /// Second level objects identified by `key`.
    pub const KEY_PREFIXES: &[&str] = &["common/bookmarks", "common/difficulty_settings"];
    /// Bookmarks are identified by `name`.
    pub const BOOKMARKS: &str = "common/bookmarks";
    /// Second level objects.
    pub const INNER_LAYER_PREFIXES: &[&str] = &["common/abilities", "common/characters"];
    /// Flat `TAG = path` lists.
    pub const KEY_VALUE_PAIR_PREFIXES: &[&str] = &["common/country_tags"];
    /// Whole text files.
    pub const WHOLE_TEXT_FILES: &[&str] = &["common/graphicalculturetype.txt"];
}

/// A set of path predicates, any of which claims a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathTable {
    /// The file path starts with one of these.
    pub prefixes: Vec<String>,
    /// The file's directory equals one of these.
    pub directories: Vec<String>,
    /// The file path equals one of these.
    pub files: Vec<String>,
    /// The file's extension is one of these.
    pub extensions: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl PathTable {
    /// Creates an empty table that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds path prefixes.
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.prefixes.extend(owned(prefixes));
        self
    }

    /// Adds exact directories.
    #[must_use]
    pub fn with_directories(mut self, directories: &[&str]) -> Self {
        self.directories.extend(owned(directories));
        self
    }

    /// Adds exact files.
    #[must_use]
    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files.extend(owned(files));
        self
    }

    /// Adds extensions, including the dot.
    #[must_use]
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions.extend(owned(extensions));
        self
    }

    /// Returns true if any predicate claims the file. Comparisons ignore case.
    #[must_use]
    pub fn matches(&self, file: &str) -> bool {
        if self.prefixes.iter().any(|p| path::starts_with(file, p)) {
            return true;
        }
        if self.files.iter().any(|f| path::equals(file, f)) {
            return true;
        }
        if !self.directories.is_empty() {
            let directory = path::parent_directory(file);
            if self.directories.iter().any(|d| path::equals(&directory, d)) {
                return true;
            }
        }
        if !self.extensions.is_empty() {
            let extension = path::extension(file);
            return self
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(&extension));
        }
        false
    }

    /// Returns true if the table has no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
            && self.directories.is_empty()
            && self.files.is_empty()
            && self.extensions.is_empty()
    }
}

/// Returns true if `key` is one of [`GENERIC_KEYS`], ignoring case.
#[must_use]
pub fn is_generic_key(key: &str) -> bool {
    GENERIC_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Returns true if `key` declares a namespace, ignoring case.
#[must_use]
pub fn is_namespace_key(key: &str) -> bool {
    NAMESPACE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}
