//! Configuration for the definition parsers.

use modscript_foundation::path;
use modscript_language::ScriptConfig;

use crate::paths::{PathTable, generic, hoi4, stellaris};

/// Marks blocks in a directory whose children are all keyed `key` for
/// concatenation on merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatMergeMarker {
    /// Directory the marker applies to.
    pub directory: String,
    /// Child key that every child must use.
    pub key: String,
}

impl FlatMergeMarker {
    /// Creates a marker.
    #[must_use]
    pub fn new(directory: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            key: key.into(),
        }
    }
}

/// Generic family path tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericPaths {
    /// Whole text files, in addition to root `common` files and sound text files.
    pub whole_text: PathTable,
    /// Graphics definitions.
    pub graphics: PathTable,
    /// Engine defines.
    pub defines: PathTable,
    /// Localization files.
    pub localization: PathTable,
}

impl Default for GenericPaths {
    fn default() -> Self {
        Self {
            whole_text: PathTable::new()
                .with_prefixes(generic::WHOLE_TEXT_PREFIXES)
                .with_extensions(generic::WHOLE_TEXT_EXTENSIONS),
            graphics: PathTable::new().with_extensions(generic::GRAPHICS_EXTENSIONS),
            defines: PathTable::new().with_prefixes(generic::DEFINES_PREFIXES),
            localization: PathTable::new().with_extensions(generic::LOCALIZATION_EXTENSIONS),
        }
    }
}

/// Stellaris path tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StellarisPaths {
    /// Overwritten objects.
    pub overwritten: PathTable,
    /// Overwritten objects that keep their file name.
    pub preserve_file_name: PathTable,
    /// Single file folders.
    pub single_file: PathTable,
    /// Scripted variables.
    pub scripted_variables: PathTable,
    /// Whole text folders.
    pub whole_text: PathTable,
    /// Country flags.
    pub flags: PathTable,
    /// Component tag lists.
    pub component_tags: PathTable,
    /// Terraform links.
    pub terraform: PathTable,
    /// Solar system initializers.
    pub solar_system_initializers: PathTable,
}

impl Default for StellarisPaths {
    fn default() -> Self {
        Self {
            overwritten: PathTable::new().with_prefixes(stellaris::OVERWRITTEN_PREFIXES),
            preserve_file_name: PathTable::new()
                .with_directories(stellaris::PRESERVE_FILE_NAME_DIRECTORIES),
            single_file: PathTable::new().with_directories(stellaris::SINGLE_FILE_DIRECTORIES),
            scripted_variables: PathTable::new()
                .with_prefixes(stellaris::SCRIPTED_VARIABLES_PREFIXES),
            whole_text: PathTable::new().with_prefixes(stellaris::WHOLE_TEXT_PREFIXES),
            flags: PathTable::new().with_prefixes(stellaris::FLAGS_PREFIXES),
            component_tags: PathTable::new().with_prefixes(stellaris::COMPONENT_TAGS_PREFIXES),
            terraform: PathTable::new().with_prefixes(stellaris::TERRAFORM_PREFIXES),
            solar_system_initializers: PathTable::new()
                .with_prefixes(stellaris::SOLAR_SYSTEM_INITIALIZERS_PREFIXES),
        }
    }
}

/// Hearts of Iron IV path tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hoi4Paths {
    /// Second level objects identified by `key`.
    pub key: PathTable,
    /// Second level objects.
    pub inner_layer: PathTable,
    /// Flat key/value lists.
    pub key_value_pair: PathTable,
    /// Whole text files.
    pub whole_text: PathTable,
}

impl Default for Hoi4Paths {
    fn default() -> Self {
        Self {
            key: PathTable::new().with_prefixes(hoi4::KEY_PREFIXES),
            inner_layer: PathTable::new().with_prefixes(hoi4::INNER_LAYER_PREFIXES),
            key_value_pair: PathTable::new().with_prefixes(hoi4::KEY_VALUE_PAIR_PREFIXES),
            whole_text: PathTable::new().with_files(hoi4::WHOLE_TEXT_FILES),
        }
    }
}

/// Configuration shared by every parser in a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Tokenizer, validation and comment settings.
    pub script: ScriptConfig,
    /// Generic family paths.
    pub generic: GenericPaths,
    /// Stellaris paths.
    pub stellaris: StellarisPaths,
    /// Hearts of Iron IV paths.
    pub hoi4: Hoi4Paths,
    /// Ids that may repeat inside a single file folder, as `(directory, id)`.
    pub allowed_duplicate_ids: Vec<(String, String)>,
    /// Flat merge markers for single file folders.
    pub flat_merge_markers: Vec<FlatMergeMarker>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            script: ScriptConfig::default(),
            generic: GenericPaths::default(),
            stellaris: StellarisPaths::default(),
            hoi4: Hoi4Paths::default(),
            allowed_duplicate_ids: stellaris::ALLOWED_DUPLICATE_IDS
                .iter()
                .map(|(dir, id)| ((*dir).to_string(), (*id).to_string()))
                .collect(),
            flat_merge_markers: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Sets the script configuration.
    #[must_use]
    pub fn with_script(mut self, script: ScriptConfig) -> Self {
        self.script = script;
        self
    }

    /// Adds a flat merge marker.
    #[must_use]
    pub fn with_flat_merge_marker(mut self, marker: FlatMergeMarker) -> Self {
        self.flat_merge_markers.push(marker);
        self
    }

    /// Allows an id to repeat inside a single file folder.
    #[must_use]
    pub fn with_allowed_duplicate(mut self, directory: &str, id: &str) -> Self {
        self.allowed_duplicate_ids
            .push((directory.to_string(), id.to_string()));
        self
    }

    /// Returns true if `id` may repeat in `directory`. Comparisons ignore case.
    #[must_use]
    pub fn allows_duplicate(&self, directory: &str, id: &str) -> bool {
        self.allowed_duplicate_ids
            .iter()
            .any(|(dir, allowed)| path::equals(dir, directory) && allowed.eq_ignore_ascii_case(id))
    }

    /// Returns the flat merge marker keys configured for a directory.
    pub fn flat_merge_keys<'a>(&'a self, directory: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.flat_merge_markers
            .iter()
            .filter(move |marker| path::equals(&marker.directory, directory))
            .map(|marker| marker.key.as_str())
    }
}
