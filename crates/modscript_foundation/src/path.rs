//! Logical path helpers.
//!
//! Game files are addressed by logical paths relative to the game or mod
//! root (`common/buildings/00_buildings.txt`). Paths are normalized to `/`
//! separators before any comparison so Windows-style input behaves the same.

/// Extensions treated as text content. Everything else is binary.
pub const TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".lua", ".gui", ".gfx", ".asset", ".map", ".shader", ".fxh", ".yml", ".csv", ".sfx",
    ".font", ".fnt", ".settings", ".cfg", ".mod", ".json", ".xml", ".sav",
];

/// Normalizes separators to `/` and strips leading or trailing separators.
#[must_use]
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

/// Returns the directory part of a path, or an empty string for bare names.
#[must_use]
pub fn parent_directory(path: &str) -> String {
    let normalized = normalize(path);
    normalized
        .rfind('/')
        .map_or_else(String::new, |i| normalized[..i].to_string())
}

/// Returns the last path segment.
#[must_use]
pub fn file_name(path: &str) -> String {
    let normalized = normalize(path);
    normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Returns the lowercase extension including the dot, or an empty string.
#[must_use]
pub fn extension(path: &str) -> String {
    let name = file_name(path);
    match name.rfind('.') {
        Some(i) if i > 0 => name[i..].to_lowercase(),
        _ => String::new(),
    }
}

/// Returns true if the path has a known text extension.
#[must_use]
pub fn is_text_file(path: &str) -> bool {
    let ext = extension(path);
    TEXT_EXTENSIONS.contains(&ext.as_str())
}

/// Case-insensitive prefix check over normalized paths.
///
/// The prefix must end on a segment boundary: `flags` matches `flags/a.dds`
/// and `flags` itself, but not `flagsx/a.dds`. An empty prefix matches
/// everything.
#[must_use]
pub fn starts_with(path: &str, prefix: &str) -> bool {
    let path = normalize(path).to_lowercase();
    let prefix = normalize(prefix).to_lowercase();
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(&prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Case-insensitive equality over normalized paths.
#[must_use]
pub fn equals(left: &str, right: &str) -> bool {
    normalize(left).eq_ignore_ascii_case(&normalize(right))
}

/// Builds a definition type of the form `{dir}/{suffix}`.
///
/// The suffix is the override when given, otherwise the file extension
/// without the dot, or `txt` for unknown extensions.
#[must_use]
pub fn format_type(file: &str, type_override: Option<&str>) -> String {
    let directory = parent_directory(file);
    let suffix = match type_override {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => {
            let ext = extension(file);
            if TEXT_EXTENSIONS.contains(&ext.as_str()) {
                ext.trim_start_matches('.').to_string()
            } else {
                "txt".to_string()
            }
        }
    };
    if directory.is_empty() {
        suffix
    } else {
        format!("{directory}/{suffix}")
    }
}
