//! Whitespace normalization used for content hashing.

/// Collapses whitespace for hashing purposes.
///
/// Trims the line, collapses runs of spaces and tabs into one space, and
/// removes the spaces around `=`, `{` and `}`. Quoted strings are copied
/// as they are. The result is never meant for display.
#[must_use]
pub fn clean_whitespace(line: &str) -> String {
    let mut cleaned = String::with_capacity(line.len());
    let mut in_quotes = false;
    let mut escaped = false;
    let mut pending_space = false;
    for c in line.trim().chars() {
        if in_quotes {
            cleaned.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        if c == ' ' || c == '\t' {
            pending_space = true;
            continue;
        }
        if pending_space && !is_tight(c) && !cleaned.ends_with(is_tight) {
            cleaned.push(' ');
        }
        pending_space = false;
        if c == '"' {
            in_quotes = true;
        }
        cleaned.push(c);
    }
    cleaned
}

/// Joins the non-blank lines of `code`, trimmed, with single spaces.
#[must_use]
pub fn single_line(code: &str) -> String {
    code.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_tight(c: char) -> bool {
    matches!(c, '=' | '{' | '}')
}
