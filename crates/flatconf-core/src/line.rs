//! Line-oriented text format
//!
//! One `key = value` entry per line. The first `=` separates key from
//! value, whitespace around both is trimmed, lines starting with `#` are
//! comments and blank lines are ignored.
//!
//! ```text
//! core.alpha = 0.05
//! core.id = HU7321
//! core.start = 12:30
//! ```

/// Whitespace stripped from keys, values and list segments
pub const WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// Marks a comment line when it is the first non-whitespace character
pub const COMMENT_MARKER: char = '#';

/// Separates key from value
pub const SEPARATOR: char = '=';

/// Strip leading and trailing spaces, tabs, carriage returns and line feeds
///
/// Other Unicode whitespace is kept.
pub fn trim(s: &str) -> &str {
    s.trim_matches(WHITESPACE)
}

/// Split a line into a trimmed `(key, value)` pair
///
/// Returns `None` when the line has no `=` or when the key is empty after
/// trimming. Any `=` after the first belongs to the value.
pub fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(SEPARATOR)?;
    let key = trim(key);
    if key.is_empty() {
        return None;
    }
    Some((key, trim(value)))
}

/// Check whether a line takes part in a batch load
///
/// Blank lines and comment lines are skipped.
pub fn is_eligible(line: &str) -> bool {
    let trimmed = trim(line);
    !trimmed.is_empty() && !trimmed.starts_with(COMMENT_MARKER)
}
