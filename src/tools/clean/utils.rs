//! Private helpers for label and text cleaning
use regex::Regex;
use once_cell::sync::Lazy;

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

// Whitespace and slashes both separate words in a label.
static LABEL_SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s/]+").expect("valid regex"));

/// Collapse whitespace runs (newlines and tabs included) into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Strip surrounding whitespace and any trailing colons from a label.
pub fn strip_label_punctuation(label: &str) -> &str {
    label.trim().trim_end_matches(':')
}

/// Join label words with underscores.
pub fn underscore_separators(label: &str) -> String {
    LABEL_SEPARATOR_REGEX
        .replace_all(label, "_")
        .replace('-', "_")
}
