mod tests;
mod utils;

pub use utils::normalize_whitespace;
use url::Url;
use utils::*;

/// Canonical field name for a rendered detail label.
///
/// Performs the following operations in order:
/// 1. Trim and strip trailing colons
/// 2. Lowercase
/// 3. Collapse whitespace and `/` runs into a single `_`
/// 4. Replace `-` with `_`
///
/// # Examples
/// ```
/// use stillscrape::tools::clean::normalize_field_name;
///
/// assert_eq!(normalize_field_name("Full Filming Location:"), "full_filming_location");
/// assert_eq!(normalize_field_name("Color / Tone"), "color_tone");
/// ```
pub fn normalize_field_name(label: &str) -> String {
    let label = strip_label_punctuation(label).to_lowercase();
    underscore_separators(&label)
}

/// Flattened display text of an element: all whitespace runs become one space.
///
/// # Examples
/// ```
/// use stillscrape::tools::clean::get_text;
///
/// assert_eq!(get_text("  Blade Runner\n  (1982) "), "Blade Runner (1982)");
/// ```
pub fn get_text(text: &str) -> String {
    normalize_whitespace(text)
}

/// Spreadsheet cell value with embedded newlines and runs collapsed.
pub fn clean_cell(value: &str) -> String {
    normalize_whitespace(value)
}

/// Join the text fragments of a scraped node and flatten them.
pub fn join_text<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    get_text(&fragments.into_iter().collect::<String>())
}

/// Resolve a raw `href`/`src` attribute against the page it was read from.
///
/// Empty input stays empty; unparseable input is returned as-is.
///
/// # Examples
/// ```
/// use stillscrape::tools::clean::resolve_url;
/// use url::Url;
///
/// let page = Url::parse("https://shotdeck.com/browse/stills").unwrap();
/// assert_eq!(
///     resolve_url(&page, "/assets/images/stills/ABC123.jpg"),
///     "https://shotdeck.com/assets/images/stills/ABC123.jpg"
/// );
/// ```
pub fn resolve_url(base: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match base.join(raw) {
        Ok(abs) => abs.to_string(),
        Err(_) => raw.to_string(),
    }
}
