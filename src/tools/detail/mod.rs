//! Detail-Panel Extraction

pub mod types;
mod utils;

pub use types::*;
use utils::*;

use crate::selectors::{DETAIL_GROUP_SELECTOR, PANEL_TITLE_SELECTOR};
use crate::tools::clean::join_text;
use scraper::Html;

/// Parse an HTML snapshot of the open detail view.
///
/// Extraction is best-effort: a group without a label or value is skipped and
/// its siblings are still read. Missing palette, title or hero yield empty
/// strings.
pub fn parse_panel(html: &str) -> DetailRecord {
    let doc = Html::parse_fragment(html);

    let mut record = DetailRecord {
        title_year_raw: doc
            .select(&PANEL_TITLE_SELECTOR)
            .next()
            .map(|el| join_text(el.text()))
            .unwrap_or_default(),
        palette_hex: extract_palette(&doc),
        fields: Vec::new(),
        image_url: extract_hero(&doc),
    };

    for group in doc.select(&DETAIL_GROUP_SELECTOR) {
        if let Some((name, value)) = extract_group(group) {
            record.set_field(name, value);
        }
    }

    record
}
