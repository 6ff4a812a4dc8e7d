//! Tile Scanner

pub mod types;

pub use types::*;

use crate::selectors::{GRID_TITLE_SELECTOR, THUMB_IMAGE_SELECTOR, THUMB_SELECTOR, TILE_SELECTOR};
use crate::tools::clean::join_text;
use scraper::{ElementRef, Html, Selector};

/// Read a tile's attributes from its outer HTML.
///
/// Each field is looked up on its own; a missing thumbnail does not hide the
/// title, and so on.
pub fn scan_tile(html: &str) -> TileAttributes {
    let doc = Html::parse_fragment(html);
    let root = doc.select(&TILE_SELECTOR).next();

    let attr = |name: &str| -> String {
        root.and_then(|el| el.value().attr(name))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    TileAttributes {
        shot_id: attr("data-shotid"),
        titleyear: attr("data-titleyear"),
        shot_status: attr("data-shot-status"),
        title_content_status: attr("data-title-content-status"),
        grid_title_raw: first(&doc, &GRID_TITLE_SELECTOR)
            .map(|el| join_text(el.text()))
            .unwrap_or_default(),
        thumb_src: first_attr(&doc, &THUMB_IMAGE_SELECTOR, "src"),
        data_filename: first_attr(&doc, &THUMB_SELECTOR, "data-filename"),
    }
}

fn first<'a>(doc: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    doc.select(selector).next()
}

fn first_attr(doc: &Html, selector: &Selector, name: &str) -> String {
    first(doc, selector)
        .and_then(|el| el.value().attr(name))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}
