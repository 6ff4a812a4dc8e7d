use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::selectors::{
    ANCHOR_SELECTOR, DETAIL_LABEL_SELECTOR, DETAIL_VALUE_SELECTOR, FULL_LOCATION_SELECTOR,
    HERO_IMAGE_SELECTOR, HERO_LINK_SELECTOR, PALETTE_SELECTOR,
};
use crate::tools::clean::{join_text, normalize_field_name};

static BACKGROUND_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"background-color:\s*([^;]+);?").expect("valid regex"));

/// Background color declared in an inline style, if any.
pub(super) fn background_color(style: &str) -> Option<String> {
    BACKGROUND_COLOR_REGEX
        .captures(style)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|c| !c.is_empty())
}

pub(super) fn extract_palette(doc: &Html) -> String {
    doc.select(&PALETTE_SELECTOR)
        .filter_map(|swatch| swatch.value().attr("style"))
        .filter_map(background_color)
        .collect::<Vec<_>>()
        .join(",")
}

/// Field name and value of one `.detail-group`, or `None` when it has no
/// usable label or value container.
pub(super) fn extract_group(group: ElementRef<'_>) -> Option<(String, String)> {
    let label = group.select(&DETAIL_LABEL_SELECTOR).next()?;
    let name = normalize_field_name(&label.text().collect::<String>());
    if name.is_empty() {
        return None;
    }
    let details = group.select(&DETAIL_VALUE_SELECTOR).next()?;
    Some((name, group_value(details)))
}

/// Value precedence: full location span, then joined link texts, then the
/// whole container's text.
pub(super) fn group_value(details: ElementRef<'_>) -> String {
    if let Some(full) = details
        .select(&FULL_LOCATION_SELECTOR)
        .next()
        .map(|span| join_text(span.text()))
        .filter(|text| !text.is_empty())
    {
        return full;
    }

    let anchors: Vec<String> = details
        .select(&ANCHOR_SELECTOR)
        .map(|a| join_text(a.text()))
        .collect();
    if !anchors.is_empty() {
        return anchors.join(", ");
    }

    join_text(details.text())
}

/// Hero reference: link target first, image source second.
pub(super) fn extract_hero(doc: &Html) -> String {
    let link = doc
        .select(&HERO_LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty());
    if let Some(href) = link {
        return href.to_string();
    }

    doc.select(&HERO_IMAGE_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}
