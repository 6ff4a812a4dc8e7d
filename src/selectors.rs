//! Shared Selectors
//!
//! CSS strings are used both for WebDriver lookups and, parsed, for reading
//! HTML snapshots of tiles and the detail panel.

use once_cell::sync::Lazy;
use scraper::Selector;

/// Rendered gallery tiles.
pub const TILE_CSS: &str = "#stills .outerimage";
/// Clickable thumbnail inside a tile.
pub const THUMB_CSS: &str = "a.gallerythumb";
/// Body of the detail view; visible while a tile is open.
pub const PANEL_BODY_CSS: &str = "#shot-details-body";
/// Title/year header of the detail view.
pub const PANEL_TITLE_CSS: &str = "#shotModalTitle";
/// Explicit close control of the detail view.
pub const PANEL_CLOSE_CSS: &str = ".modal-header button.close";

pub const LOGIN_USER_CSS: &str = "[name='user']";
pub const LOGIN_PASS_CSS: &str = "[name='pass']";
pub const LOGIN_SUBMIT_CSS: &str = "form button[type=submit]";

fn parse(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Tile root (matches the snapshot root itself).
pub static TILE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse(".outerimage"));

/// Grid-displayed title inside a tile.
pub static GRID_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse(".moviedetails.topdetails .gallerytitle"));

/// Thumbnail link inside a tile.
pub static THUMB_SELECTOR: Lazy<Selector> = Lazy::new(|| parse(THUMB_CSS));

/// Thumbnail still image inside a tile.
pub static THUMB_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse("a.gallerythumb img.still"));

/// Color swatches carrying an inline background color.
pub static PALETTE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse(".palette a[style*='background-color']"));

/// Labeled metadata groups of the detail view.
pub static DETAIL_GROUP_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse("#shot_details .detail-group"));

pub static DETAIL_LABEL_SELECTOR: Lazy<Selector> = Lazy::new(|| parse(".detail-type"));

pub static DETAIL_VALUE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse(".details"));

/// Spans holding the complete location string, preferred over link text.
pub static FULL_LOCATION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse("span.full_location, span.full_filming_location"));

pub static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| parse("a"));

/// Full-resolution link around the hero image.
pub static HERO_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| parse("#hero a"));

/// Hero image element, used when no link is present.
pub static HERO_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse("#shot_details_hero"));

/// Title header, when it is part of the snapshot.
pub static PANEL_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse(PANEL_TITLE_CSS));
