use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::tools::detail::DetailRecord;
use crate::tools::images::StoredImage;
use crate::tools::tile::TileAttributes;

/// One output row: field name → text value.
///
/// The field set is open-ended because detail views expose different labeled
/// groups per item; the column schema is computed from all rows at export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRow(pub BTreeMap<String, String>);

impl ScrapedRow {
    /// Merge tile, detail and image data. Later sources win on name clashes.
    pub fn assemble(tile: &TileAttributes, detail: &DetailRecord, image: &StoredImage) -> Self {
        let mut fields = BTreeMap::new();
        for (k, v) in tile.fields() {
            fields.insert(k.to_string(), v.to_string());
        }

        fields.insert("title_year_raw".to_string(), detail.title_year_raw.clone());
        fields.insert("palette_hex".to_string(), detail.palette_hex.clone());
        for (k, v) in &detail.fields {
            fields.insert(k.clone(), v.clone());
        }
        fields.insert("image_url".to_string(), detail.image_url.clone());

        for (k, v) in image.fields() {
            fields.insert(k.to_string(), v);
        }
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn shot_id(&self) -> &str {
        self.get("shot_id").unwrap_or("")
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScrapedRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Identifiers fully processed during this run.
///
/// Grows monotonically; an id that enters the set is never processed again,
/// whatever happens to the rendered list.
#[derive(Debug, Clone, Default)]
pub struct SeenSet(HashSet<String>);

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, shot_id: &str) -> bool {
        self.0.contains(shot_id)
    }

    /// Returns `false` when the id was already present.
    pub fn insert(&mut self, shot_id: impl Into<String>) -> bool {
        self.0.insert(shot_id.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Why the scrape loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// `max_shots` items were processed.
    TargetReached,
    /// Several consecutive cycles produced nothing new.
    NoNewItems,
    /// Scrolling no longer grew the page.
    ContentExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::images::ImageMetadata;
    use crate::tools::ratio::classify;

    #[test]
    fn assemble_merges_all_sources() {
        let tile = TileAttributes {
            shot_id: "A1".into(),
            titleyear: "Heat (1995)".into(),
            ..Default::default()
        };
        let mut detail = DetailRecord {
            title_year_raw: "Heat (1995)".into(),
            palette_hex: "#000000".into(),
            image_url: "https://x/A1.jpg".into(),
            ..Default::default()
        };
        detail.set_field("director".into(), "Michael Mann".into());
        let image = StoredImage {
            path: "imgs/A1.jpg".into(),
            metadata: Some(ImageMetadata {
                width: 1920,
                height: 804,
                ratio: classify(1920, 804),
            }),
        };

        let row = ScrapedRow::assemble(&tile, &detail, &image);
        assert_eq!(row.shot_id(), "A1");
        assert_eq!(row.get("director"), Some("Michael Mann"));
        assert_eq!(row.get("image_url"), Some("https://x/A1.jpg"));
        assert_eq!(row.get("image_width"), Some("1920"));
        assert_eq!(row.get("image_aspect_ratio_cinema"), Some("2.39:1"));
        assert_eq!(row.get("thumb_src"), Some(""));
    }

    #[test]
    fn assemble_lets_detail_fields_override_tile_fields() {
        let tile = TileAttributes {
            shot_id: "A1".into(),
            shot_status: "tile".into(),
            ..Default::default()
        };
        let mut detail = DetailRecord::default();
        detail.set_field("shot_status".into(), "detail".into());
        let row = ScrapedRow::assemble(&tile, &detail, &StoredImage::empty());
        assert_eq!(row.get("shot_status"), Some("detail"));
    }

    #[test]
    fn seen_set_reports_duplicates() {
        let mut seen = SeenSet::new();
        assert!(seen.insert("A1"));
        assert!(!seen.insert("A1"));
        assert!(seen.contains("A1"));
        assert_eq!(seen.len(), 1);
    }
}
