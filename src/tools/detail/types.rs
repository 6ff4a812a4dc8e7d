use serde::{Deserialize, Serialize};

/// Everything read from an open detail view.
///
/// `fields` holds the site-defined labeled groups in rendering order; the set
/// of labels differs from item to item.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailRecord {
    pub title_year_raw: String,
    /// Comma-joined swatch colors.
    pub palette_hex: String,
    #[serde(default)]
    pub fields: Vec<(String, String)>,
    /// Full-resolution image reference.
    pub image_url: String,
}

impl DetailRecord {
    /// Insert or overwrite a labeled field, keeping first-seen order.
    pub fn set_field(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
