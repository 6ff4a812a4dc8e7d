use serde::{Deserialize, Serialize};

/// Identifying attributes of a gallery tile, read without opening it.
///
/// Every field is independently empty when its element or attribute is absent.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TileAttributes {
    pub shot_id: String,
    pub titleyear: String,
    pub shot_status: String,
    pub title_content_status: String,
    pub grid_title_raw: String,
    pub thumb_src: String,
    pub data_filename: String,
}

impl TileAttributes {
    /// Row fields in column order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("shot_id", self.shot_id.as_str()),
            ("titleyear", self.titleyear.as_str()),
            ("shot_status", self.shot_status.as_str()),
            ("title_content_status", self.title_content_status.as_str()),
            ("grid_title_raw", self.grid_title_raw.as_str()),
            ("thumb_src", self.thumb_src.as_str()),
            ("data_filename", self.data_filename.as_str()),
        ]
    }
}
