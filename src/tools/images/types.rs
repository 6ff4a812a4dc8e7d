use crate::tools::ratio::AspectRatio;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a decoded image and their ratio classification.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub ratio: AspectRatio,
}

/// Outcome of storing one image.
///
/// `path` is set whenever the bytes reached disk; `metadata` only when they
/// also decoded. A failed download leaves both empty.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredImage {
    pub path: String,
    pub metadata: Option<ImageMetadata>,
}

impl StoredImage {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Row fields in column order; absent metadata becomes empty strings.
    pub fn fields(&self) -> [(&'static str, String); 5] {
        let (width, height, fraction, cinema) = match &self.metadata {
            Some(m) => (
                m.width.to_string(),
                m.height.to_string(),
                m.ratio.fraction.clone(),
                m.ratio.cinema.clone(),
            ),
            None => Default::default(),
        };
        [
            ("image_path", self.path.clone()),
            ("image_width", width),
            ("image_height", height),
            ("image_aspect_ratio_fraction", fraction),
            ("image_aspect_ratio_cinema", cinema),
        ]
    }
}
