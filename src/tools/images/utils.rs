use std::io::Cursor;

use image::ImageReader;
use url::Url;

use super::types::ImageMetadata;
use crate::error::Result;
use crate::tools::ratio::classify;

/// Extensions kept as-is; anything else is stored under the fallback.
pub(crate) const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];
pub(crate) const FALLBACK_EXTENSION: &str = ".jpg";

/// Shot id made safe as a file name: path separators and anything outside
/// `[A-Za-z0-9._-]` become `_`, and no `..` survives.
pub(crate) fn file_stem(shot_id: &str) -> String {
    let mut stem: String = shot_id
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    while stem.contains("..") {
        stem = stem.replace("..", "_");
    }
    if stem.is_empty() || stem == "." {
        stem = "_".to_string();
    }
    stem
}

/// File extension (with dot) for an image URL.
pub(crate) fn extension_for(url: &str) -> &'static str {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let file = path.rsplit('/').next().unwrap_or("");
    let ext = match file.rfind('.') {
        Some(idx) if idx > 0 => file[idx..].to_ascii_lowercase(),
        _ => return FALLBACK_EXTENSION,
    };
    ALLOWED_EXTENSIONS
        .iter()
        .find(|allowed| **allowed == ext)
        .copied()
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Decode just enough of the image to learn its dimensions.
pub(crate) fn measure(bytes: &[u8]) -> Result<ImageMetadata> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(ImageMetadata {
        width,
        height,
        ratio: classify(i64::from(width), i64::from(height)),
    })
}
