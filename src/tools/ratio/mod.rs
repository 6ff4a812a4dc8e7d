//! Aspect Ratio Classification

mod tests;

use serde::{Deserialize, Serialize};

/// Conventional film/photo ratios, widest first, with their display labels.
pub const CINEMA_STANDARDS: [(f64, &str); 7] = [
    (2.39, "2.39:1"), // CinemaScope
    (2.35, "2.35:1"), // Anamorphic
    (1.85, "1.85:1"), // Flat
    (1.78, "16:9"),
    (1.66, "5:3"),
    (1.33, "4:3"), // Academy
    (1.00, "1:1"),
];

/// Relative distance within which a ratio snaps to a standard label.
pub const CINEMA_TOLERANCE: f64 = 0.05;

/// Simplified and cinema-standard descriptions of an image's shape.
///
/// Both strings are empty when the dimensions are not computable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Reduced integer ratio, e.g. `"16:9"`.
    pub fraction: String,
    /// Nearest standard label (`"2.39:1"`) or a rounded custom ratio (`"1.50:1"`).
    pub cinema: String,
}

impl AspectRatio {
    pub fn is_empty(&self) -> bool {
        self.fraction.is_empty() && self.cinema.is_empty()
    }
}

/// Classify pixel dimensions.
///
/// # Examples
/// ```
/// use stillscrape::tools::ratio::classify;
///
/// let r = classify(1920, 1080);
/// assert_eq!(r.fraction, "16:9");
/// assert_eq!(r.cinema, "16:9");
/// assert!(classify(0, 100).is_empty());
/// ```
pub fn classify(width: i64, height: i64) -> AspectRatio {
    if width <= 0 || height <= 0 {
        return AspectRatio::default();
    }

    let divisor = gcd(width, height);
    let fraction = format!("{}:{}", width / divisor, height / divisor);

    let ratio = width as f64 / height as f64;
    AspectRatio {
        fraction,
        cinema: cinema_label(ratio),
    }
}

/// Label for a real-valued width/height ratio.
pub fn cinema_label(ratio: f64) -> String {
    let mut nearest = CINEMA_STANDARDS[0];
    for standard in CINEMA_STANDARDS.iter().skip(1) {
        // strict comparison keeps the first entry on ties
        if (standard.0 - ratio).abs() < (nearest.0 - ratio).abs() {
            nearest = *standard;
        }
    }

    let (standard, label) = nearest;
    if (ratio - standard).abs() / standard < CINEMA_TOLERANCE {
        label.to_string()
    } else {
        format!("{:.2}:1", ratio)
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
