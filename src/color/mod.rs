//! Dominant color detection and color-name canonicalization.
//!
//! - [`ColorName`] is the closed vocabulary every comparison happens in.
//! - [`canonicalize`] maps free-form labels (catalog `baseColour`, user input)
//!   into it through an ordered synonym table.
//! - [`identify_color`] classifies one HSV triple with a first-match rule table.
//! - [`extract_dominant_colors`] ties it together for an image.

mod extract;
mod rules;

#[cfg(test)]
mod tests;

pub use extract::{extract_dominant_colors, extract_dominant_colors_from_path, rgb_to_hsv};
pub use rules::{COLOR_RULES, COLOR_SYNONYMS, ColorRule, identify_color};

use serde::{Serialize, Serializer};

/// Canonical color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Pink,
    Orange,
    Brown,
    White,
    Black,
    Grey,
    NavyBlue,
    Beige,
    Maroon,
    Olive,
    Teal,
}

impl ColorName {
    /// All canonical names, in rule-table order.
    pub const ALL: [ColorName; 16] = [
        ColorName::Red,
        ColorName::Green,
        ColorName::Blue,
        ColorName::Yellow,
        ColorName::Purple,
        ColorName::Pink,
        ColorName::Orange,
        ColorName::Brown,
        ColorName::White,
        ColorName::Black,
        ColorName::Grey,
        ColorName::NavyBlue,
        ColorName::Beige,
        ColorName::Maroon,
        ColorName::Olive,
        ColorName::Teal,
    ];

    /// Human-readable name (`"Navy Blue"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Red => "Red",
            ColorName::Green => "Green",
            ColorName::Blue => "Blue",
            ColorName::Yellow => "Yellow",
            ColorName::Purple => "Purple",
            ColorName::Pink => "Pink",
            ColorName::Orange => "Orange",
            ColorName::Brown => "Brown",
            ColorName::White => "White",
            ColorName::Black => "Black",
            ColorName::Grey => "Grey",
            ColorName::NavyBlue => "Navy Blue",
            ColorName::Beige => "Beige",
            ColorName::Maroon => "Maroon",
            ColorName::Olive => "Olive",
            ColorName::Teal => "Teal",
        }
    }
}

impl std::fmt::Display for ColorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ColorName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for ColorName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Maps a free-form color label to its canonical name.
///
/// Matching ignores case and surrounding whitespace. Unknown labels yield `None`.
pub fn canonicalize(label: &str) -> Option<ColorName> {
    let wanted = label.trim();
    if wanted.is_empty() {
        return None;
    }

    COLOR_SYNONYMS
        .iter()
        .find(|(synonym, _)| synonym.eq_ignore_ascii_case(wanted))
        .map(|(_, name)| *name)
}

/// Canonicalizes a list of labels, dropping unknowns and duplicates (first seen wins).
pub fn canonicalize_all<S: AsRef<str>>(labels: &[S]) -> Vec<ColorName> {
    let mut out: Vec<ColorName> = Vec::with_capacity(labels.len());
    for label in labels {
        if let Some(name) = canonicalize(label.as_ref())
            && !out.contains(&name)
        {
            out.push(name);
        }
    }
    out
}
