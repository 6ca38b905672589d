//! Image decoding, geometric variants, and scoped variant files.

pub mod error;
mod transform;


pub use error::ImagingError;
pub use transform::rotate_about_center;

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use serde::{Serialize, Serializer};
use tempfile::NamedTempFile;
use tracing::debug;

/// Decodes `path` into an RGB image.
pub fn decode_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    if !path.exists() {
        return Err(ImagingError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|e| ImagingError::DecodeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Geometric variant tried by the rotation fallback.
///
/// Quarter turns and the oblique angles are counter-clockwise. `Flipped` is
/// top-to-bottom, `Mirrored` is left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Original,
    Deg90,
    Deg180,
    Deg270,
    Flipped,
    Mirrored,
    Deg45,
    Deg135,
    Deg225,
    Deg315,
}

impl Rotation {
    /// Every variant, in evaluation order.
    pub const ALL: [Rotation; 10] = [
        Rotation::Original,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
        Rotation::Flipped,
        Rotation::Mirrored,
        Rotation::Deg45,
        Rotation::Deg135,
        Rotation::Deg225,
        Rotation::Deg315,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::Original => "original",
            Rotation::Deg90 => "90_degrees",
            Rotation::Deg180 => "180_degrees",
            Rotation::Deg270 => "270_degrees",
            Rotation::Flipped => "flipped",
            Rotation::Mirrored => "mirrored",
            Rotation::Deg45 => "45_degrees",
            Rotation::Deg135 => "135_degrees",
            Rotation::Deg225 => "225_degrees",
            Rotation::Deg315 => "315_degrees",
        }
    }

    /// Produces this variant of `image`.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Rotation::Original => image.clone(),
            // `DynamicImage::rotate*` turn clockwise.
            Rotation::Deg90 => image.rotate270(),
            Rotation::Deg180 => image.rotate180(),
            Rotation::Deg270 => image.rotate90(),
            Rotation::Flipped => image.flipv(),
            Rotation::Mirrored => image.fliph(),
            Rotation::Deg45 => rotate_about_center(image, 45.0),
            Rotation::Deg135 => rotate_about_center(image, 135.0),
            Rotation::Deg225 => rotate_about_center(image, 225.0),
            Rotation::Deg315 => rotate_about_center(image, 315.0),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Writes `image` to a fresh PNG under `scratch_dir` (system temp dir when `None`).
///
/// The file is removed when the returned handle drops, on every exit path.
pub fn write_scratch_png(
    image: &DynamicImage,
    label: &str,
    scratch_dir: Option<&Path>,
) -> Result<NamedTempFile, ImagingError> {
    let dir = scratch_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir);

    let file = tempfile::Builder::new()
        .prefix(&format!("lookbook-{label}-"))
        .suffix(".png")
        .tempfile_in(&dir)
        .map_err(|source| ImagingError::ScratchFile {
            dir: dir.clone(),
            source,
        })?;

    image
        .save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| ImagingError::EncodeFailed {
            path: file.path().to_path_buf(),
            reason: e.to_string(),
        })?;

    debug!(path = %file.path().display(), label, "Wrote scratch image");
    Ok(file)
}
