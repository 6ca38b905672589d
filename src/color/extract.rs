use std::collections::HashMap;
use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, warn};

use super::{ColorName, identify_color};
use crate::constants::{COLOR_SAMPLE_SIZE, MAX_DOMINANT_COLORS};
use crate::imaging::decode_image;

/// Converts 8-bit RGB to HSV with hue in `[0, 360)` and saturation/value in `[0, 100]`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let v = maxc;

    if maxc == minc {
        return (0.0, 0.0, v * 100.0);
    }

    let delta = maxc - minc;
    let s = delta / maxc;
    let rc = (maxc - r) / delta;
    let gc = (maxc - g) / delta;
    let bc = (maxc - b) / delta;

    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let h = (h / 6.0).rem_euclid(1.0);

    (h * 360.0, s * 100.0, v * 100.0)
}

/// Returns up to `max_colors` canonical names for the most frequent pixels.
///
/// The image is downsampled first to bound cost. Pixel colors are counted
/// exactly; ties keep first-seen order. Names are deduplicated (first seen
/// wins) and the output never exceeds three entries.
pub fn extract_dominant_colors(image: &DynamicImage, max_colors: usize) -> Vec<ColorName> {
    if image.width() == 0 || image.height() == 0 {
        return Vec::new();
    }

    let sample = image
        .resize_exact(COLOR_SAMPLE_SIZE, COLOR_SAMPLE_SIZE, FilterType::Nearest)
        .to_rgb8();

    // pixel -> (count, first-seen position)
    let mut counts: HashMap<[u8; 3], (usize, usize)> = HashMap::new();
    for (position, pixel) in sample.pixels().enumerate() {
        counts.entry(pixel.0).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<([u8; 3], usize, usize)> = counts
        .into_iter()
        .map(|(rgb, (count, first))| (rgb, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let mut names: Vec<ColorName> = Vec::with_capacity(max_colors);
    for ([r, g, b], count, _) in ranked.into_iter().take(max_colors) {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        match identify_color(h, s, v) {
            Some(name) if !names.contains(&name) => names.push(name),
            Some(_) => {}
            None => debug!(r, g, b, count, "Dominant pixel matched no color rule"),
        }
    }

    names.truncate(MAX_DOMINANT_COLORS);
    names
}

/// Decodes `path` and extracts its dominant colors. Decode failures yield an empty list.
pub fn extract_dominant_colors_from_path(path: &Path, max_colors: usize) -> Vec<ColorName> {
    match decode_image(path) {
        Ok(image) => extract_dominant_colors(&image, max_colors),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Color extraction skipped");
            Vec::new()
        }
    }
}
