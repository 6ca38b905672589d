use image::{DynamicImage, Rgb, RgbImage};

/// Rotates counter-clockwise by `degrees` about the image center, keeping the
/// canvas size. Samples nearest-neighbor; uncovered pixels are black.
pub fn rotate_about_center(image: &DynamicImage, degrees: f64) -> DynamicImage {
    let source = image.to_rgb8();
    let (width, height) = source.dimensions();
    let mut out = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));

    let (sin, cos) = degrees.to_radians().sin_cos();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;

        // inverse map into the source (y grows downward)
        let sx = (cx + dx * cos - dy * sin).floor();
        let sy = (cy + dx * sin + dy * cos).floor();

        if sx >= 0.0 && sy >= 0.0 && sx < width as f64 && sy < height as f64 {
            *pixel = *source.get_pixel(sx as u32, sy as u32);
        }
    }

    DynamicImage::ImageRgb8(out)
}
