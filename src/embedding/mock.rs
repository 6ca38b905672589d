//! Scripted encoder for tests.
//!
//! Text is looked up in a table; unknown text falls back to a stub vector.
//! Images are matched on their top-left pixel, which survives decode and lets
//! a test tell rotation variants apart by what lands in that corner.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::DynamicImage;

use super::encoder::{Encoder, l2_normalize, stub_vector};
use super::error::EmbeddingError;

/// In-memory [`Encoder`] with programmable outputs and failures.
#[derive(Debug, Default)]
pub struct ScriptedEncoder {
    dim: usize,
    texts: HashMap<String, Vec<f32>>,
    images: Vec<([u8; 3], Vec<f32>)>,
    default_image: Option<Vec<f32>>,
    fail_text: bool,
    fail_image: bool,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl ScriptedEncoder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }

    /// Returns `vector` (normalized) for exactly `text`.
    pub fn with_text(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.texts.insert(text.to_string(), normalize_or_keep(vector));
        self
    }

    /// Returns `vector` (normalized) for images whose top-left pixel is `corner`.
    pub fn with_image(mut self, corner: [u8; 3], vector: Vec<f32>) -> Self {
        self.images.push((corner, normalize_or_keep(vector)));
        self
    }

    /// Returns `vector` (normalized) for images no corner rule matches.
    pub fn with_default_image(mut self, vector: Vec<f32>) -> Self {
        self.default_image = Some(normalize_or_keep(vector));
        self
    }

    /// Makes every text call fail.
    pub fn failing_text(mut self) -> Self {
        self.fail_text = true;
        self
    }

    /// Makes every image call fail.
    pub fn failing_images(mut self) -> Self {
        self.fail_image = true;
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::Relaxed)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::Relaxed)
    }
}

fn normalize_or_keep(vector: Vec<f32>) -> Vec<f32> {
    l2_normalize(vector.clone()).unwrap_or(vector)
}

impl Encoder for ScriptedEncoder {
    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.text_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_text {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("scripted text failure for {text:?}"),
            });
        }

        Ok(self
            .texts
            .get(text)
            .cloned()
            .unwrap_or_else(|| stub_vector("text", text.as_bytes(), self.dim)))
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>, EmbeddingError> {
        self.image_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_image {
            return Err(EmbeddingError::InferenceFailed {
                reason: "scripted image failure".to_string(),
            });
        }

        let rgb = image.to_rgb8();
        let corner = rgb.get_pixel_checked(0, 0).map(|p| p.0);

        let scripted = corner.and_then(|corner| {
            self.images
                .iter()
                .find(|(c, _)| *c == corner)
                .map(|(_, v)| v.clone())
        });

        Ok(scripted
            .or_else(|| self.default_image.clone())
            .unwrap_or_else(|| stub_vector("image", rgb.as_raw(), self.dim)))
    }
}

/// Unit basis vector `e_axis` of length `dim`.
pub fn basis(dim: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    if let Some(slot) = v.get_mut(axis) {
        *slot = 1.0;
    }
    v
}

/// Unit vector whose cosine with `e_0` is `cos`, leaning toward `e_axis`.
pub fn at_cosine(dim: usize, cos: f32, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[0] = cos;
    v[axis] = (1.0 - cos * cos).max(0.0).sqrt();
    v
}
