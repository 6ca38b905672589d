use std::sync::Arc;

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::EmbeddingError;
use crate::hashing::content_seed;

/// Text and image encoder sharing one embedding space.
///
/// Every returned vector is L2-normalized and `embedding_dim()` long.
pub trait Encoder {
    /// Output vector length.
    fn embedding_dim(&self) -> usize;

    /// Embeds one string.
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds one decoded image.
    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several strings, in order.
    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed_text(text)).collect()
    }
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed_text(text)
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed_image(image)
    }

    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_texts(texts)
    }
}

impl<E: Encoder + ?Sized> Encoder for Arc<E> {
    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed_text(text)
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed_image(image)
    }

    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_texts(texts)
    }
}

/// Scales `v` to unit length.
pub fn l2_normalize(mut v: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if !norm.is_finite() || norm <= f32::EPSILON {
        return Err(EmbeddingError::DegenerateVector);
    }

    for x in &mut v {
        *x /= norm;
    }
    Ok(v)
}

/// Dot product; cosine similarity when both inputs are unit vectors.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Joint query vector for two unit embeddings: their sum, renormalized.
///
/// The norm of the sum depends on the angle between the inputs, so it is
/// recomputed here rather than assumed.
pub fn combine_normalized(a: &[f32], b: &[f32]) -> Result<Vec<f32>, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    l2_normalize(a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
}

/// Deterministic unit vector seeded from `content`. Used by stub encoders.
pub(crate) fn stub_vector(domain: &str, content: &[u8], dim: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(content_seed(domain, content));
    let raw: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0)).collect();

    l2_normalize(raw).unwrap_or_else(|_| {
        let mut axis = vec![0.0; dim];
        if let Some(first) = axis.first_mut() {
            *first = 1.0;
        }
        axis
    })
}
