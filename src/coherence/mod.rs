//! Text/image coherence check.
//!
//! Advisory only: multimodal search logs incoherent pairs and carries on.

#[cfg(test)]
mod tests;

use std::path::Path;

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::COHERENCE_THRESHOLD;
use crate::embedding::{EmbeddingError, Encoder, dot};
use crate::imaging::decode_image;
use crate::outcome::{PipelineError, StageOutcome};
use crate::payload::finite_or_null;

/// Whether a text query and an image describe the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoherenceResult {
    pub is_coherent: bool,
    /// Cosine similarity of the two unit embeddings, in `[-1, 1]`.
    #[serde(serialize_with = "finite_or_null")]
    pub similarity: f32,
}

impl CoherenceResult {
    /// Fail-open verdict used when the check cannot run.
    pub fn assumed() -> Self {
        Self {
            is_coherent: true,
            similarity: 1.0,
        }
    }
}

impl std::fmt::Display for CoherenceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (similarity: {:.4})",
            if self.is_coherent {
                "COHERENT"
            } else {
                "INCOHERENT"
            },
            self.similarity
        )
    }
}

/// Scores text against an image by raw cosine similarity.
#[derive(Debug)]
pub struct CoherenceChecker<E> {
    encoder: E,
    threshold: f32,
}

impl<E: Encoder> CoherenceChecker<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            threshold: COHERENCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Similarity of `text` and `image`; coherent at or above the threshold.
    pub fn score(&self, text: &str, image: &DynamicImage) -> Result<CoherenceResult, EmbeddingError> {
        let image_embedding = self.encoder.embed_image(image)?;
        let text_embedding = self.encoder.embed_text(text)?;
        if image_embedding.len() != text_embedding.len() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: image_embedding.len(),
                actual: text_embedding.len(),
            });
        }

        let similarity = dot(&image_embedding, &text_embedding);
        if !similarity.is_finite() {
            return Err(EmbeddingError::InferenceFailed {
                reason: "non-finite coherence similarity".to_string(),
            });
        }

        Ok(CoherenceResult {
            is_coherent: similarity >= self.threshold,
            similarity,
        })
    }

    /// Checks a decoded image. Fails open to [`CoherenceResult::assumed`].
    pub fn check(&self, text: &str, image: &DynamicImage) -> StageOutcome<CoherenceResult> {
        match self.score(text, image) {
            Ok(result) => {
                debug!(verdict = %result, "Coherence checked");
                StageOutcome::Complete(result)
            }
            Err(e) => {
                warn!(error = %e, "Coherence check failed, assuming coherent");
                StageOutcome::Failed {
                    fallback: CoherenceResult::assumed(),
                    error: PipelineError::from(e),
                }
            }
        }
    }

    /// Decodes `path` and checks it. Decode failures also fail open.
    pub fn check_path(&self, text: &str, path: &Path) -> StageOutcome<CoherenceResult> {
        match decode_image(path) {
            Ok(image) => self.check(text, &image),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Image could not be decoded, assuming coherent");
                StageOutcome::Failed {
                    fallback: CoherenceResult::assumed(),
                    error: PipelineError::from(e),
                }
            }
        }
    }
}
