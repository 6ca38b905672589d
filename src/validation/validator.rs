use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::color::extract_dominant_colors;
use crate::constants::MAX_DOMINANT_COLORS;
use crate::embedding::{EmbeddingError, Encoder, dot};
use crate::imaging::decode_image;
use crate::outcome::{PipelineError, StageOutcome};

use super::prompts::all_prompts;
use super::types::{CategoryScore, ValidationPolicy, ValidationResult};

/// Zero-shot classifier deciding whether an image shows fashion.
///
/// Prompt embeddings are computed on first use and reused afterwards.
pub struct RelevanceValidator<E> {
    encoder: E,
    policy: ValidationPolicy,
    prompts: Vec<&'static str>,
    prompt_embeddings: Mutex<Option<Arc<Vec<Vec<f32>>>>>,
}

impl<E> std::fmt::Debug for RelevanceValidator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceValidator")
            .field("policy", &self.policy)
            .field("prompts", &self.prompts.len())
            .field("cached", &self.prompt_embeddings.lock().is_some())
            .finish()
    }
}

impl<E: Encoder> RelevanceValidator<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            policy: ValidationPolicy::default(),
            prompts: all_prompts(),
            prompt_embeddings: Mutex::new(None),
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    fn prompt_embeddings(&self) -> Result<Arc<Vec<Vec<f32>>>, EmbeddingError> {
        let mut cached = self.prompt_embeddings.lock();
        if let Some(embeddings) = cached.as_ref() {
            return Ok(Arc::clone(embeddings));
        }

        let embeddings = Arc::new(self.encoder.embed_texts(&self.prompts)?);
        if embeddings.len() != self.prompts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "encoder returned {} prompt embeddings for {} prompts",
                    embeddings.len(),
                    self.prompts.len()
                ),
            });
        }
        debug!(prompts = embeddings.len(), "Cached category prompt embeddings");
        *cached = Some(Arc::clone(&embeddings));
        Ok(embeddings)
    }

    /// Scores every prompt against `image` and keeps the top categories.
    ///
    /// Confidences are `softmax(logit_scale * cosine)` over all prompts.
    pub fn rank_categories(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<CategoryScore>, EmbeddingError> {
        let image_embedding = self.encoder.embed_image(image)?;
        let prompt_embeddings = self.prompt_embeddings()?;

        let logits: Vec<f64> = prompt_embeddings
            .iter()
            .map(|prompt| {
                if prompt.len() != image_embedding.len() {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: image_embedding.len(),
                        actual: prompt.len(),
                    });
                }
                Ok(f64::from(self.policy.logit_scale) * f64::from(dot(&image_embedding, prompt)))
            })
            .collect::<Result<_, _>>()?;

        let probabilities = softmax(&logits);
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "non-finite category confidence".to_string(),
            });
        }

        let mut ranked: Vec<CategoryScore> = self
            .prompts
            .iter()
            .zip(probabilities)
            .map(|(name, p)| CategoryScore::new(*name, p as f32))
            .collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(self.policy.top_categories);
        Ok(ranked)
    }

    /// Classifies `image` without touching its colors.
    pub fn classify(&self, image: &DynamicImage) -> Result<ValidationResult, EmbeddingError> {
        let categories = self.rank_categories(image)?;
        let decision = self.policy.decide(&categories);

        if decision.vetoed {
            debug!(
                top = categories.first().map(|c| c.name.as_str()),
                "Top category vetoes fashion match"
            );
        }

        Ok(ValidationResult {
            is_fashion_related: decision.is_fashion_related,
            categories,
            dominant_colors: Vec::new(),
            is_accessory: decision.is_accessory,
            rotation: None,
            accessory_override: false,
            rotated_validation: None,
        })
    }

    /// Validates a decoded image and attaches its dominant colors.
    ///
    /// Fails closed: an encoder error yields [`ValidationResult::rejected`].
    pub fn validate(&self, image: &DynamicImage) -> StageOutcome<ValidationResult> {
        match self.classify(image) {
            Ok(mut result) => {
                result.dominant_colors = extract_dominant_colors(image, MAX_DOMINANT_COLORS);
                debug!(verdict = %result, "Image validated");
                StageOutcome::Complete(result)
            }
            Err(e) => {
                warn!(error = %e, "Image validation failed, rejecting");
                StageOutcome::Failed {
                    fallback: ValidationResult::rejected(),
                    error: PipelineError::from(e),
                }
            }
        }
    }

    /// Decodes `path` and validates it. Decode failures also fail closed.
    pub fn validate_path(&self, path: &Path) -> StageOutcome<ValidationResult> {
        match decode_image(path) {
            Ok(image) => self.validate(&image),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Image could not be decoded, rejecting");
                StageOutcome::Failed {
                    fallback: ValidationResult::rejected(),
                    error: PipelineError::from(e),
                }
            }
        }
    }
}

/// Numerically stable softmax.
pub(crate) fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
