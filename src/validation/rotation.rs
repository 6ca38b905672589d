use std::path::PathBuf;

use image::DynamicImage;
use tracing::{debug, info};

use crate::constants::{ACCESSORY_THRESHOLD, ACCESSORY_WINDOW, FASHION_WINDOW};
use crate::embedding::Encoder;
use crate::imaging::{Rotation, write_scratch_png};
use crate::outcome::StageOutcome;

use super::RelevanceValidator;
use super::prompts::{ACCESSORY_CATEGORIES, ROTATION_FASHION_KEYWORDS, mentions_any};
use super::types::ValidationResult;

/// Re-validates geometric variants of an image the direct check rejected.
///
/// Each variant is written to a scratch PNG, validated from disk, and the
/// file removed before the next variant starts.
#[derive(Debug, Clone)]
pub struct RotationFallback {
    scratch_dir: Option<PathBuf>,
    rotations: Vec<Rotation>,
    fashion_window: usize,
    accessory_window: usize,
    accessory_threshold: f32,
}

impl Default for RotationFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationFallback {
    /// Fallback over all ten variants, writing to the system temp dir.
    pub fn new() -> Self {
        Self {
            scratch_dir: None,
            rotations: Rotation::ALL.to_vec(),
            fashion_window: FASHION_WINDOW,
            accessory_window: ACCESSORY_WINDOW,
            accessory_threshold: ACCESSORY_THRESHOLD,
        }
    }

    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    /// Confidence an accessory category needs to override a rejection.
    ///
    /// Independent of the validator's own accessory threshold, so a stricter
    /// validator policy can still be overridden here.
    pub fn with_accessory_threshold(mut self, threshold: f32) -> Self {
        self.accessory_threshold = threshold;
        self
    }

    /// Restricts the variants tried, keeping the given order.
    pub fn with_rotations(mut self, rotations: &[Rotation]) -> Self {
        self.rotations = rotations.to_vec();
        self
    }

    /// Returns the best variant's result, or `None` when no variant qualifies.
    ///
    /// Variants the validator accepts compete on their fashion confidence.
    /// Variants it rejects can still win through an accessory category above
    /// the accessory threshold; such a win sets `accessory_override`. Either
    /// way a candidate must beat the best confidence seen so far.
    pub fn run<E: Encoder>(
        &self,
        validator: &RelevanceValidator<E>,
        image: &DynamicImage,
    ) -> StageOutcome<Option<ValidationResult>> {
        let mut best: Option<ValidationResult> = None;
        let mut best_confidence = 0.0f32;
        let mut issues: Vec<String> = Vec::new();

        for rotation in &self.rotations {
            let variant = rotation.apply(image);
            let scratch =
                match write_scratch_png(&variant, rotation.as_str(), self.scratch_dir.as_deref()) {
                    Ok(file) => file,
                    Err(e) => {
                        debug!(rotation = %rotation, error = %e, "Skipping variant");
                        issues.push(format!("{rotation}: {e}"));
                        continue;
                    }
                };

            let outcome = validator.validate_path(scratch.path());
            drop(scratch);

            if let Some(e) = outcome.error() {
                debug!(rotation = %rotation, error = %e, "Variant validation failed");
                issues.push(format!("{rotation}: {e}"));
                continue;
            }
            let mut result = outcome.into_value();

            if result.is_fashion_related {
                let confidence = result
                    .categories
                    .iter()
                    .take(self.fashion_window)
                    .filter(|c| mentions_any(&c.name, ROTATION_FASHION_KEYWORDS))
                    .map(|c| c.confidence)
                    .fold(0.0f32, f32::max);

                if confidence > best_confidence {
                    best_confidence = confidence;
                    result.rotation = Some(*rotation);
                    best = Some(result);
                }
                continue;
            }

            let accessory = result
                .categories
                .iter()
                .take(self.accessory_window)
                .filter(|c| {
                    mentions_any(&c.name, ACCESSORY_CATEGORIES)
                        && c.confidence > self.accessory_threshold
                })
                .map(|c| c.confidence)
                .fold(0.0f32, f32::max);

            if accessory > best_confidence {
                best_confidence = accessory;
                result.is_fashion_related = true;
                result.accessory_override = true;
                result.rotation = Some(*rotation);
                best = Some(result);
            }
        }

        match &best {
            Some(result) => info!(
                rotation = result.rotation.map(|r| r.as_str()),
                confidence = best_confidence,
                accessory_override = result.accessory_override,
                "Rotated variant accepted"
            ),
            None => debug!("No rotated variant qualified"),
        }

        StageOutcome::with_issues(best, issues)
    }
}
