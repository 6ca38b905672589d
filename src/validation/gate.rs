use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::color::extract_dominant_colors;
use crate::constants::MAX_DOMINANT_COLORS;
use crate::embedding::Encoder;
use crate::imaging::decode_image;
use crate::outcome::{PipelineError, StageOutcome};

use super::{RelevanceValidator, RotationFallback, ValidationResult};

/// Options for a full relevance check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOptions {
    /// Try rotated variants when the direct check rejects the image.
    pub rotation_check: bool,
    /// Guarantee `dominantColors` is filled, re-extracting if needed.
    pub color_detection: bool,
}

/// Direct validation followed, when asked, by the rotation fallback.
#[derive(Debug)]
pub struct FashionGate<E> {
    validator: RelevanceValidator<E>,
    fallback: RotationFallback,
}

impl<E: Encoder> FashionGate<E> {
    pub fn new(validator: RelevanceValidator<E>, fallback: RotationFallback) -> Self {
        Self {
            validator,
            fallback,
        }
    }

    pub fn validator(&self) -> &RelevanceValidator<E> {
        &self.validator
    }

    /// Validates the image at `path`.
    ///
    /// An unreadable image is `Failed`; otherwise see [`FashionGate::check_image`].
    pub fn check(&self, path: &Path, options: GateOptions) -> StageOutcome<ValidationResult> {
        match decode_image(path) {
            Ok(image) => self.check_image(&image, options),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Image could not be decoded");
                StageOutcome::Failed {
                    fallback: ValidationResult::rejected(),
                    error: PipelineError::from(e),
                }
            }
        }
    }

    /// Validates a decoded image.
    ///
    /// The fallback only runs when the direct verdict is negative; its best
    /// result is attached as `rotated_validation`. The returned outcome is
    /// `Rejected` when neither verdict admits the image and `Failed` when the
    /// image could not be encoded.
    pub fn check_image(
        &self,
        image: &DynamicImage,
        options: GateOptions,
    ) -> StageOutcome<ValidationResult> {
        let direct = self.validator.validate(image);
        let mut issues: Vec<String> = Vec::new();
        let (mut result, failure) = match direct {
            StageOutcome::Failed { fallback, error } => (fallback, Some(error)),
            other => (other.into_value(), None),
        };

        if options.rotation_check && !result.is_fashion_related {
            debug!("Direct validation negative, trying rotations");
            let rotated = self.fallback.run(&self.validator, image);
            issues.extend(rotated.issues().iter().cloned());
            if let Some(best) = rotated.into_value() {
                result.rotated_validation = Some(Box::new(best));
            }
        }

        if options.color_detection && result.dominant_colors.is_empty() {
            result.dominant_colors = extract_dominant_colors(image, MAX_DOMINANT_COLORS);
        }

        if let Some(error) = failure
            && result.rotated_validation.is_none()
        {
            return StageOutcome::Failed {
                fallback: result,
                error,
            };
        }

        if !result.admits() {
            info!(verdict = %result, "Image is not fashion-related");
            let reason = format!("image is not fashion-related: {result}");
            return StageOutcome::Rejected {
                value: result,
                reason,
            };
        }

        StageOutcome::with_issues(result, issues)
    }
}
