use serde::Serialize;

use crate::color::ColorName;
use crate::constants::{
    ACCESSORY_THRESHOLD, ACCESSORY_WINDOW, FASHION_THRESHOLD, FASHION_WINDOW,
    NON_FASHION_VETO_THRESHOLD, VALIDATION_TOP_CATEGORIES, ZERO_SHOT_LOGIT_SCALE,
};
use crate::imaging::Rotation;
use crate::payload::finite_or_null;

use super::prompts::{is_accessory, is_fashion, is_non_fashion};

/// Softmax confidence for one prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub name: String,
    #[serde(serialize_with = "finite_or_null")]
    pub confidence: f32,
}

impl CategoryScore {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Verdict of the relevance validator, optionally annotated by the rotation fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_fashion_related: bool,
    /// Top categories, highest confidence first.
    pub categories: Vec<CategoryScore>,
    #[serde(rename = "dominantColors")]
    pub dominant_colors: Vec<ColorName>,
    pub is_accessory: bool,
    /// Variant that produced this result (rotation fallback only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    /// Set when an accessory match reversed a rejection.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub accessory_override: bool,
    /// Best rotated variant, attached when the direct check failed.
    #[serde(rename = "rotatedValidation", skip_serializing_if = "Option::is_none")]
    pub rotated_validation: Option<Box<ValidationResult>>,
}

impl ValidationResult {
    /// Fail-closed verdict: not fashion, no categories.
    pub fn rejected() -> Self {
        Self {
            is_fashion_related: false,
            categories: Vec::new(),
            dominant_colors: Vec::new(),
            is_accessory: false,
            rotation: None,
            accessory_override: false,
            rotated_validation: None,
        }
    }

    /// `true` if this result or its rotated variant accepts the image.
    pub fn admits(&self) -> bool {
        self.is_fashion_related
            || self
                .rotated_validation
                .as_ref()
                .is_some_and(|r| r.is_fashion_related)
    }

    /// Colors from whichever result admitted the image (direct first).
    pub fn admitted_colors(&self) -> &[ColorName] {
        match &self.rotated_validation {
            Some(rotated) if !self.is_fashion_related && rotated.is_fashion_related => {
                &rotated.dominant_colors
            }
            _ => &self.dominant_colors,
        }
    }

    /// Highest-ranked category, if any.
    pub fn top_category(&self) -> Option<&CategoryScore> {
        self.categories.first()
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.top_category() {
            Some(top) => write!(
                f,
                "{} (top: {} {:.3})",
                if self.is_fashion_related {
                    "FASHION"
                } else {
                    "NOT_FASHION"
                },
                top.name,
                top.confidence
            ),
            None => write!(f, "NOT_FASHION (no categories)"),
        }
    }
}

/// Thresholds and windows of the relevance decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationPolicy {
    /// Categories kept after ranking.
    pub top_categories: usize,
    /// Leading categories searched for a fashion match.
    pub fashion_window: usize,
    /// A fashion match must be strictly above this.
    pub fashion_threshold: f32,
    /// Leading categories searched for an accessory match.
    pub accessory_window: usize,
    /// An accessory match must be strictly above this.
    pub accessory_threshold: f32,
    /// A non-fashion top-1 strictly above this vetoes the fashion match.
    pub veto_threshold: f32,
    /// Multiplier applied to cosine similarities before the softmax.
    pub logit_scale: f32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            top_categories: VALIDATION_TOP_CATEGORIES,
            fashion_window: FASHION_WINDOW,
            fashion_threshold: FASHION_THRESHOLD,
            accessory_window: ACCESSORY_WINDOW,
            accessory_threshold: ACCESSORY_THRESHOLD,
            veto_threshold: NON_FASHION_VETO_THRESHOLD,
            logit_scale: ZERO_SHOT_LOGIT_SCALE,
        }
    }
}

/// Outcome of [`ValidationPolicy::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub is_fashion_related: bool,
    pub is_accessory: bool,
    pub vetoed: bool,
}

impl ValidationPolicy {
    /// Applies the decision rules to categories ranked highest first.
    ///
    /// Final verdict is `(fashion match AND NOT veto) OR accessory match`; an
    /// accessory match is never undone by the veto.
    pub fn decide(&self, ranked: &[CategoryScore]) -> Decision {
        let fashion_match = ranked
            .iter()
            .take(self.fashion_window)
            .any(|c| is_fashion(&c.name) && c.confidence > self.fashion_threshold);

        let accessory_match = ranked
            .iter()
            .take(self.accessory_window)
            .any(|c| is_accessory(&c.name) && c.confidence > self.accessory_threshold);

        let vetoed = ranked
            .first()
            .is_some_and(|c| is_non_fashion(&c.name) && c.confidence > self.veto_threshold);

        Decision {
            is_fashion_related: (fashion_match && !vetoed) || accessory_match,
            is_accessory: accessory_match,
            vetoed,
        }
    }
}
