//! Result enrichment and color-aware ranking.
//!
//! Brand, price, material and pattern are placeholders drawn from an
//! [`AttributeSource`]; the default [`SeededAttributes`] keeps them stable per
//! catalog id. Color matching against the query colors drives the final order.

pub mod attributes;
pub mod error;
pub mod ranker;
pub mod tables;


pub use attributes::{AttributeSource, EntropyAttributes, SeededAttributes};
pub use error::EnrichError;

use serde::Serialize;
use tracing::{debug, warn};

use crate::color::{ColorName, canonicalize, canonicalize_all};
use crate::outcome::{PipelineError, StageOutcome};
use crate::search::CandidateResult;

const SALT_BRAND: &str = "brand";
const SALT_PRICE: &str = "price";
const SALT_MATERIAL: &str = "material";
const SALT_PATTERN: &str = "pattern";

/// A retrieved result with derived attributes and its color verdict.
///
/// Attribute fields are `None` only when enrichment failed and the input was
/// passed through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub candidate: CandidateResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "colorMatch")]
    pub color_match: bool,
}

impl EnrichedResult {
    /// Wraps `candidate` with no derived attributes.
    pub fn passthrough(candidate: CandidateResult) -> Self {
        Self {
            candidate,
            brand: None,
            price: None,
            material: None,
            pattern: None,
            color_match: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    pub fn similarity(&self) -> f32 {
        self.candidate.similarity
    }
}

struct Attributes {
    brand: Option<String>,
    price: String,
    material: String,
    pattern: String,
}

/// Derives attributes, applies the color boost, and ranks.
#[derive(Debug, Clone, Default)]
pub struct Enricher<A = SeededAttributes> {
    source: A,
}

impl Enricher<SeededAttributes> {
    /// Enricher whose attributes are stable per catalog id.
    pub fn seeded() -> Self {
        Self {
            source: SeededAttributes,
        }
    }
}

impl<A: AttributeSource> Enricher<A> {
    pub fn new(source: A) -> Self {
        Self { source }
    }

    /// Enriches and ranks `candidates` against `target_colors`.
    ///
    /// Color labels are canonicalized first; unknown labels are ignored. A
    /// result matches when its own canonical base color is among the targets,
    /// and matched similarities are boosted. On failure the candidates come
    /// back unranked and un-enriched as the `Failed` fallback.
    pub fn enrich<S: AsRef<str>>(
        &self,
        candidates: Vec<CandidateResult>,
        target_colors: &[S],
    ) -> StageOutcome<Vec<EnrichedResult>> {
        let targets = canonicalize_all(target_colors);

        let derived: Result<Vec<Attributes>, EnrichError> =
            candidates.iter().map(|c| self.derive(c)).collect();

        let attributes = match derived {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!(error = %e, "Enrichment failed, returning results unchanged");
                return StageOutcome::Failed {
                    fallback: candidates
                        .into_iter()
                        .map(EnrichedResult::passthrough)
                        .collect(),
                    error: PipelineError::from(e),
                };
            }
        };

        let mut results: Vec<EnrichedResult> = candidates
            .into_iter()
            .zip(attributes)
            .map(|(mut candidate, attributes)| {
                let color_match = matches_any(&candidate, &targets);
                if color_match {
                    candidate.similarity = ranker::boost(candidate.similarity);
                }
                EnrichedResult {
                    candidate,
                    brand: attributes.brand,
                    price: Some(attributes.price),
                    material: Some(attributes.material),
                    pattern: Some(attributes.pattern),
                    color_match,
                }
            })
            .collect();

        ranker::rank(&mut results);

        debug!(
            results = results.len(),
            targets = targets.len(),
            color_matches = results.iter().filter(|r| r.color_match).count(),
            "Results enriched"
        );
        StageOutcome::Complete(results)
    }

    fn derive(&self, candidate: &CandidateResult) -> Result<Attributes, EnrichError> {
        let key = candidate.id.as_str();
        let article_type = candidate.article_type();

        let brand = match tables::brand_in_name(&candidate.name.to_lowercase()) {
            Some(brand) => Some(brand.to_string()),
            None if !candidate.is_degraded() => {
                let index = self.pick(key, SALT_BRAND, tables::BRANDS.len())?;
                Some(tables::BRANDS[index].1.to_string())
            }
            None => None,
        };

        let (min, max) = tables::price_range(article_type);
        let price = min + (max - min) * self.fraction(key, SALT_PRICE)?;

        let materials = tables::materials(article_type);
        let material = materials[self.pick(key, SALT_MATERIAL, materials.len())?];

        let pattern = tables::PATTERNS[self.pick(key, SALT_PATTERN, tables::PATTERNS.len())?];

        Ok(Attributes {
            brand,
            price: format!("${price:.2}"),
            material: material.to_string(),
            pattern: pattern.to_string(),
        })
    }

    fn pick(&self, key: &str, salt: &'static str, len: usize) -> Result<usize, EnrichError> {
        let index = self.source.pick(key, salt, len);
        if index >= len {
            return Err(EnrichError::PickOutOfRange { salt, index, len });
        }
        Ok(index)
    }

    fn fraction(&self, key: &str, salt: &'static str) -> Result<f64, EnrichError> {
        let value = self.source.fraction(key, salt);
        if !(0.0..1.0).contains(&value) {
            return Err(EnrichError::InvalidFraction { salt, value });
        }
        Ok(value)
    }
}

fn matches_any(candidate: &CandidateResult, targets: &[ColorName]) -> bool {
    if targets.is_empty() {
        return false;
    }
    candidate
        .base_color()
        .and_then(canonicalize)
        .is_some_and(|color| targets.contains(&color))
}
