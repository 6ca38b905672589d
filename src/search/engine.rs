use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::catalog::CatalogStore;
use crate::coherence::{CoherenceChecker, CoherenceResult};
use crate::color::extract_dominant_colors;
use crate::constants::{IMAGE_FETCH_MULTIPLIER, MAX_DOMINANT_COLORS, TEXT_FETCH_MULTIPLIER};
use crate::embedding::{Encoder, combine_normalized};
use crate::enrich::{AttributeSource, EnrichedResult, Enricher, SeededAttributes};
use crate::imaging::decode_image;
use crate::index::{IdMap, VectorIndex};
use crate::outcome::{PipelineError, StageOutcome};
use crate::validation::{
    FashionGate, GateOptions, RelevanceValidator, RotationFallback, ValidationResult,
};

use super::blocklist::Blocklist;
use super::types::{CandidateResult, SearchOptions};

/// Text, image and multimodal product search over one index and catalog.
///
/// The encoder is cloned into the relevance gate and the coherence checker,
/// so it is typically a reference or an `Arc`.
pub struct SearchEngine<E, I, C, A = SeededAttributes> {
    encoder: E,
    gate: FashionGate<E>,
    coherence: CoherenceChecker<E>,
    index: I,
    ids: IdMap,
    catalog: C,
    enricher: Enricher<A>,
    blocklist: Blocklist,
}

impl<E, I, C, A> std::fmt::Debug for SearchEngine<E, I, C, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("ids", &self.ids.len())
            .finish_non_exhaustive()
    }
}

impl<E, I, C> SearchEngine<E, I, C, SeededAttributes>
where
    E: Encoder + Clone,
    I: VectorIndex,
    C: CatalogStore,
{
    pub fn new(encoder: E, index: I, ids: IdMap, catalog: C) -> Self {
        Self {
            gate: FashionGate::new(
                RelevanceValidator::new(encoder.clone()),
                RotationFallback::new(),
            ),
            coherence: CoherenceChecker::new(encoder.clone()),
            encoder,
            index,
            ids,
            catalog,
            enricher: Enricher::seeded(),
            blocklist: Blocklist::default(),
        }
    }
}

impl<E, I, C, A> SearchEngine<E, I, C, A>
where
    E: Encoder + Clone,
    I: VectorIndex,
    C: CatalogStore,
    A: AttributeSource,
{
    /// Replaces the attribute source used for enrichment.
    pub fn with_enricher<B: AttributeSource>(
        self,
        enricher: Enricher<B>,
    ) -> SearchEngine<E, I, C, B> {
        SearchEngine {
            encoder: self.encoder,
            gate: self.gate,
            coherence: self.coherence,
            index: self.index,
            ids: self.ids,
            catalog: self.catalog,
            enricher,
            blocklist: self.blocklist,
        }
    }

    pub fn with_fallback(mut self, fallback: RotationFallback) -> Self {
        self.gate = FashionGate::new(RelevanceValidator::new(self.encoder.clone()), fallback);
        self
    }

    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn gate(&self) -> &FashionGate<E> {
        &self.gate
    }

    pub fn coherence(&self) -> &CoherenceChecker<E> {
        &self.coherence
    }

    /// Searches by a text query.
    ///
    /// Queries hitting the blocklist are `Rejected` with no results. Caller
    /// colors, if any, drive the color ranking.
    pub fn search_text(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> StageOutcome<Vec<EnrichedResult>> {
        if let Some(keyword) = self.blocklist.find(query) {
            warn!(
                query,
                keyword = keyword.as_str(),
                "Query contains non-fashion terms, search for fashion products instead"
            );
            return StageOutcome::Rejected {
                value: Vec::new(),
                reason: format!("query contains non-fashion term '{keyword}'"),
            };
        }

        let embedding = match self.encoder.embed_text(query) {
            Ok(embedding) => embedding,
            Err(e) => return failed("text search", e.into()),
        };

        let fetch = options.top_k.saturating_mul(TEXT_FETCH_MULTIPLIER);
        self.finish(&embedding, fetch, &options.dominant_colors, options.top_k)
    }

    /// Searches by the image at `path`, gated by the relevance check.
    ///
    /// Colors detected during validation are used when the caller supplied
    /// none.
    pub fn search_image(
        &self,
        path: &Path,
        options: &SearchOptions,
    ) -> StageOutcome<Vec<EnrichedResult>> {
        let image = match decode_image(path) {
            Ok(image) => image,
            Err(e) => return failed("image search", e.into()),
        };

        let gate_options = GateOptions {
            rotation_check: options.rotation_check,
            color_detection: false,
        };
        let validation = match self.gate.check_image(&image, gate_options) {
            StageOutcome::Rejected { reason, .. } => {
                warn!(path = %path.display(), "Uploaded image is not fashion-related");
                return StageOutcome::Rejected {
                    value: Vec::new(),
                    reason,
                };
            }
            StageOutcome::Failed { error, .. } => return failed("image search", error),
            outcome => outcome.into_value(),
        };

        let colors = query_colors(&options.dominant_colors, &validation);

        let embedding = match self.encoder.embed_image(&image) {
            Ok(embedding) => embedding,
            Err(e) => return failed("image search", e.into()),
        };

        let fetch = options.top_k.saturating_mul(IMAGE_FETCH_MULTIPLIER);
        self.finish(&embedding, fetch, &colors, options.top_k)
    }

    /// Searches by a text query and an image together.
    ///
    /// Coherence is advisory: an incoherent pair is logged and searched
    /// anyway. The query vector is the renormalized sum of both embeddings.
    pub fn search_multimodal(
        &self,
        query: &str,
        path: &Path,
        options: &SearchOptions,
    ) -> StageOutcome<Vec<EnrichedResult>> {
        let image = match decode_image(path) {
            Ok(image) => image,
            Err(e) => return failed("multimodal search", e.into()),
        };

        let coherence = self.coherence.check(query, &image).into_value();
        if !coherence.is_coherent {
            warn!(
                similarity = coherence.similarity,
                "Text query and image may not be coherent"
            );
        }

        let colors = if options.dominant_colors.is_empty() {
            image_colors(&image)
        } else {
            options.dominant_colors.clone()
        };

        let embedding = match self.multimodal_embedding(query, &image) {
            Ok(embedding) => embedding,
            Err(e) => return failed("multimodal search", e),
        };

        let fetch = options.top_k.saturating_mul(IMAGE_FETCH_MULTIPLIER);
        self.finish(&embedding, fetch, &colors, options.top_k)
    }

    /// Standalone relevance check of the image at `path`.
    pub fn validate(&self, path: &Path, options: GateOptions) -> StageOutcome<ValidationResult> {
        self.gate.check(path, options)
    }

    /// Standalone coherence check of `query` against the image at `path`.
    pub fn check_coherence(&self, query: &str, path: &Path) -> StageOutcome<CoherenceResult> {
        self.coherence.check_path(query, path)
    }

    fn multimodal_embedding(
        &self,
        query: &str,
        image: &DynamicImage,
    ) -> Result<Vec<f32>, PipelineError> {
        let text = self.encoder.embed_text(query)?;
        let image = self.encoder.embed_image(image)?;
        Ok(combine_normalized(&text, &image)?)
    }

    /// Resolves up to `fetch` neighbors into candidates, one per slot.
    ///
    /// A position without an id or an id without a catalog row becomes a
    /// degraded candidate and an issue; the slot is never dropped.
    pub fn retrieve(&self, query: &[f32], fetch: usize) -> StageOutcome<Vec<CandidateResult>> {
        let neighbors = match self.index.search(query, fetch) {
            Ok(neighbors) => neighbors,
            Err(e) => return failed("retrieval", e.into()),
        };

        let mut candidates = Vec::with_capacity(neighbors.len());
        let mut issues = Vec::new();

        for neighbor in neighbors {
            let similarity = 1.0 - neighbor.distance;

            let Some(id) = self.ids.get(neighbor.position) else {
                warn!(position = neighbor.position, "Index position has no id");
                issues.push(format!("index position {} has no id", neighbor.position));
                candidates.push(CandidateResult::degraded(
                    neighbor.position.to_string(),
                    similarity,
                ));
                continue;
            };

            match self.catalog.lookup(id) {
                Some(record) => candidates.push(CandidateResult::from_record(record, similarity)),
                None => {
                    warn!(id, "No metadata found for product");
                    issues.push(format!("no catalog row for id {id}"));
                    candidates.push(CandidateResult::degraded(id, similarity));
                }
            }
        }

        debug!(
            fetched = candidates.len(),
            degraded = issues.len(),
            "Candidates retrieved"
        );
        StageOutcome::with_issues(candidates, issues)
    }

    /// Retrieval, enrichment, then truncation to `top_k`.
    fn finish<S: AsRef<str>>(
        &self,
        query: &[f32],
        fetch: usize,
        colors: &[S],
        top_k: usize,
    ) -> StageOutcome<Vec<EnrichedResult>> {
        let (candidates, mut issues) = match self.retrieve(query, fetch) {
            StageOutcome::Failed { error, .. } => {
                return StageOutcome::Failed {
                    fallback: Vec::new(),
                    error,
                };
            }
            StageOutcome::Degraded { value, issues } => (value, issues),
            other => (other.into_value(), Vec::new()),
        };

        let enriched = self.enricher.enrich(candidates, colors);
        if let Some(error) = enriched.error() {
            issues.push(format!("enrichment skipped: {error}"));
        }

        let mut results = enriched.into_value();
        results.truncate(top_k);

        info!(
            results = results.len(),
            degraded = issues.len(),
            "Search complete"
        );
        StageOutcome::with_issues(results, issues)
    }
}

fn failed<T>(stage: &str, error: PipelineError) -> StageOutcome<Vec<T>> {
    warn!(stage, error = %error, "Stage failed, returning no results");
    StageOutcome::Failed {
        fallback: Vec::new(),
        error,
    }
}

fn query_colors(supplied: &[String], validation: &ValidationResult) -> Vec<String> {
    if !supplied.is_empty() {
        return supplied.to_vec();
    }
    validation
        .admitted_colors()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}

fn image_colors(image: &DynamicImage) -> Vec<String> {
    extract_dominant_colors(image, MAX_DOMINANT_COLORS)
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}
