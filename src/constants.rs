//! Cross-cutting, shared constants.
//!
//! Thresholds and window sizes here are the defaults behind
//! [`ValidationPolicy`](crate::validation::ValidationPolicy) and
//! [`CoherenceChecker`](crate::coherence::CoherenceChecker). Prefer deriving
//! secondary constants from primary ones to avoid drift.

/// CLIP ViT-B/32 projection dimension.
pub const CLIP_EMBEDDING_DIM: usize = 512;

/// CLIP vision input resolution (square).
pub const CLIP_IMAGE_SIZE: usize = 224;

/// CLIP text context length.
pub const CLIP_MAX_SEQ_LEN: usize = 77;

/// Scale applied to cosine similarities before the zero-shot softmax.
pub const ZERO_SHOT_LOGIT_SCALE: f32 = 100.0;

/// Number of ranked categories kept on a validation result.
pub const VALIDATION_TOP_CATEGORIES: usize = 10;

/// A fashion category in this many top slots can admit an image.
pub const FASHION_WINDOW: usize = 3;

/// Minimum confidence for a fashion category to admit an image.
pub const FASHION_THRESHOLD: f32 = 0.35;

/// An accessory category in this many top slots can admit an image.
pub const ACCESSORY_WINDOW: usize = 5;

/// Minimum confidence for an accessory category to admit an image.
pub const ACCESSORY_THRESHOLD: f32 = 0.2;

/// A top-1 non-fashion category above this confidence vetoes the fashion path.
pub const NON_FASHION_VETO_THRESHOLD: f32 = 0.5;

/// Text/image cosine similarity at or above which a pair is coherent.
pub const COHERENCE_THRESHOLD: f32 = 0.2;

/// Default number of results returned per search.
pub const DEFAULT_TOP_K: usize = 5;

/// Text searches over-fetch `top_k * TEXT_FETCH_MULTIPLIER` candidates.
pub const TEXT_FETCH_MULTIPLIER: usize = 2;

/// Image and multimodal searches over-fetch `top_k * IMAGE_FETCH_MULTIPLIER`.
pub const IMAGE_FETCH_MULTIPLIER: usize = 3;

/// Side length images are downsampled to before pixel counting.
pub const COLOR_SAMPLE_SIZE: u32 = 100;

/// Maximum number of dominant colors reported.
pub const MAX_DOMINANT_COLORS: usize = 3;

/// Similarity multiplier for color-matched results (capped at 1.0).
pub const COLOR_MATCH_BOOST: f32 = 1.2;
