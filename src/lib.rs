//! Lookbook library crate (used by the CLI and integration tests).
//!
//! # Pipeline
//!
//! A request (text, image, or both) passes the relevance gate (image
//! requests) or the coherence check (multimodal requests), is answered from
//! the nearest-neighbor index, and is enriched and color-ranked before it is
//! returned.
//!
//! ## Stages
//! - [`RelevanceValidator`], [`RotationFallback`], [`FashionGate`] - is this image fashion?
//! - [`CoherenceChecker`] - does the text describe the image?
//! - [`SearchEngine`] - text, image and multimodal retrieval
//! - [`Enricher`] - placeholder attributes and color-aware ranking
//!
//! ## Capabilities
//! - [`Encoder`] with [`ClipEncoder`] (candle CLIP ViT-B/32, or a stub)
//! - [`VectorIndex`] with [`FlatL2Index`] (reads FAISS flat L2 files)
//! - [`CatalogStore`] with [`InMemoryCatalog`] (reads `styles.csv`)
//!
//! Every stage reports a [`StageOutcome`] that always carries a usable value.
//!
//! ## Test/Mock Support
//! Scripted encoders are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod coherence;
pub mod color;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod enrich;
pub mod hashing;
pub mod imaging;
pub mod index;
pub mod outcome;
pub mod payload;
pub mod search;
pub mod validation;

pub use catalog::{CatalogError, CatalogRecord, CatalogStore, InMemoryCatalog};
pub use coherence::{CoherenceChecker, CoherenceResult};
pub use color::{ColorName, canonicalize, extract_dominant_colors, identify_color};
pub use config::{Config, ConfigError};
pub use embedding::{ClipEncoder, ClipEncoderConfig, EmbeddingError, Encoder};
pub use enrich::{
    AttributeSource, EnrichError, EnrichedResult, Enricher, EntropyAttributes, SeededAttributes,
};
pub use imaging::{ImagingError, Rotation};
pub use index::{FlatL2Index, IdMap, IndexError, Neighbor, VectorIndex};
pub use outcome::{PipelineError, StageOutcome};
pub use payload::Payload;
pub use search::{Blocklist, CandidateResult, ProductDetails, SearchEngine, SearchOptions};
pub use validation::{
    CategoryScore, FashionGate, GateOptions, RelevanceValidator, RotationFallback,
    ValidationPolicy, ValidationResult,
};
