//! Product retrieval.
//!
//! [`SearchEngine`] runs the three query modes: text (blocklist pre-filter),
//! image (relevance-gated) and multimodal (coherence-advised). Each over-fetches
//! from the index, enriches and color-ranks, then truncates to `top_k`.

pub mod blocklist;
mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use blocklist::{Blocklist, NON_FASHION_KEYWORDS};
pub use engine::SearchEngine;
pub use types::{CandidateResult, ProductDetails, SearchOptions};
