//! Text and image encoders sharing one embedding space.
//!
//! - [`Encoder`] is the capability the pipeline consumes.
//! - [`clip`] provides the CLIP ViT-B/32 implementation (and stub mode).
//! - [`mock`] provides a scripted encoder for tests (`mock` feature).

/// CLIP encoder.
pub mod clip;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod encoder;
mod error;
/// Tokenizer loading helpers.
pub mod utils;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use clip::{ClipEncoder, ClipEncoderConfig};
pub use encoder::{Encoder, combine_normalized, dot, l2_normalize};
pub use error::EmbeddingError;
