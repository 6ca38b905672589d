use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::constants::{CLIP_EMBEDDING_DIM, CLIP_IMAGE_SIZE, CLIP_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

/// Weights file expected inside the model directory.
pub const CLIP_WEIGHTS_FILE: &str = "model.safetensors";

/// Tokenizer file expected inside the model directory.
pub const CLIP_TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Clone, PartialEq)]
/// Configuration for [`ClipEncoder`](super::ClipEncoder).
pub struct ClipEncoderConfig {
    /// Directory holding `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Projection dimension of the shared embedding space.
    pub embedding_dim: usize,
    /// Square input resolution for the vision tower.
    pub image_size: usize,
    /// Context length of the text tower.
    pub max_seq_len: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for ClipEncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            embedding_dim: CLIP_EMBEDDING_DIM,
            image_size: CLIP_IMAGE_SIZE,
            max_seq_len: CLIP_MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl ClipEncoderConfig {
    /// Creates a config for a ViT-B/32 model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Model directory from `config`, or stub mode when none is configured.
    pub fn from_config(config: &Config) -> Self {
        match &config.model_path {
            Some(dir) => Self::new(dir),
            None => Self::stub(),
        }
    }

    pub fn weights_path(&self) -> PathBuf {
        self.model_dir.join(CLIP_WEIGHTS_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(CLIP_TOKENIZER_FILE)
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 || self.image_size == 0 || self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}), image_size ({}) and max_seq_len ({}) must be non-zero",
                    self.embedding_dim, self.image_size, self.max_seq_len
                ),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        for path in [self.weights_path(), self.tokenizer_path()] {
            if !path.is_file() {
                return Err(EmbeddingError::ModelNotFound { path });
            }
        }

        Ok(())
    }

    /// Returns `true` if both model files are present.
    pub fn model_available(&self) -> bool {
        !self.model_dir.as_os_str().is_empty()
            && self.weights_path().is_file()
            && self.tokenizer_path().is_file()
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}
