//! CLIP ViT-B/32 encoder (safetensors + tokenizer).
//!
//! Use [`ClipEncoderConfig::stub`] for tests and demos without model files.

/// CLIP encoder configuration.
pub mod config;


pub use config::{CLIP_TOKENIZER_FILE, CLIP_WEIGHTS_FILE, ClipEncoderConfig};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use image::DynamicImage;
use image::imageops::FilterType;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::{device_label, select_device};
use crate::embedding::encoder::{Encoder, l2_normalize, stub_vector};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{clip_pad_id, load_tokenizer, pad_or_truncate};

enum EncoderBackend {
    Model {
        model: ClipModel,
        tokenizer: Tokenizer,
        pad_id: u32,
        device: Device,
    },
    Stub,
}

/// CLIP text/image encoder (supports stub mode).
pub struct ClipEncoder {
    backend: EncoderBackend,
    config: ClipEncoderConfig,
}

impl std::fmt::Debug for ClipEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => {
                        format!("Model({})", device_label(device))
                    }
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("image_size", &self.config.image_size)
            .finish()
    }
}

impl ClipEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: ClipEncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("CLIP encoder running in STUB mode; embeddings carry no meaning");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device();
        let (model, tokenizer, pad_id) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            device = device_label(&device),
            embedding_dim = config.embedding_dim,
            "CLIP model loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                pad_id,
                device,
            },
            config,
        })
    }

    fn load_model(
        config: &ClipEncoderConfig,
        device: &Device,
    ) -> Result<(ClipModel, Tokenizer, u32), EmbeddingError> {
        let tokenizer = load_tokenizer(&config.tokenizer_path()).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {e}"),
            }
        })?;
        let pad_id = clip_pad_id(&tokenizer).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: e.to_string(),
        })?;

        let clip_config = ClipConfig::vit_base_patch32();
        if clip_config.text_config.projection_dim != config.embedding_dim {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) does not match ViT-B/32 projection ({})",
                    config.embedding_dim, clip_config.text_config.projection_dim
                ),
            });
        }

        let weights = config.weights_path();
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device) }
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to map safetensors: {e}"),
            })?;

        let model = ClipModel::new(vb, &clip_config).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to build CLIP model: {e}"),
            }
        })?;

        Ok((model, tokenizer, pad_id))
    }

    fn embed_text_with_model(
        &self,
        text: &str,
        model: &ClipModel,
        tokenizer: &Tokenizer,
        pad_id: u32,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = pad_or_truncate(encoding.get_ids(), self.config.max_seq_len, pad_id);
        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Encoding text"
        );

        // [1, max_seq_len]
        let input_ids = Tensor::new(ids.as_slice(), device)?.unsqueeze(0)?;
        let features = model.get_text_features(&input_ids)?;
        self.finish(features)
    }

    fn embed_image_with_model(
        &self,
        image: &DynamicImage,
        model: &ClipModel,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let pixels = self.preprocess(image, device)?;
        let features = model.get_image_features(&pixels)?;
        self.finish(features)
    }

    /// Resizes to fill the square input and scales channels to [-1, 1].
    fn preprocess(&self, image: &DynamicImage, device: &Device) -> Result<Tensor, EmbeddingError> {
        let size = self.config.image_size;
        let rgb = image
            .resize_to_fill(size as u32, size as u32, FilterType::Triangle)
            .to_rgb8();

        // [1, 3, size, size]
        let tensor = Tensor::from_vec(rgb.into_raw(), (size, size, 3), device)?
            .permute((2, 0, 1))?
            .to_dtype(DType::F32)?
            .affine(2.0 / 255.0, -1.0)?
            .unsqueeze(0)?;
        Ok(tensor)
    }

    fn finish(&self, features: Tensor) -> Result<Vec<f32>, EmbeddingError> {
        let embedding = features.squeeze(0)?.to_vec1::<f32>()?;
        if embedding.len() != self.config.embedding_dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.embedding_dim,
                actual: embedding.len(),
            });
        }
        l2_normalize(embedding)
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &ClipEncoderConfig {
        &self.config
    }
}

impl Encoder for ClipEncoder {
    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                pad_id,
                device,
            } => self.embed_text_with_model(text, model, tokenizer, *pad_id, device),
            EncoderBackend::Stub => Ok(stub_vector(
                "text",
                text.as_bytes(),
                self.config.embedding_dim,
            )),
        }
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model { model, device, .. } => {
                self.embed_image_with_model(image, model, device)
            }
            EncoderBackend::Stub => {
                let rgb = image.to_rgb8();
                Ok(stub_vector(
                    "image",
                    rgb.as_raw(),
                    self.config.embedding_dim,
                ))
            }
        }
    }
}
