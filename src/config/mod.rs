//! Explicit pipeline configuration.
//!
//! Every asset path is independently overridable. Derived paths follow their
//! parent (`dataset_root` → `embeddings_dir` → `index_path`) unless set
//! explicitly. Override with `LOOKBOOK_*` environment variables or the
//! `with_*` builder methods.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_TOP_K;

/// Default dataset root used when `LOOKBOOK_DATASET_PATH` is not set.
pub const DEFAULT_DATASET_ROOT: &str = "./data/fashion-dataset";

/// Pipeline configuration passed at initialization.
///
/// Use [`Config::from_env`] to read `LOOKBOOK_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Dataset root. Default: `./data/fashion-dataset`.
    pub dataset_root: PathBuf,

    /// Catalog images. Default: `<dataset_root>/images`.
    pub image_folder: PathBuf,

    /// Catalog metadata CSV. Default: `<dataset_root>/styles.csv`.
    pub metadata_file: PathBuf,

    /// Embedding artifacts. Default: `<dataset_root>/embeddings`.
    pub embeddings_dir: PathBuf,

    /// FAISS flat L2 index. Default: `<embeddings_dir>/fashion_faiss.index`.
    pub index_path: PathBuf,

    /// JSON array mapping index positions to catalog ids.
    /// Default: `<embeddings_dir>/image_ids.json`.
    pub id_map_path: PathBuf,

    /// CLIP model directory (`model.safetensors` + `tokenizer.json`).
    pub model_path: Option<PathBuf>,

    /// Directory for temporary rotation variants. Default: system temp dir.
    pub scratch_dir: Option<PathBuf>,

    /// Results returned per search. Default: `5`.
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_dataset(DEFAULT_DATASET_ROOT)
    }
}

impl Config {
    const ENV_DATASET_PATH: &'static str = "LOOKBOOK_DATASET_PATH";
    const ENV_IMAGE_FOLDER: &'static str = "LOOKBOOK_IMAGE_FOLDER";
    const ENV_METADATA_FILE: &'static str = "LOOKBOOK_METADATA_FILE";
    const ENV_EMBEDDINGS_PATH: &'static str = "LOOKBOOK_EMBEDDINGS_PATH";
    const ENV_INDEX_PATH: &'static str = "LOOKBOOK_INDEX_PATH";
    const ENV_ID_MAP_PATH: &'static str = "LOOKBOOK_ID_MAP_PATH";
    const ENV_MODEL_PATH: &'static str = "LOOKBOOK_CLIP_MODEL_PATH";
    const ENV_SCRATCH_DIR: &'static str = "LOOKBOOK_SCRATCH_DIR";
    const ENV_TOP_K: &'static str = "LOOKBOOK_TOP_K";

    /// Builds a configuration with every asset path derived from `root`.
    pub fn for_dataset<P: Into<PathBuf>>(root: P) -> Self {
        let dataset_root = root.into();
        let embeddings_dir = dataset_root.join("embeddings");

        Self {
            image_folder: dataset_root.join("images"),
            metadata_file: dataset_root.join("styles.csv"),
            index_path: embeddings_dir.join("fashion_faiss.index"),
            id_map_path: embeddings_dir.join("image_ids.json"),
            embeddings_dir,
            dataset_root,
            model_path: None,
            scratch_dir: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let dataset_root = Self::optional_path_from_env(Self::ENV_DATASET_PATH)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_ROOT));

        let mut config = Self::for_dataset(dataset_root);

        if let Some(dir) = Self::optional_path_from_env(Self::ENV_EMBEDDINGS_PATH) {
            config = config.with_embeddings_dir(dir);
        }
        if let Some(path) = Self::optional_path_from_env(Self::ENV_IMAGE_FOLDER) {
            config.image_folder = path;
        }
        if let Some(path) = Self::optional_path_from_env(Self::ENV_METADATA_FILE) {
            config.metadata_file = path;
        }
        if let Some(path) = Self::optional_path_from_env(Self::ENV_INDEX_PATH) {
            config.index_path = path;
        }
        if let Some(path) = Self::optional_path_from_env(Self::ENV_ID_MAP_PATH) {
            config.id_map_path = path;
        }

        config.model_path = Self::optional_path_from_env(Self::ENV_MODEL_PATH);
        config.scratch_dir = Self::optional_path_from_env(Self::ENV_SCRATCH_DIR);
        config.top_k = Self::parse_top_k_from_env(DEFAULT_TOP_K)?;

        Ok(config)
    }

    /// Re-roots every path that has not been overridden since construction.
    pub fn with_dataset_root<P: Into<PathBuf>>(self, root: P) -> Self {
        let rebased = Self::for_dataset(root);
        let old = Self::for_dataset(self.dataset_root.clone());

        let keep = |current: PathBuf, old_default: PathBuf, new_default: PathBuf| {
            if current == old_default {
                new_default
            } else {
                current
            }
        };

        Self {
            image_folder: keep(self.image_folder, old.image_folder, rebased.image_folder),
            metadata_file: keep(self.metadata_file, old.metadata_file, rebased.metadata_file),
            embeddings_dir: keep(
                self.embeddings_dir,
                old.embeddings_dir,
                rebased.embeddings_dir,
            ),
            index_path: keep(self.index_path, old.index_path, rebased.index_path),
            id_map_path: keep(self.id_map_path, old.id_map_path, rebased.id_map_path),
            dataset_root: rebased.dataset_root,
            ..self
        }
    }

    /// Moves the embeddings directory; index and id map follow unless overridden.
    pub fn with_embeddings_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        let dir = dir.into();
        if self.index_path == self.embeddings_dir.join("fashion_faiss.index") {
            self.index_path = dir.join("fashion_faiss.index");
        }
        if self.id_map_path == self.embeddings_dir.join("image_ids.json") {
            self.id_map_path = dir.join("image_ids.json");
        }
        self.embeddings_dir = dir;
        self
    }

    pub fn with_image_folder<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.image_folder = path.into();
        self
    }

    pub fn with_metadata_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.metadata_file = path.into();
        self
    }

    pub fn with_index_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.index_path = path.into();
        self
    }

    pub fn with_id_map_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.id_map_path = path.into();
        self
    }

    pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn with_scratch_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.scratch_dir = Some(path.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Validates every asset a search needs (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_dir("dataset path", &self.dataset_root)?;
        Self::require_dir("image folder", &self.image_folder)?;
        Self::require_file("metadata file", &self.metadata_file)?;
        Self::require_dir("embeddings path", &self.embeddings_dir)?;
        Self::require_file("index file", &self.index_path)?;
        Self::require_file("id map file", &self.id_map_path)?;
        self.validate_encoder_assets()
    }

    /// Validates only what validate/coherence requests need.
    pub fn validate_encoder_assets(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK {
                value: self.top_k.to_string(),
            });
        }

        if let Some(ref path) = self.model_path {
            Self::require_dir("model directory", path)?;
        }

        if let Some(ref path) = self.scratch_dir {
            Self::require_dir("scratch directory", path)?;
        }

        Ok(())
    }

    fn require_dir(asset: &'static str, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                asset,
                path: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                asset,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn require_file(asset: &'static str, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                asset,
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                asset,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_top_k_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_TOP_K) {
            Ok(value) => {
                let top_k: usize =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::TopKParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if top_k == 0 {
                    return Err(ConfigError::InvalidTopK { value });
                }

                Ok(top_k)
            }
            Err(_) => Ok(default),
        }
    }
}
