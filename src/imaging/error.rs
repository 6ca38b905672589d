use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("image not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to decode image {path}: {reason}")]
    DecodeFailed { path: PathBuf, reason: String },

    #[error("failed to write image variant {path}: {reason}")]
    EncodeFailed { path: PathBuf, reason: String },

    #[error("failed to create scratch file in {dir}: {source}")]
    ScratchFile {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
