use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by index loading and search.
pub enum IndexError {
    /// Index or id-map file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a flat L2 FAISS index.
    #[error("unsupported index type '{fourcc}' in {path} (expected IxF2)")]
    UnsupportedIndex { path: PathBuf, fourcc: String },

    /// Header or payload is malformed.
    #[error("malformed index {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// Query or stored vectors have the wrong length.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Id map could not be parsed.
    #[error("invalid id map {path}: {reason}")]
    InvalidIdMap { path: PathBuf, reason: String },

    /// Id map and index disagree on size.
    #[error("id map has {ids} ids but index holds {vectors} vectors")]
    IdMapMismatch { ids: usize, vectors: usize },
}
