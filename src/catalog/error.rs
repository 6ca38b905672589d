use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unreadable catalog header: {reason}")]
    InvalidHeader { reason: String },

    #[error("catalog is missing required column '{column}'")]
    MissingColumn { column: &'static str },
}
