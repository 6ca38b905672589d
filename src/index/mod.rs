//! Nearest-neighbor index over catalog embeddings.

pub mod error;
mod faiss;
mod flat;


pub use error::IndexError;
pub use flat::{FlatL2Index, squared_l2};

use std::path::Path;

use serde_json::Value;

/// One search hit: squared-L2 `distance` to the stored vector at `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f32,
    pub position: usize,
}

/// Capability: "given a vector, return the k closest stored vectors".
pub trait VectorIndex {
    /// Length of every stored vector.
    fn dimension(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` neighbors, nearest first; ties break by position.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError>;
}

impl<I: VectorIndex + ?Sized> VectorIndex for &I {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        (**self).search(query, k)
    }
}

/// Catalog ids in index order: position `i` holds the id of vector `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    ids: Vec<String>,
}

impl IdMap {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Reads a JSON array of ids. Numeric ids are accepted and kept as text.
    pub fn from_json_path(path: &Path) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|reason| IndexError::InvalidIdMap {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_json_str(text: &str) -> Result<Self, String> {
        let values: Vec<Value> = serde_json::from_str(text).map_err(|e| e.to_string())?;

        let ids = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(format!("entry {i} is not a string or number: {other}")),
            })
            .collect::<Result<Vec<String>, String>>()?;

        Ok(Self { ids })
    }

    /// Id at `position`, if mapped.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Fails unless every one of `vectors` index positions has an id.
    pub fn check_covers(&self, vectors: usize) -> Result<(), IndexError> {
        if self.ids.len() < vectors {
            return Err(IndexError::IdMapMismatch {
                ids: self.ids.len(),
                vectors,
            });
        }
        Ok(())
    }

    /// Writes the ids as a JSON array.
    pub fn write_json(&self, path: &Path) -> Result<(), IndexError> {
        let text = serde_json::to_string(&self.ids).map_err(|e| IndexError::InvalidIdMap {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<S: Into<String>> FromIterator<S> for IdMap {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
