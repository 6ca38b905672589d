use super::{IndexError, Neighbor, VectorIndex};

/// Exact nearest-neighbor index over squared Euclidean distance.
///
/// Vectors are stored row-major in one contiguous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Builds an index from rows that all share one dimension.
    pub fn from_vectors(dim: usize, vectors: &[Vec<f32>]) -> Result<Self, IndexError> {
        if dim == 0 {
            return Err(IndexError::InvalidDimension {
                expected: 1,
                actual: 0,
            });
        }

        let mut data = Vec::with_capacity(dim * vectors.len());
        for vector in vectors {
            if vector.len() != dim {
                return Err(IndexError::InvalidDimension {
                    expected: dim,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self { dim, data })
    }

    /// Wraps an already-flattened buffer; `data.len()` must be a multiple of `dim`.
    pub fn from_flat(dim: usize, data: Vec<f32>) -> Result<Self, IndexError> {
        if dim == 0 || data.len() % dim != 0 {
            return Err(IndexError::InvalidDimension {
                expected: dim,
                actual: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Row `position`, if present.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.data.chunks_exact(self.dim).nth(position)
    }

    pub(crate) fn raw(&self) -> &[f32] {
        &self.data
    }
}

/// Squared Euclidean distance.
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

impl VectorIndex for FlatL2Index {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dim {
            return Err(IndexError::InvalidDimension {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut scored: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, row)| Neighbor {
                distance: squared_l2(query, row),
                position,
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        scored.truncate(k);
        Ok(scored)
    }
}
