//! Reader and writer for FAISS `IndexFlatL2` files.
//!
//! Layout (little-endian): fourcc `IxF2`, `d: i32`, `ntotal: i64`, two
//! reserved `i64`s, `is_trained: u8`, `metric_type: i32` (followed by a
//! `metric_arg: f32` when the type is above 1), then the codes as a `u64`
//! float count and that many `f32`s.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use super::{FlatL2Index, IndexError, VectorIndex};

const FOURCC_FLAT_L2: &[u8; 4] = b"IxF2";
const METRIC_L2: i32 = 1;
const RESERVED: i64 = 1 << 20;

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], IndexError> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| IndexError::Malformed {
                path: self.path.to_path_buf(),
                reason: format!("truncated while reading {what} at byte {}", self.offset),
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], IndexError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn i32(&mut self, what: &str) -> Result<i32, IndexError> {
        Ok(i32::from_le_bytes(self.array(what)?))
    }

    fn i64(&mut self, what: &str) -> Result<i64, IndexError> {
        Ok(i64::from_le_bytes(self.array(what)?))
    }

    fn u64(&mut self, what: &str) -> Result<u64, IndexError> {
        Ok(u64::from_le_bytes(self.array(what)?))
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> IndexError {
    IndexError::Malformed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl FlatL2Index {
    /// Memory-maps and parses a FAISS flat L2 index file.
    pub fn open_faiss(path: &Path) -> Result<Self, IndexError> {
        let file = File::open(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // SAFETY: read-only map; the file is not modified while the index loads.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::parse_faiss(&mmap, path)?;
        debug!(
            path = %path.display(),
            dimension = index.dimension(),
            vectors = index.len(),
            "Loaded FAISS flat index"
        );
        Ok(index)
    }

    fn parse_faiss(bytes: &[u8], path: &Path) -> Result<Self, IndexError> {
        let mut cursor = Cursor {
            bytes,
            offset: 0,
            path,
        };

        let fourcc: [u8; 4] = cursor.array("fourcc")?;
        if &fourcc != FOURCC_FLAT_L2 {
            return Err(IndexError::UnsupportedIndex {
                path: path.to_path_buf(),
                fourcc: String::from_utf8_lossy(&fourcc).into_owned(),
            });
        }

        let d = cursor.i32("dimension")?;
        let ntotal = cursor.i64("ntotal")?;
        cursor.i64("reserved")?;
        cursor.i64("reserved")?;
        cursor.take(1, "is_trained")?;
        let metric_type = cursor.i32("metric_type")?;
        if metric_type > 1 {
            cursor.take(4, "metric_arg")?;
        }

        if d <= 0 {
            return Err(malformed(path, format!("non-positive dimension {d}")));
        }
        if ntotal < 0 {
            return Err(malformed(path, format!("negative vector count {ntotal}")));
        }
        if metric_type != METRIC_L2 {
            return Err(malformed(
                path,
                format!("metric type {metric_type} is not L2"),
            ));
        }

        let dim = d as usize;
        let count = cursor.u64("code count")? as usize;
        let expected = dim
            .checked_mul(ntotal as usize)
            .ok_or_else(|| malformed(path, "vector count overflows"))?;
        if count != expected {
            return Err(malformed(
                path,
                format!("{count} floats stored, header implies {expected}"),
            ));
        }

        let byte_len = count
            .checked_mul(4)
            .ok_or_else(|| malformed(path, "code size overflows"))?;
        let raw = cursor.take(byte_len, "codes")?;
        let data: Vec<f32> = raw
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        FlatL2Index::from_flat(dim, data)
    }

    /// Writes this index in FAISS `IndexFlatL2` format.
    pub fn write_faiss(&self, path: &Path) -> Result<(), IndexError> {
        let io_err = |source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);

        let mut header: Vec<u8> = Vec::with_capacity(45);
        header.extend_from_slice(FOURCC_FLAT_L2);
        header.extend_from_slice(&(self.dimension() as i32).to_le_bytes());
        header.extend_from_slice(&(self.len() as i64).to_le_bytes());
        header.extend_from_slice(&RESERVED.to_le_bytes());
        header.extend_from_slice(&RESERVED.to_le_bytes());
        header.push(1);
        header.extend_from_slice(&METRIC_L2.to_le_bytes());
        header.extend_from_slice(&(self.raw().len() as u64).to_le_bytes());
        out.write_all(&header).map_err(io_err)?;

        for value in self.raw() {
            out.write_all(&value.to_le_bytes()).map_err(io_err)?;
        }
        out.flush().map_err(io_err)
    }
}
