use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::hashing::attribute_seed;

/// Source of the placeholder attributes (brand, price, material, pattern).
///
/// `key` identifies the result (its catalog id) and `salt` the attribute, so a
/// deterministic source can give each pair a stable draw.
pub trait AttributeSource {
    /// Index in `0..len`.
    fn pick(&self, key: &str, salt: &str, len: usize) -> usize;

    /// Value in `[0, 1)`.
    fn fraction(&self, key: &str, salt: &str) -> f64;
}

impl<A: AttributeSource + ?Sized> AttributeSource for &A {
    fn pick(&self, key: &str, salt: &str, len: usize) -> usize {
        (**self).pick(key, salt, len)
    }

    fn fraction(&self, key: &str, salt: &str) -> f64 {
        (**self).fraction(key, salt)
    }
}

/// Reproducible draws seeded from `BLAKE3(key | salt)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededAttributes;

impl SeededAttributes {
    fn rng(key: &str, salt: &str) -> StdRng {
        StdRng::seed_from_u64(attribute_seed(key, salt))
    }
}

impl AttributeSource for SeededAttributes {
    fn pick(&self, key: &str, salt: &str, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        Self::rng(key, salt).random_range(0..len)
    }

    fn fraction(&self, key: &str, salt: &str) -> f64 {
        Self::rng(key, salt).random::<f64>()
    }
}

/// Fresh thread-local randomness on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyAttributes;

impl AttributeSource for EntropyAttributes {
    fn pick(&self, _key: &str, _salt: &str, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::rng().random_range(0..len)
    }

    fn fraction(&self, _key: &str, _salt: &str) -> f64 {
        rand::rng().random::<f64>()
    }
}
