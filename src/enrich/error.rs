use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while deriving result attributes.
pub enum EnrichError {
    /// The attribute source picked past the end of a table.
    #[error("attribute source picked {index} of {len} for '{salt}'")]
    PickOutOfRange {
        salt: &'static str,
        index: usize,
        len: usize,
    },

    /// The attribute source returned a value outside `[0, 1)`.
    #[error("attribute source returned fraction {value} for '{salt}'")]
    InvalidFraction { salt: &'static str, value: f64 },
}
