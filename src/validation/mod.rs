//! Fashion relevance validation.
//!
//! - [`RelevanceValidator`] classifies one image against the category prompts.
//! - [`RotationFallback`] retries geometric variants of a rejected image.
//! - [`FashionGate`] chains the two the way image search and `validate` use them.

mod gate;
pub mod prompts;
mod rotation;
mod types;
mod validator;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use gate::{FashionGate, GateOptions};
pub use rotation::RotationFallback;
pub use types::{CategoryScore, Decision, ValidationPolicy, ValidationResult};
pub use validator::RelevanceValidator;
