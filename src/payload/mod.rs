//! JSON envelopes written to stdout.
//!
//! Each response is a single-key object: `{"results": [...]}`,
//! `{"validation": {...}}` or `{"coherence": {...}}`.

use serde::{Serialize, Serializer};

use crate::coherence::CoherenceResult;
use crate::enrich::EnrichedResult;
use crate::validation::ValidationResult;

/// Serializes non-finite floats as `null`.
pub fn finite_or_null<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f32(*value)
    } else {
        serializer.serialize_none()
    }
}

/// One response, tagged by its kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload<'a> {
    Results(&'a [EnrichedResult]),
    Validation(&'a ValidationResult),
    Coherence(&'a CoherenceResult),
}

impl Payload<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
