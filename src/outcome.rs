//! Per-stage results.
//!
//! Every stage hands its caller something usable. A [`StageOutcome`] carries
//! that value together with how it was produced, so callers and tests can tell
//! a clean result from a recovered one without parsing logs.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::embedding::EmbeddingError;
use crate::enrich::EnrichError;
use crate::imaging::ImagingError;
use crate::index::IndexError;

/// Failure raised inside a stage and caught at its boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("encoder error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("image error: {0}")]
    Imaging(#[from] ImagingError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("enrichment error: {0}")]
    Enrich(#[from] EnrichError),
}

#[derive(Debug)]
/// Result of a pipeline stage.
pub enum StageOutcome<T> {
    /// The stage ran cleanly.
    Complete(T),
    /// The stage ran, recovering locally from per-item problems.
    Degraded {
        /// Produced value.
        value: T,
        /// One entry per recovered item.
        issues: Vec<String>,
    },
    /// A policy gate refused the request.
    Rejected {
        /// The gate's negative default.
        value: T,
        /// Why the gate refused.
        reason: String,
    },
    /// The stage failed; `fallback` is its safe default.
    Failed {
        /// Safe default returned in place of a result.
        fallback: T,
        /// What went wrong.
        error: PipelineError,
    },
}

impl<T> StageOutcome<T> {
    /// Wraps `value` as complete, or degraded when `issues` is non-empty.
    pub fn with_issues(value: T, issues: Vec<String>) -> Self {
        if issues.is_empty() {
            StageOutcome::Complete(value)
        } else {
            StageOutcome::Degraded { value, issues }
        }
    }

    /// Borrows the carried value regardless of variant.
    pub fn value(&self) -> &T {
        match self {
            StageOutcome::Complete(value)
            | StageOutcome::Degraded { value, .. }
            | StageOutcome::Rejected { value, .. }
            | StageOutcome::Failed {
                fallback: value, ..
            } => value,
        }
    }

    /// Consumes the outcome, yielding the carried value.
    pub fn into_value(self) -> T {
        match self {
            StageOutcome::Complete(value)
            | StageOutcome::Degraded { value, .. }
            | StageOutcome::Rejected { value, .. }
            | StageOutcome::Failed {
                fallback: value, ..
            } => value,
        }
    }

    /// Maps the carried value, keeping the variant.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> StageOutcome<U> {
        match self {
            StageOutcome::Complete(value) => StageOutcome::Complete(f(value)),
            StageOutcome::Degraded { value, issues } => StageOutcome::Degraded {
                value: f(value),
                issues,
            },
            StageOutcome::Rejected { value, reason } => StageOutcome::Rejected {
                value: f(value),
                reason,
            },
            StageOutcome::Failed { fallback, error } => StageOutcome::Failed {
                fallback: f(fallback),
                error,
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StageOutcome::Complete(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, StageOutcome::Rejected { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed { .. })
    }

    /// Per-item issues (empty unless degraded).
    pub fn issues(&self) -> &[String] {
        match self {
            StageOutcome::Degraded { issues, .. } => issues,
            _ => &[],
        }
    }

    /// The caught error, if the stage failed.
    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            StageOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Short label for logging.
    pub fn status(&self) -> &'static str {
        match self {
            StageOutcome::Complete(_) => "COMPLETE",
            StageOutcome::Degraded { .. } => "DEGRADED",
            StageOutcome::Rejected { .. } => "REJECTED",
            StageOutcome::Failed { .. } => "FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> PipelineError {
        PipelineError::Embedding(EmbeddingError::InferenceFailed {
            reason: "boom".to_string(),
        })
    }

    #[test]
    fn test_with_issues_empty_is_complete() {
        let outcome = StageOutcome::with_issues(3, vec![]);
        assert!(outcome.is_complete());
        assert_eq!(outcome.status(), "COMPLETE");
    }

    #[test]
    fn test_with_issues_non_empty_is_degraded() {
        let outcome = StageOutcome::with_issues(3, vec!["missing row 7".to_string()]);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.issues(), ["missing row 7".to_string()]);
    }

    #[test]
    fn test_failed_yields_fallback() {
        let outcome: StageOutcome<Vec<u32>> = StageOutcome::Failed {
            fallback: vec![],
            error: failure(),
        };
        assert!(outcome.is_failed());
        assert!(outcome.error().is_some());
        assert!(outcome.into_value().is_empty());
    }

    #[test]
    fn test_rejected_keeps_reason_through_map() {
        let outcome = StageOutcome::Rejected {
            value: 2,
            reason: "blocked".to_string(),
        }
        .map(|v| v * 10);

        match outcome {
            StageOutcome::Rejected { value, reason } => {
                assert_eq!(value, 20);
                assert_eq!(reason, "blocked");
            }
            other => panic!("unexpected outcome: {}", other.status()),
        }
    }

    #[test]
    fn test_value_borrows_every_variant() {
        let failed: StageOutcome<&str> = StageOutcome::Failed {
            fallback: "safe",
            error: failure(),
        };
        assert_eq!(*failed.value(), "safe");
        assert!(failed.issues().is_empty());
    }
}
