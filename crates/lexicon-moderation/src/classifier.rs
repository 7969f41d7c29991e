//! External classifier capability.
//!
//! The pipeline never talks to a concrete service; it holds a
//! `dyn ContentClassifier` injected at construction. Deterministic fakes
//! live in the `fakes` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a classifier call. The pipeline converts every one of
/// these into a rejection verdict with an ERROR note (fail closed).
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The call exceeded its bounded timeout
    #[error("Classifier call timed out")]
    Timeout,

    /// Transport-level failure (connection, TLS, non-2xx status)
    #[error("Classifier transport failure: {0}")]
    Transport(String),

    /// The service answered but the payload did not parse
    #[error("Classifier returned malformed payload: {0}")]
    Malformed(String),
}

/// Result of a content classification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the classifier flagged the content outright
    pub flagged: bool,
    /// Per-category confidence scores in [0, 1]
    pub category_scores: Vec<(String, f64)>,
}

/// Result of a profanity determination call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfanityReport {
    pub is_profane: bool,
    pub reason: String,
}

/// Natural-language moderation classifier capability.
///
/// Both calls are fallible and must be bounded by a timeout; a failure is
/// never an approval.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Classify the payload for objectionable content.
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;

    /// Ask specifically for a profanity determination.
    async fn detect_profanity(&self, text: &str) -> Result<ProfanityReport, ClassifierError>;
}
