//! Deterministic classifier fakes (testing only)
//!
//! Each fake pins one pipeline outcome so tests can exercise stage order
//! and fail-closed behavior without a live classifier.

use async_trait::async_trait;

use crate::classifier::{Classification, ClassifierError, ContentClassifier, ProfanityReport};

/// Passes everything: nothing flagged, no profanity.
#[derive(Debug, Default)]
pub struct CleanClassifier;

#[async_trait]
impl ContentClassifier for CleanClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
        Ok(Classification {
            flagged: false,
            category_scores: vec![("harassment".to_string(), 0.01)],
        })
    }

    async fn detect_profanity(&self, _text: &str) -> Result<ProfanityReport, ClassifierError> {
        Ok(ProfanityReport {
            is_profane: false,
            reason: String::new(),
        })
    }
}

/// Flags every classification with the given category scores.
#[derive(Debug)]
pub struct FlaggingClassifier {
    pub category_scores: Vec<(String, f64)>,
}

impl FlaggingClassifier {
    pub fn new(category_scores: Vec<(String, f64)>) -> Self {
        FlaggingClassifier { category_scores }
    }
}

#[async_trait]
impl ContentClassifier for FlaggingClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
        Ok(Classification {
            flagged: true,
            category_scores: self.category_scores.clone(),
        })
    }

    async fn detect_profanity(&self, _text: &str) -> Result<ProfanityReport, ClassifierError> {
        Ok(ProfanityReport {
            is_profane: false,
            reason: String::new(),
        })
    }
}

/// Clean classification, but every profanity call comes back positive.
#[derive(Debug)]
pub struct ProfaneClassifier {
    pub reason: String,
}

impl ProfaneClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        ProfaneClassifier {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ContentClassifier for ProfaneClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
        Ok(Classification {
            flagged: false,
            category_scores: vec![],
        })
    }

    async fn detect_profanity(&self, _text: &str) -> Result<ProfanityReport, ClassifierError> {
        Ok(ProfanityReport {
            is_profane: true,
            reason: self.reason.clone(),
        })
    }
}

/// Which classifier call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingCall {
    Classify,
    DetectProfanity,
    Both,
}

/// Simulates classifier outages for fail-closed tests.
#[derive(Debug)]
pub struct FailingClassifier {
    pub failing: FailingCall,
}

impl FailingClassifier {
    pub fn new(failing: FailingCall) -> Self {
        FailingClassifier { failing }
    }
}

#[async_trait]
impl ContentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
        match self.failing {
            FailingCall::Classify | FailingCall::Both => Err(ClassifierError::Timeout),
            FailingCall::DetectProfanity => Ok(Classification {
                flagged: false,
                category_scores: vec![],
            }),
        }
    }

    async fn detect_profanity(&self, _text: &str) -> Result<ProfanityReport, ClassifierError> {
        match self.failing {
            FailingCall::DetectProfanity | FailingCall::Both => {
                Err(ClassifierError::Transport("connection refused".to_string()))
            }
            FailingCall::Classify => Ok(ProfanityReport {
                is_profane: false,
                reason: String::new(),
            }),
        }
    }
}
