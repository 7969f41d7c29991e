//! Staged moderation pipeline.
//!
//! Runs exactly once per submission, stages in order with short-circuit on
//! the first rejection:
//!
//! 1. Spam heuristic (repetitive tokens in definition or example)
//! 2. Length gate (combined length budget before any external call)
//! 3. External classification
//! 4. Profanity determination
//!
//! A classifier failure at stage 3 or 4 rejects with an ERROR note: the
//! pipeline fails closed, and the submission lands in the human review
//! queue instead of being silently approved.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classifier::ContentClassifier;
use crate::note::{ModerationNote, NoteKind};

/// Combined length budget across text + definition + example. Submissions
/// over this never reach the external classifier.
const MAX_TOTAL_LENGTH: usize = 300;

/// A single token repeated beyond this share of a field's tokens is spam.
const SPAM_REPEAT_RATIO: f64 = 0.3;

/// Category confidence above this flags the content even when the
/// classifier's own `flagged` bit is unset.
const CATEGORY_SCORE_THRESHOLD: f64 = 0.1;

/// The fields of a submission the pipeline inspects.
#[derive(Debug, Clone)]
pub struct SubmissionContent {
    pub text: String,
    pub definition: String,
    pub example: String,
}

impl SubmissionContent {
    /// Single payload sent to both classifier calls.
    fn payload(&self) -> String {
        format!(
            "Term: {}\nDefinition: {}\nExample: {}",
            self.text, self.definition, self.example
        )
    }
}

/// Outcome of the pipeline: approved with no note, or rejected with
/// exactly one typed note.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub approved: bool,
    pub note: Option<ModerationNote>,
}

impl Verdict {
    fn approve() -> Self {
        Verdict {
            approved: true,
            note: None,
        }
    }

    fn reject(note: ModerationNote) -> Self {
        Verdict {
            approved: false,
            note: Some(note),
        }
    }
}

/// Staged moderation pipeline over an injected classifier.
pub struct ModerationPipeline {
    classifier: Arc<dyn ContentClassifier>,
}

impl ModerationPipeline {
    pub fn new(classifier: Arc<dyn ContentClassifier>) -> Self {
        ModerationPipeline { classifier }
    }

    /// Review a submission. Total: every input yields either
    /// approved-with-no-note or rejected-with-exactly-one-note.
    pub async fn review(&self, content: &SubmissionContent) -> Verdict {
        info!(term = %content.text, "starting content moderation");

        // Stage 1: spam heuristic, per field
        if has_repetitive_tokens(&content.definition) || has_repetitive_tokens(&content.example) {
            info!(term = %content.text, "rejected by spam heuristic");
            return Verdict::reject(ModerationNote::new(
                NoteKind::Spam,
                "Detected repetitive patterns or potential spam content",
            ));
        }

        // Stage 2: length gate, protects the classifier calls from abuse
        let total_length =
            content.text.len() + content.definition.len() + content.example.len();
        if total_length > MAX_TOTAL_LENGTH {
            info!(term = %content.text, total_length, "rejected by length gate");
            return Verdict::reject(ModerationNote::new(
                NoteKind::Length,
                "Content exceeds maximum allowed length. Please be more concise.",
            ));
        }

        let payload = content.payload();

        // Stage 3: external classification
        let classification = match self.classifier.classify(&payload).await {
            Ok(c) => c,
            Err(e) => {
                warn!(term = %content.text, error = %e, "classification call failed");
                return Verdict::reject(ModerationNote::new(
                    NoteKind::Error,
                    "Requires manual review due to AI service error",
                ));
            }
        };

        let over_threshold: Vec<String> = classification
            .category_scores
            .iter()
            .filter(|(_, score)| *score > CATEGORY_SCORE_THRESHOLD)
            .map(|(category, score)| {
                format!("{} ({}% confidence)", category, (score * 100.0).round())
            })
            .collect();

        if classification.flagged || !over_threshold.is_empty() {
            info!(term = %content.text, "rejected by external classification");
            return Verdict::reject(ModerationNote::new(
                NoteKind::Ai,
                format!("Content was flagged for: {}", over_threshold.join(", ")),
            ));
        }

        // Stage 4: profanity determination
        match self.classifier.detect_profanity(&payload).await {
            Ok(report) if report.is_profane => {
                info!(term = %content.text, "rejected by profanity check");
                Verdict::reject(ModerationNote::new(NoteKind::Profanity, report.reason))
            }
            Ok(_) => {
                info!(term = %content.text, "moderation passed");
                Verdict::approve()
            }
            Err(e) => {
                warn!(term = %content.text, error = %e, "profanity call failed");
                Verdict::reject(ModerationNote::new(
                    NoteKind::Error,
                    "Manual review required - unable to complete profanity check",
                ))
            }
        }
    }
}

/// True when any single whitespace token accounts for more than
/// `SPAM_REPEAT_RATIO` of the field's tokens (case-insensitive).
fn has_repetitive_tokens(field: &str) -> bool {
    let lowered = field.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.is_empty() {
        return false;
    }

    let mut counts = std::collections::HashMap::new();
    for token in &tokens {
        *counts.entry(*token).or_insert(0usize) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);

    max_count as f64 > tokens.len() as f64 * SPAM_REPEAT_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repetition_over_thirty_percent_is_spam() {
        // 10 tokens, one appears 10 times: 100% > 30%
        assert!(has_repetitive_tokens(
            "great great great great great great great great great great"
        ));
    }

    #[test]
    fn repetition_is_case_insensitive() {
        assert!(has_repetitive_tokens("Spam SPAM spam sPaM notspam"));
    }

    #[test]
    fn varied_text_is_not_spam() {
        // 10 distinct tokens: max frequency 10% <= 30%
        assert!(!has_repetitive_tokens(
            "a colorful phrase describing something genuinely new and interesting"
        ));
    }

    #[test]
    fn three_of_ten_is_at_the_boundary_not_over() {
        // 3/10 = 30% exactly: the check is strictly greater-than
        assert!(!has_repetitive_tokens("x x x one two three four five six seven"));
    }

    #[test]
    fn empty_field_is_not_spam() {
        assert!(!has_repetitive_tokens(""));
        assert!(!has_repetitive_tokens("   "));
    }

    #[test]
    fn fields_under_four_tokens_always_trip_the_ratio() {
        // 1 occurrence > 30% of 3 tokens: very short fields are rejected.
        assert!(has_repetitive_tokens("charisma"));
        assert!(has_repetitive_tokens("effortless charisma"));
        assert!(has_repetitive_tokens("one two three"));
        assert!(!has_repetitive_tokens("one two three four"));
    }
}
