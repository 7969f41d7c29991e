//! Term lifecycle: submission and human moderation decisions.
//!
//! States: Pending (initial, always), Approved, Rejected. The automated
//! pipeline runs once at submission; its verdict is recorded only as the
//! presence or absence of a moderation note. Every submission waits for a
//! human decision — a clean verdict does not auto-publish. Approve and
//! reject are valid from any prior state (re-moderation is allowed).

use std::sync::Arc;

use chrono::Utc;
use lexicon_moderation::ModerationPipeline;
use lexicon_state::{ModerationUpdate, ModeratorId, TermId, TermRecord, TermStatus, TermStore};
use tracing::info;

use crate::error::{LexiconError, Result};
use crate::submission::TermSubmission;

/// Term lifecycle service.
pub struct TermLifecycle {
    store: Arc<dyn TermStore>,
    pipeline: ModerationPipeline,
}

impl TermLifecycle {
    pub fn new(store: Arc<dyn TermStore>, pipeline: ModerationPipeline) -> Self {
        TermLifecycle { store, pipeline }
    }

    /// Submit a new term.
    ///
    /// Runs the moderation pipeline exactly once, then persists the term
    /// as Pending. The pipeline's verdict survives only as the note; even
    /// a clean verdict queues the term for human review.
    pub async fn submit(&self, submission: TermSubmission) -> Result<TermRecord> {
        submission.validate()?;

        let content = lexicon_moderation::SubmissionContent {
            text: submission.text.clone(),
            definition: submission.definition.clone(),
            example: submission.example.clone(),
        };
        let verdict = self.pipeline.review(&content).await;

        info!(
            term = %submission.text,
            auto_approved = verdict.approved,
            flagged = verdict.note.is_some(),
            "submission moderated, queuing for human review"
        );

        let record = TermRecord::new_submission(
            submission.text,
            submission.definition,
            submission.example,
            verdict.note.map(|n| n.to_string()),
        );

        Ok(self.store.create_term(record).await?)
    }

    /// Pending terms awaiting review, newest first.
    pub async fn review_queue(&self) -> Result<Vec<TermRecord>> {
        Ok(self.store.review_queue().await?)
    }

    /// Approve a term. Valid from any prior state.
    pub async fn approve(
        &self,
        term_id: &TermId,
        moderator_id: &ModeratorId,
        note: Option<String>,
    ) -> Result<TermRecord> {
        let updated = self
            .store
            .apply_moderation(
                term_id,
                ModerationUpdate {
                    status: TermStatus::Approved,
                    moderator_id: moderator_id.clone(),
                    note: note.filter(|n| !n.trim().is_empty()),
                    moderated_at: Utc::now(),
                },
            )
            .await?;

        info!(term_id = %term_id, moderator = %moderator_id, "term approved");
        Ok(updated)
    }

    /// Reject a term. The note is required and non-empty. Valid from any
    /// prior state.
    pub async fn reject(
        &self,
        term_id: &TermId,
        moderator_id: &ModeratorId,
        note: String,
    ) -> Result<TermRecord> {
        if note.trim().is_empty() {
            return Err(LexiconError::Validation(
                "a rejection note is required".to_string(),
            ));
        }

        let updated = self
            .store
            .apply_moderation(
                term_id,
                ModerationUpdate {
                    status: TermStatus::Rejected,
                    moderator_id: moderator_id.clone(),
                    note: Some(note),
                    moderated_at: Utc::now(),
                },
            )
            .await?;

        info!(term_id = %term_id, moderator = %moderator_id, "term rejected");
        Ok(updated)
    }
}
