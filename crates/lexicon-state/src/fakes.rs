//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryGlossary`, a single implementation of `TermStore`,
//! `VoteLedger`, and `ModeratorStore` that satisfies the trait contracts
//! without any external dependencies. One mutex guards all tables, so the
//! cast-vote check/append/update unit is atomic by construction.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::StorageError;
use crate::storage_traits::*;

#[derive(Debug, Default)]
struct Tables {
    terms: HashMap<TermId, TermRecord>,
    votes: Vec<VoteRecord>,
    moderators: HashMap<String, ModeratorRecord>,
}

/// In-memory glossary store backed by a single `Mutex<Tables>`.
#[derive(Debug, Default)]
pub struct MemoryGlossary {
    tables: Mutex<Tables>,
}

impl MemoryGlossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ledger row with a backdated timestamp and bump the term's
    /// score, bypassing the duplicate check. Window tests need votes that
    /// predate `Utc::now()`; `cast_vote` can only produce current ones.
    pub fn seed_vote(
        &self,
        term_id: &TermId,
        voter: &VoterIdentity,
        value: VoteValue,
        hours_ago: i64,
    ) {
        let mut tables = self.tables.lock().unwrap();
        tables.votes.push(VoteRecord {
            term_id: term_id.clone(),
            voter: voter.clone(),
            value,
            timestamp: Utc::now() - Duration::hours(hours_ago),
        });
        if let Some(term) = tables.terms.get_mut(term_id) {
            term.score += value.as_i64();
        }
    }
}

#[async_trait]
impl TermStore for MemoryGlossary {
    async fn create_term(&self, term: TermRecord) -> StorageResult<TermRecord> {
        let mut tables = self.tables.lock().unwrap();
        tables.terms.insert(term.term_id.clone(), term.clone());
        Ok(term)
    }

    async fn get_term(&self, term_id: &TermId) -> StorageResult<TermRecord> {
        let tables = self.tables.lock().unwrap();
        tables
            .terms
            .get(term_id)
            .cloned()
            .ok_or_else(|| StorageError::TermNotFound {
                term_id: term_id.to_string(),
            })
    }

    async fn review_queue(&self) -> StorageResult<Vec<TermRecord>> {
        let tables = self.tables.lock().unwrap();
        let mut pending: Vec<TermRecord> = tables
            .terms
            .values()
            .filter(|t| t.status == TermStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.term_id.cmp(&b.term_id))
        });
        Ok(pending)
    }

    async fn list_approved(&self) -> StorageResult<Vec<TermRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .terms
            .values()
            .filter(|t| t.status == TermStatus::Approved)
            .cloned()
            .collect())
    }

    async fn apply_moderation(
        &self,
        term_id: &TermId,
        update: ModerationUpdate,
    ) -> StorageResult<TermRecord> {
        let mut tables = self.tables.lock().unwrap();
        let term = tables
            .terms
            .get_mut(term_id)
            .ok_or_else(|| StorageError::TermNotFound {
                term_id: term_id.to_string(),
            })?;
        term.status = update.status;
        term.moderation_note = update.note;
        term.moderated_at = Some(update.moderated_at);
        term.moderated_by = Some(update.moderator_id);
        Ok(term.clone())
    }

    async fn set_trending_scores(&self, scores: &HashMap<TermId, f64>) -> StorageResult<()> {
        let mut tables = self.tables.lock().unwrap();
        for (id, term) in tables.terms.iter_mut() {
            term.trending_score = scores.get(id).copied().unwrap_or(0.0);
        }
        Ok(())
    }
}

#[async_trait]
impl VoteLedger for MemoryGlossary {
    async fn cast_vote(
        &self,
        term_id: &TermId,
        voter: &VoterIdentity,
        value: VoteValue,
    ) -> StorageResult<TermRecord> {
        let mut tables = self.tables.lock().unwrap();

        if !tables.terms.contains_key(term_id) {
            return Err(StorageError::TermNotFound {
                term_id: term_id.to_string(),
            });
        }

        let already_voted = tables
            .votes
            .iter()
            .any(|v| &v.term_id == term_id && &v.voter == voter);
        if already_voted {
            return Err(StorageError::DuplicateVote {
                term_id: term_id.to_string(),
                voter: voter.to_string(),
            });
        }

        tables.votes.push(VoteRecord {
            term_id: term_id.clone(),
            voter: voter.clone(),
            value,
            timestamp: Utc::now(),
        });

        // Still under the same lock: the append and the score bump are one
        // unit as far as any other caller can observe.
        let term = tables
            .terms
            .get_mut(term_id)
            .expect("term existence checked above");
        term.score += value.as_i64();
        Ok(term.clone())
    }

    async fn votes_since(&self, cutoff: DateTime<Utc>) -> StorageResult<Vec<VoteRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .votes
            .iter()
            .filter(|v| v.timestamp >= cutoff)
            .cloned()
            .collect())
    }

    async fn votes_for_term(&self, term_id: &TermId) -> StorageResult<Vec<VoteRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .votes
            .iter()
            .filter(|v| &v.term_id == term_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ModeratorStore for MemoryGlossary {
    async fn insert_moderator(&self, moderator: ModeratorRecord) -> StorageResult<ModeratorRecord> {
        let mut tables = self.tables.lock().unwrap();
        if tables.moderators.contains_key(&moderator.username) {
            return Err(StorageError::Backend(format!(
                "username already taken: {}",
                moderator.username
            )));
        }
        tables
            .moderators
            .insert(moderator.username.clone(), moderator.clone());
        Ok(moderator)
    }

    async fn find_moderator(&self, username: &str) -> StorageResult<ModeratorRecord> {
        let tables = self.tables.lock().unwrap();
        tables
            .moderators
            .get(username)
            .cloned()
            .ok_or_else(|| StorageError::ModeratorNotFound {
                username: username.to_string(),
            })
    }
}
