//! Storage trait definitions for the lexicon
//!
//! These traits define the core storage abstractions:
//! - `TermStore`: term lifecycle persistence (create, moderate, list)
//! - `VoteLedger`: append-only vote ledger with atomic score maintenance
//! - `ModeratorStore`: moderator account lookup
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Unique identifier for a term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermId(pub String);

impl TermId {
    /// Generate a new random TermId
    pub fn new() -> Self {
        TermId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TermId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a moderator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeratorId(pub String);

impl ModeratorId {
    pub fn new() -> Self {
        ModeratorId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ModeratorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModeratorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse voter identity used for duplicate-vote detection.
///
/// Today this is the caller's network address. It is deliberately opaque:
/// the ledger only ever compares identities for equality, so a stronger
/// identity proof can replace the construction site without touching the
/// ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoterIdentity(pub String);

impl std::fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Vote value
// ---------------------------------------------------------------------------

/// A single vote judgment: +1 or -1.
///
/// Any other integer is unrepresentable past this boundary; `TryFrom<i64>`
/// is the only way in from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Signed value as stored in the ledger and summed into the score.
    pub fn as_i64(&self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = i64;

    fn try_from(raw: i64) -> std::result::Result<Self, Self::Error> {
        match raw {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Lifecycle state of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermStatus {
    /// Awaiting human moderation (initial state for every submission)
    Pending,
    /// Published; visible through the ranking query
    Approved,
    /// Rejected by a moderator; retained for the audit trail
    Rejected,
}

/// Full term record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    pub term_id: TermId,
    /// The slang term itself
    pub text: String,
    pub definition: String,
    pub example: String,
    /// All-time net vote total, maintained incrementally by the ledger
    pub score: i64,
    /// Windowed net-sentiment ratio in [-1, 1], recomputed not accumulated
    pub trending_score: f64,
    pub status: TermStatus,
    /// Typed moderation annotation, serialized as "[KIND] message"
    pub moderation_note: Option<String>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub moderated_by: Option<ModeratorId>,
    pub created_at: DateTime<Utc>,
}

/// A single entry in the vote ledger. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub term_id: TermId,
    pub voter: VoterIdentity,
    pub value: VoteValue,
    pub timestamp: DateTime<Utc>,
}

/// Moderator account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratorRecord {
    pub moderator_id: ModeratorId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields written by a human moderation decision
#[derive(Debug, Clone)]
pub struct ModerationUpdate {
    pub status: TermStatus,
    pub moderator_id: ModeratorId,
    pub note: Option<String>,
    pub moderated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// TermStore — Term Lifecycle Persistence
// ---------------------------------------------------------------------------

/// Term persistence.
///
/// Guarantees:
/// - Terms are never deleted (audit trail).
/// - `score` is mutated only through [`VoteLedger::cast_vote`], never here.
/// - `status`/`moderation_note`/`moderated_at`/`moderated_by` are mutated
///   only through `apply_moderation`.
#[async_trait]
pub trait TermStore: Send + Sync {
    /// Persist a new term. The record carries status Pending and score 0.
    async fn create_term(&self, term: TermRecord) -> StorageResult<TermRecord>;

    /// Fetch a term by ID. Returns `StorageError::TermNotFound` if absent.
    async fn get_term(&self, term_id: &TermId) -> StorageResult<TermRecord>;

    /// Pending terms awaiting human review, newest first.
    async fn review_queue(&self) -> StorageResult<Vec<TermRecord>>;

    /// All Approved terms, in no particular order.
    async fn list_approved(&self) -> StorageResult<Vec<TermRecord>>;

    /// Apply a human moderation decision to a term.
    async fn apply_moderation(
        &self,
        term_id: &TermId,
        update: ModerationUpdate,
    ) -> StorageResult<TermRecord>;

    /// Replace every term's trending score in one pass.
    ///
    /// Terms absent from `scores` are reset to 0.0 — a recomputation is a
    /// full projection refresh, not a partial update.
    async fn set_trending_scores(&self, scores: &HashMap<TermId, f64>) -> StorageResult<()>;
}

// ---------------------------------------------------------------------------
// VoteLedger — Append-Only Vote Persistence
// ---------------------------------------------------------------------------

/// Append-only vote ledger; source of truth for every term's score.
///
/// Guarantees:
/// - At most one vote per (term, voter) pair.
/// - The duplicate check, the ledger append, and the `score += value`
///   update execute as ONE atomic unit: a second concurrent caller with
///   the same identity observes `DuplicateVote`, never a double count.
/// - At any time a term's `score` equals the sum of its ledger values.
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Record a vote and update the term's score atomically.
    ///
    /// Returns the updated term. Errors: `TermNotFound`, `DuplicateVote`.
    async fn cast_vote(
        &self,
        term_id: &TermId,
        voter: &VoterIdentity,
        value: VoteValue,
    ) -> StorageResult<TermRecord>;

    /// All votes recorded at or after `cutoff`, across all terms.
    ///
    /// Feed for the trending recomputation pass.
    async fn votes_since(&self, cutoff: DateTime<Utc>) -> StorageResult<Vec<VoteRecord>>;

    /// All votes for one term. Used to audit the maintained score against
    /// a full recomputation.
    async fn votes_for_term(&self, term_id: &TermId) -> StorageResult<Vec<VoteRecord>>;
}

// ---------------------------------------------------------------------------
// ModeratorStore — Moderator Accounts
// ---------------------------------------------------------------------------

/// Moderator account persistence.
#[async_trait]
pub trait ModeratorStore: Send + Sync {
    /// Insert a moderator. `username` must be unique.
    async fn insert_moderator(&self, moderator: ModeratorRecord) -> StorageResult<ModeratorRecord>;

    /// Look up a moderator by username.
    /// Returns `StorageError::ModeratorNotFound` if absent.
    async fn find_moderator(&self, username: &str) -> StorageResult<ModeratorRecord>;
}

impl TermRecord {
    /// Build a fresh submission record: Pending, score 0, no trend yet.
    pub fn new_submission(
        text: String,
        definition: String,
        example: String,
        moderation_note: Option<String>,
    ) -> Self {
        TermRecord {
            term_id: TermId::new(),
            text,
            definition,
            example,
            score: 0,
            trending_score: 0.0,
            status: TermStatus::Pending,
            moderation_note,
            moderated_at: None,
            moderated_by: None,
            created_at: Utc::now(),
        }
    }
}
