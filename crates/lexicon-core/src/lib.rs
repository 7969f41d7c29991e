//! Lexicon Core Library
//!
//! Domain services for the community slang glossary's term lifecycle
//! engine: submission + moderation, vote casting over the append-only
//! ledger, windowed trending recomputation, ranked queries, and moderator
//! authentication. Persistence and the external classifier are injected
//! capabilities; nothing here is ambient.

pub mod auth;
pub mod error;
pub mod lifecycle;
pub mod ranking;
pub mod submission;
pub mod trending;
pub mod voting;

// Re-export key types
pub use auth::{Argon2Verifier, CredentialVerifier, ModeratorAuth};
pub use error::{LexiconError, Result};
pub use lifecycle::TermLifecycle;
pub use ranking::{RankedTerm, RankingQuery, RankingService, SortKey};
pub use submission::TermSubmission;
pub use trending::{compute_trending, TermInsight, TrendDirection, TrendingService, WINDOW_HOURS};
pub use voting::VotingService;

pub use lexicon_moderation::{ModerationNote, ModerationPipeline, NoteKind, Verdict};
pub use lexicon_state::{
    ModeratorId, ModeratorRecord, TermId, TermRecord, TermStatus, VoteValue, VoterIdentity,
};
