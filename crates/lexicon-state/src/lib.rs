//! Lexicon-State: SurrealDB Backend for the Lexicon Glossary
//!
//! This crate provides the persistence layer for the term lifecycle engine.
//! It handles all I/O with SurrealDB, exposing backend-agnostic traits for
//! terms, the vote ledger, and moderator accounts.
//!
//! ## Key Components
//!
//! - `TermStore` / `VoteLedger` / `ModeratorStore`: the storage contracts
//! - `SurrealGlossary`: SurrealDB-backed implementation of all three
//! - `MemoryGlossary`: in-memory fake for deterministic tests
//!
//! The ledger contract is the load-bearing piece: one vote per
//! (term, voter), with the duplicate check, the append, and the score
//! update executing as a single atomic unit.

mod error;
pub mod fakes;
mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_store;

pub use error::{StateError, StorageError};
pub use storage_traits::{
    ModerationUpdate, ModeratorId, ModeratorRecord, ModeratorStore, StorageResult, TermId,
    TermRecord, TermStatus, TermStore, VoteLedger, VoteRecord, VoteValue, VoterIdentity,
};
pub use surreal_store::SurrealGlossary;

/// Result type for lexicon-state operations
pub type Result<T> = std::result::Result<T, StateError>;
