//! Error types for lexicon-state

use thiserror::Error;

/// Errors that can occur in the state persistence layer
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Serialization(err.to_string())
    }
}

/// Errors surfaced by the storage traits.
///
/// `DuplicateVote` and `TermNotFound` are part of the ledger contract and
/// must keep their identity all the way up to the caller; everything else
/// collapses into `Backend`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Referenced term does not exist
    #[error("Term not found: {term_id}")]
    TermNotFound { term_id: String },

    /// A vote already exists for this (term, voter) pair
    #[error("Duplicate vote on term {term_id} by {voter}")]
    DuplicateVote { term_id: String, voter: String },

    /// Referenced moderator does not exist
    #[error("Moderator not found: {username}")]
    ModeratorNotFound { username: String },

    /// Backend failure (connection, query, constraint other than the above)
    #[error("Storage backend error: {0}")]
    Backend(String),
}
