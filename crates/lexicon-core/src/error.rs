//! Domain-level error taxonomy for the lexicon.
//!
//! Classifier failures never appear here: the moderation pipeline absorbs
//! them into ERROR-note verdicts, so a submitter is never blocked by a
//! moderation infrastructure outage.

use lexicon_state::StorageError;

/// Lexicon domain errors.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// Malformed input; user-correctable, never retried automatically
    #[error("validation error: {0}")]
    Validation(String),

    /// This identity already voted on this term; terminal for the caller
    #[error("already voted on term {term_id}")]
    DuplicateVote { term_id: String },

    /// Missing or invalid moderator credentials/session
    #[error("unauthorized")]
    Unauthorized,

    /// Referenced term or moderator does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage failure; surfaced to the caller, who may retry the request
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for LexiconError {
    fn from(err: StorageError) -> Self {
        // DuplicateVote and the not-found variants keep their identity;
        // the HTTP collaborator maps them to 4xx while Storage stays 5xx.
        match err {
            StorageError::DuplicateVote { term_id, .. } => LexiconError::DuplicateVote { term_id },
            StorageError::TermNotFound { term_id } => {
                LexiconError::NotFound(format!("term {term_id}"))
            }
            StorageError::ModeratorNotFound { username } => {
                LexiconError::NotFound(format!("moderator {username}"))
            }
            StorageError::Backend(msg) => LexiconError::Storage(msg),
        }
    }
}

/// Result type for lexicon domain operations.
pub type Result<T> = std::result::Result<T, LexiconError>;
