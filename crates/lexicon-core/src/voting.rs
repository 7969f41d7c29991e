//! Vote casting over the ledger.
//!
//! Score is an event-sourced running total: the ledger appends the vote
//! and applies `score += value` as one atomic unit. This service only
//! validates the raw value and maps errors into the domain taxonomy.

use std::sync::Arc;

use lexicon_state::{TermId, TermRecord, VoteLedger, VoteValue, VoterIdentity};
use tracing::debug;

use crate::error::{LexiconError, Result};

/// Vote casting service.
pub struct VotingService {
    ledger: Arc<dyn VoteLedger>,
}

impl VotingService {
    pub fn new(ledger: Arc<dyn VoteLedger>) -> Self {
        VotingService { ledger }
    }

    /// Cast a vote. `raw_value` must be exactly -1 or +1.
    ///
    /// Returns the updated term, including the new score. A second call
    /// with the same (term, voter) pair fails with `DuplicateVote` and
    /// leaves the score untouched.
    pub async fn cast_vote(
        &self,
        term_id: &TermId,
        voter: &VoterIdentity,
        raw_value: i64,
    ) -> Result<TermRecord> {
        let value = VoteValue::try_from(raw_value).map_err(|other| {
            LexiconError::Validation(format!("vote value must be -1 or 1, got {other}"))
        })?;

        debug!(term_id = %term_id, voter = %voter, value = raw_value, "casting vote");
        Ok(self.ledger.cast_vote(term_id, voter, value).await?)
    }
}
