//! Duplicate-vote defense against the SurrealDB-backed store.
//!
//! The in-memory fake proves the contract; this proves the SurrealQL
//! transaction and the unique (term_id, voter) index behave the same way.

use lexicon_state::{
    StorageError, SurrealGlossary, TermRecord, TermStore, VoteLedger, VoteValue, VoterIdentity,
};

fn sample_term() -> TermRecord {
    TermRecord::new_submission(
        "delulu".to_string(),
        "delusional, affectionately".to_string(),
        "she is fully delulu about this".to_string(),
        None,
    )
}

#[tokio::test]
async fn second_vote_from_same_identity_fails() {
    let store = SurrealGlossary::in_memory().await.unwrap();
    let term = store.create_term(sample_term()).await.unwrap();
    let voter = VoterIdentity("192.0.2.7".to_string());

    let updated = store
        .cast_vote(&term.term_id, &voter, VoteValue::Up)
        .await
        .unwrap();
    assert_eq!(updated.score, 1);

    let result = store.cast_vote(&term.term_id, &voter, VoteValue::Down).await;

    assert!(
        matches!(result, Err(StorageError::DuplicateVote { .. })),
        "Second vote from the same identity should fail. Got: {:?}",
        result.ok()
    );

    // The rejected vote must not have touched the score.
    assert_eq!(store.get_term(&term.term_id).await.unwrap().score, 1);
}

#[tokio::test]
async fn rejected_vote_leaves_no_ledger_row() {
    let store = SurrealGlossary::in_memory().await.unwrap();
    let term = store.create_term(sample_term()).await.unwrap();
    let voter = VoterIdentity("192.0.2.8".to_string());

    store.cast_vote(&term.term_id, &voter, VoteValue::Up).await.unwrap();
    let _ = store.cast_vote(&term.term_id, &voter, VoteValue::Up).await;

    let votes = store.votes_for_term(&term.term_id).await.unwrap();
    assert_eq!(votes.len(), 1);
}
