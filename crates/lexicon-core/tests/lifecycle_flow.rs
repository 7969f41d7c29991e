//! End-to-end lifecycle tests: submission through human moderation.

use std::sync::Arc;

use lexicon_core::{
    Argon2Verifier, CredentialVerifier, LexiconError, ModeratorAuth, ModerationPipeline,
    TermLifecycle, TermStatus, TermSubmission,
};
use lexicon_moderation::fakes::{CleanClassifier, FailingCall, FailingClassifier};
use lexicon_state::fakes::MemoryGlossary;
use lexicon_state::{ModeratorId, ModeratorRecord, ModeratorStore, TermId};

fn lifecycle_with(classifier: Arc<dyn lexicon_moderation::ContentClassifier>) -> (Arc<MemoryGlossary>, TermLifecycle) {
    let store = Arc::new(MemoryGlossary::new());
    let lifecycle = TermLifecycle::new(store.clone(), ModerationPipeline::new(classifier));
    (store, lifecycle)
}

fn submission(text: &str, definition: &str) -> TermSubmission {
    TermSubmission {
        text: text.to_string(),
        definition: definition.to_string(),
        example: format!("an example using {text}"),
    }
}

#[tokio::test]
async fn clean_submission_is_pending_with_no_note() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let term = lifecycle
        .submit(submission("rizz", "effortless charm and natural confidence"))
        .await
        .unwrap();

    // Clean verdict does not auto-publish; human confirmation is required.
    assert_eq!(term.status, TermStatus::Pending);
    assert!(term.moderation_note.is_none());
    assert_eq!(term.score, 0);
}

#[tokio::test]
async fn spam_submission_is_pending_with_spam_note() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let term = lifecycle
        .submit(submission(
            "great",
            "great great great great great great great great great great",
        ))
        .await
        .unwrap();

    assert_eq!(term.status, TermStatus::Pending);
    assert!(term.moderation_note.unwrap().starts_with("[SPAM]"));
}

#[tokio::test]
async fn classifier_outage_still_accepts_the_submission() {
    // Moderation infrastructure failure must not block the submitter;
    // the term just lands in the review queue with an ERROR note.
    let (_, lifecycle) = lifecycle_with(Arc::new(FailingClassifier::new(FailingCall::Both)));
    let term = lifecycle
        .submit(submission("rizz", "effortless charm and natural confidence"))
        .await
        .unwrap();

    assert_eq!(term.status, TermStatus::Pending);
    assert!(term.moderation_note.unwrap().starts_with("[ERROR]"));
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_store() {
    let (store, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let err = lifecycle
        .submit(submission("", "valid definition"))
        .await
        .unwrap_err();

    assert!(matches!(err, LexiconError::Validation(_)));
    assert!(lifecycle.review_queue().await.unwrap().is_empty());
    drop(store);
}

#[tokio::test]
async fn review_queue_lists_pending_newest_first() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    lifecycle.submit(submission("first", "the first entry to arrive")).await.unwrap();
    lifecycle.submit(submission("second", "the second entry to arrive")).await.unwrap();

    let queue = lifecycle.review_queue().await.unwrap();
    assert_eq!(queue.len(), 2);
    // Both submitted within the same instant tie-break on ID, but newest
    // must never sort after older entries.
    assert!(queue[0].created_at >= queue[1].created_at);
}

#[tokio::test]
async fn approve_stamps_moderation_fields() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let term = lifecycle
        .submit(submission("rizz", "effortless charm and natural confidence"))
        .await
        .unwrap();
    let moderator = ModeratorId::new();

    let approved = lifecycle
        .approve(&term.term_id, &moderator, None)
        .await
        .unwrap();

    assert_eq!(approved.status, TermStatus::Approved);
    assert!(approved.moderated_at.is_some());
    assert_eq!(approved.moderated_by, Some(moderator));
    assert!(approved.moderation_note.is_none());
}

#[tokio::test]
async fn approve_clears_the_pipeline_note() {
    let (_, lifecycle) = lifecycle_with(Arc::new(FailingClassifier::new(FailingCall::Both)));
    let term = lifecycle
        .submit(submission("rizz", "effortless charm and natural confidence"))
        .await
        .unwrap();
    assert!(term.moderation_note.is_some());

    let approved = lifecycle
        .approve(&term.term_id, &ModeratorId::new(), None)
        .await
        .unwrap();

    assert!(approved.moderation_note.is_none());
}

#[tokio::test]
async fn reject_requires_a_non_empty_note() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let term = lifecycle
        .submit(submission("mid", "neither good nor bad really"))
        .await
        .unwrap();

    let err = lifecycle
        .reject(&term.term_id, &ModeratorId::new(), "   ".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, LexiconError::Validation(_)));

    let rejected = lifecycle
        .reject(&term.term_id, &ModeratorId::new(), "offensive".to_string())
        .await
        .unwrap();
    assert_eq!(rejected.status, TermStatus::Rejected);
    assert_eq!(rejected.moderation_note.as_deref(), Some("offensive"));
    assert!(rejected.moderated_at.is_some());
}

#[tokio::test]
async fn re_moderation_is_allowed_from_any_state() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let term = lifecycle
        .submit(submission("cap", "a lie or exaggeration"))
        .await
        .unwrap();
    let moderator = ModeratorId::new();

    lifecycle
        .reject(&term.term_id, &moderator, "too vague".to_string())
        .await
        .unwrap();
    let reconsidered = lifecycle
        .approve(&term.term_id, &moderator, Some("on second look, fine".to_string()))
        .await
        .unwrap();

    assert_eq!(reconsidered.status, TermStatus::Approved);
    assert_eq!(
        reconsidered.moderation_note.as_deref(),
        Some("on second look, fine")
    );
}

#[tokio::test]
async fn moderating_an_unknown_term_is_not_found() {
    let (_, lifecycle) = lifecycle_with(Arc::new(CleanClassifier));
    let err = lifecycle
        .approve(&TermId::new(), &ModeratorId::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, LexiconError::NotFound(_)));
}

// ===========================================================================
// Moderator authentication
// ===========================================================================

/// Deterministic verifier: a hash matches when it equals "hash:" + password.
struct PrefixVerifier;

impl CredentialVerifier for PrefixVerifier {
    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("hash:{password}")
    }
}

async fn auth_fixture() -> ModeratorAuth {
    let store = Arc::new(MemoryGlossary::new());
    store
        .insert_moderator(ModeratorRecord {
            moderator_id: ModeratorId::new(),
            username: "admin".to_string(),
            password_hash: "hash:admin123".to_string(),
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap();
    ModeratorAuth::new(store, Arc::new(PrefixVerifier))
}

#[tokio::test]
async fn authenticate_happy_path() {
    let auth = auth_fixture().await;
    let moderator = auth.authenticate("admin", "admin123").await.unwrap();
    assert_eq!(moderator.username, "admin");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let auth = auth_fixture().await;

    let wrong_password = auth.authenticate("admin", "nope").await.unwrap_err();
    let unknown_user = auth.authenticate("ghost", "admin123").await.unwrap_err();

    assert!(matches!(wrong_password, LexiconError::Unauthorized));
    assert!(matches!(unknown_user, LexiconError::Unauthorized));
}

#[tokio::test]
async fn argon2_verifier_works_end_to_end() {
    let store = Arc::new(MemoryGlossary::new());
    let hash = Argon2Verifier::hash_password("s3cret-pass").unwrap();
    store
        .insert_moderator(ModeratorRecord {
            moderator_id: ModeratorId::new(),
            username: "root".to_string(),
            password_hash: hash,
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap();
    let auth = ModeratorAuth::new(store, Arc::new(Argon2Verifier));

    assert!(auth.authenticate("root", "s3cret-pass").await.is_ok());
    assert!(matches!(
        auth.authenticate("root", "wrong").await.unwrap_err(),
        LexiconError::Unauthorized
    ));
}
