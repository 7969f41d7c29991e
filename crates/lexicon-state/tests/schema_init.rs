//! Schema initialization tests for the SurrealDB-backed store.

use chrono::Utc;
use lexicon_state::{
    ModerationUpdate, ModeratorId, SurrealGlossary, TermRecord, TermStatus, TermStore,
};

fn sample_term(text: &str) -> TermRecord {
    TermRecord::new_submission(
        text.to_string(),
        format!("definition of {text}"),
        format!("example of {text}"),
        Some("[SPAM] Detected repetitive patterns or potential spam content".to_string()),
    )
}

#[tokio::test]
async fn in_memory_store_initializes_schema() {
    // Constructor runs init_schema; a round trip proves the tables exist.
    let store = SurrealGlossary::in_memory().await.unwrap();
    let term = store.create_term(sample_term("glizzy")).await.unwrap();
    let fetched = store.get_term(&term.term_id).await.unwrap();

    assert_eq!(fetched.text, "glizzy");
    assert_eq!(fetched.status, TermStatus::Pending);
    assert_eq!(
        fetched.moderation_note.as_deref(),
        Some("[SPAM] Detected repetitive patterns or potential spam content")
    );
}

#[tokio::test]
async fn moderation_fields_survive_the_db_round_trip() {
    let store = SurrealGlossary::in_memory().await.unwrap();
    let term = store.create_term(sample_term("sus")).await.unwrap();
    let moderator = ModeratorId::new();

    let updated = store
        .apply_moderation(
            &term.term_id,
            ModerationUpdate {
                status: TermStatus::Approved,
                moderator_id: moderator.clone(),
                note: None,
                moderated_at: Utc::now(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TermStatus::Approved);
    assert_eq!(updated.moderated_by, Some(moderator));
    assert!(updated.moderated_at.is_some());
    assert!(updated.moderation_note.is_none());

    let approved = store.list_approved().await.unwrap();
    assert_eq!(approved.len(), 1);
}
