//! Trending projection refresh against the SurrealDB-backed store.
//!
//! The refresh is a full replacement committed as one unit: every term
//! ends at its recomputed value or 0.0, and a pass that errors leaves no
//! half-written projection behind.

use std::collections::HashMap;

use lexicon_state::{SurrealGlossary, TermRecord, TermStore};

fn sample_term(text: &str) -> TermRecord {
    TermRecord::new_submission(
        text.to_string(),
        format!("definition of {text}"),
        format!("example of {text}"),
        None,
    )
}

#[tokio::test]
async fn refresh_replaces_the_whole_projection() {
    let store = SurrealGlossary::in_memory().await.unwrap();
    let hot = store.create_term(sample_term("hot")).await.unwrap();
    let cold = store.create_term(sample_term("cold")).await.unwrap();

    let mut scores = HashMap::new();
    scores.insert(hot.term_id.clone(), 0.5);
    scores.insert(cold.term_id.clone(), -0.25);
    store.set_trending_scores(&scores).await.unwrap();

    assert_eq!(store.get_term(&hot.term_id).await.unwrap().trending_score, 0.5);
    assert_eq!(store.get_term(&cold.term_id).await.unwrap().trending_score, -0.25);

    // Next pass: cold has gone quiet and must land back at zero, hot at
    // its new value, in the same commit.
    let mut scores = HashMap::new();
    scores.insert(hot.term_id.clone(), 0.75);
    store.set_trending_scores(&scores).await.unwrap();

    assert_eq!(store.get_term(&hot.term_id).await.unwrap().trending_score, 0.75);
    assert_eq!(store.get_term(&cold.term_id).await.unwrap().trending_score, 0.0);
}

#[tokio::test]
async fn quiet_window_zeroes_every_term() {
    let store = SurrealGlossary::in_memory().await.unwrap();
    let term = store.create_term(sample_term("mid")).await.unwrap();

    let mut scores = HashMap::new();
    scores.insert(term.term_id.clone(), 1.0);
    store.set_trending_scores(&scores).await.unwrap();

    store.set_trending_scores(&HashMap::new()).await.unwrap();
    assert_eq!(store.get_term(&term.term_id).await.unwrap().trending_score, 0.0);
}
