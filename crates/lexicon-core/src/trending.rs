//! Windowed trending-score recomputation.
//!
//! Trending is a refreshable materialized view, not a running counter:
//! each refresh does a full pass over the last `WINDOW_HOURS` of ledger
//! entries and replaces every term's trending score. Re-running with no
//! new votes reproduces the same values. Score and trending deliberately
//! stay two different update disciplines.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use lexicon_state::{TermId, TermRecord, TermStore, VoteLedger, VoteRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Width of the trending window.
pub const WINDOW_HOURS: i64 = 24;

/// Classification of a trending score.
///
/// The thresholds sit at the saturated bounds of the [-1, 1] ratio, so
/// Rising/Falling only fire on unanimous recent sentiment. This mirrors
/// the reference dashboard's behavior and is intentional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl TrendDirection {
    pub fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            TrendDirection::Rising
        } else if score <= -1.0 {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        }
    }
}

/// An approved term with its refreshed trend classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermInsight {
    pub term: TermRecord,
    pub direction: TrendDirection,
}

/// Per-term net-sentiment ratio over a window of votes:
/// `(upvotes - downvotes) / total`, in [-1, 1]. Terms with no votes in
/// the window are absent from the result (their score is 0 by reset).
pub fn compute_trending(window: &[VoteRecord]) -> HashMap<TermId, f64> {
    let mut tallies: HashMap<TermId, (i64, i64)> = HashMap::new();
    for vote in window {
        let (up, down) = tallies.entry(vote.term_id.clone()).or_insert((0, 0));
        if vote.value.as_i64() > 0 {
            *up += 1;
        } else {
            *down += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(term_id, (up, down))| {
            let total = up + down;
            (term_id, (up - down) as f64 / total as f64)
        })
        .collect()
}

/// Trending recomputation and the insights view.
pub struct TrendingService {
    store: Arc<dyn TermStore>,
    ledger: Arc<dyn VoteLedger>,
}

impl TrendingService {
    pub fn new(store: Arc<dyn TermStore>, ledger: Arc<dyn VoteLedger>) -> Self {
        TrendingService { store, ledger }
    }

    /// Recompute every term's trending score from the recent ledger.
    ///
    /// Idempotent: absent new votes, a second pass writes the same values.
    pub async fn refresh(&self) -> Result<()> {
        let cutoff = Utc::now() - Duration::hours(WINDOW_HOURS);
        let window = self.ledger.votes_since(cutoff).await?;
        let scores = compute_trending(&window);

        debug!(
            window_votes = window.len(),
            trending_terms = scores.len(),
            "trending scores recomputed"
        );

        self.store.set_trending_scores(&scores).await?;
        Ok(())
    }

    /// Refresh trending scores, then return approved terms ordered by
    /// absolute trending score (most movement first, either direction).
    ///
    /// `search` matches case-insensitively against term text or
    /// definition.
    pub async fn insights(&self, search: Option<&str>) -> Result<Vec<TermInsight>> {
        self.refresh().await?;

        let mut terms = self.store.list_approved().await?;

        if let Some(q) = search {
            let q = q.to_lowercase();
            terms.retain(|t| {
                t.text.to_lowercase().contains(&q) || t.definition.to_lowercase().contains(&q)
            });
        }

        terms.sort_by(|a, b| {
            b.trending_score
                .abs()
                .partial_cmp(&a.trending_score.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term_id.cmp(&b.term_id))
        });

        Ok(terms
            .into_iter()
            .map(|term| TermInsight {
                direction: TrendDirection::from_score(term.trending_score),
                term,
            })
            .collect())
    }
}
