//! Paginated, searchable, ranked views over approved terms.
//!
//! Ranks are assigned over the FULL approved-and-filtered ordering before
//! pagination, so a row's rank reflects its position in the whole result
//! set, not within the returned page. Ties are broken by term ID so
//! pagination is stable across requests.

use std::sync::Arc;

use lexicon_state::{TermRecord, TermStore};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sort key for the ranking query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// All-time net vote total
    Score,
    /// Windowed trending score
    Trending,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Score
    }
}

/// A term with its 1-based rank in the full ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTerm {
    pub rank: u64,
    pub term: TermRecord,
}

/// Ranking query parameters.
#[derive(Debug, Clone)]
pub struct RankingQuery {
    /// Case-insensitive substring match against the term text
    pub search: Option<String>,
    pub sort: SortKey,
    pub limit: usize,
    pub offset: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        RankingQuery {
            search: None,
            sort: SortKey::Score,
            limit: 25,
            offset: 0,
        }
    }
}

/// Ranking query over approved terms.
pub struct RankingService {
    store: Arc<dyn TermStore>,
}

impl RankingService {
    pub fn new(store: Arc<dyn TermStore>) -> Self {
        RankingService { store }
    }

    /// List approved terms: filter, order, rank the full set, then page.
    pub async fn list_terms(&self, query: &RankingQuery) -> Result<Vec<RankedTerm>> {
        let mut terms = self.store.list_approved().await?;

        if let Some(q) = &query.search {
            let q = q.to_lowercase();
            terms.retain(|t| t.text.to_lowercase().contains(&q));
        }

        sort_for_ranking(&mut terms, query.sort);

        Ok(terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| RankedTerm {
                rank: i as u64 + 1,
                term,
            })
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}

/// Descending by the chosen key, ascending term ID as the deterministic
/// tie-break.
fn sort_for_ranking(terms: &mut [TermRecord], sort: SortKey) {
    match sort {
        SortKey::Score => terms.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| a.term_id.cmp(&b.term_id))
        }),
        SortKey::Trending => terms.sort_by(|a, b| {
            b.trending_score
                .partial_cmp(&a.trending_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term_id.cmp(&b.term_id))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon_state::TermRecord;

    fn term(text: &str, score: i64, trending: f64) -> TermRecord {
        let mut t = TermRecord::new_submission(
            text.to_string(),
            format!("definition of {text}"),
            format!("example of {text}"),
            None,
        );
        t.score = score;
        t.trending_score = trending;
        t
    }

    #[test]
    fn score_sort_is_descending_with_id_tiebreak() {
        let mut terms = vec![term("low", 1, 0.0), term("high", 5, 0.0), term("mid", 3, 0.0)];
        sort_for_ranking(&mut terms, SortKey::Score);
        let texts: Vec<&str> = terms.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_scores_order_by_id() {
        let a = term("a", 3, 0.0);
        let b = term("b", 3, 0.0);
        let expected_first = a.term_id.clone().min(b.term_id.clone());

        let mut terms = vec![b, a];
        sort_for_ranking(&mut terms, SortKey::Score);
        assert_eq!(terms[0].term_id, expected_first);

        // Stable under re-sorting: pagination depends on this.
        let snapshot: Vec<_> = terms.iter().map(|t| t.term_id.clone()).collect();
        sort_for_ranking(&mut terms, SortKey::Score);
        let resorted: Vec<_> = terms.iter().map(|t| t.term_id.clone()).collect();
        assert_eq!(snapshot, resorted);
    }

    #[test]
    fn trending_sort_uses_trending_key() {
        let mut terms = vec![term("flat", 100, 0.0), term("hot", 0, 0.9)];
        sort_for_ranking(&mut terms, SortKey::Trending);
        assert_eq!(terms[0].text, "hot");
    }
}
