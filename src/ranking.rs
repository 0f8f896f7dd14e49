//! Rank pipeline: effective-weight scoring, name boosts, dedup, ordering.
//!
//! Pipeline order is significant: per-query keyword boosts apply during
//! scoring, the name-match bonus is added afterwards, then duplicates
//! collapse, non-positive scores drop, and the survivors get a stable
//! descending sort. The pipeline has no side effects on the corpus or the
//! catalog, so independent rank calls cannot influence each other.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::keywords::KeywordCatalog;
use crate::models::Cafe;
use crate::query::{normalize_for_match, QueryWeights};
use crate::scoring::{min_max_normalize, weighted_score};

/// Bonus when the normalized record name equals the normalized query.
pub const NAME_EXACT_BOOST: f64 = 80.0;
/// Bonus when the normalized name contains the normalized query.
pub const NAME_SUBSTRING_BOOST: f64 = 50.0;
/// Bonus when every query token appears somewhere in the normalized name.
pub const NAME_TOKENS_BOOST: f64 = 30.0;

/// One scored candidate. `canonical_key` exists for deduplication only.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub cafe: Arc<Cafe>,
    pub score: f64,
    pub(crate) canonical_key: String,
}

/// Rank pre-filtered candidates against a query.
///
/// An empty query skips both the keyword boost and the name bonus: every
/// record is scored with original weights, so the result is effectively a
/// popularity listing of keyword-rich records.
pub fn rank(query: &str, candidates: &[Arc<Cafe>], catalog: &KeywordCatalog) -> Vec<ScoredResult> {
    let query = query.trim();
    let weights = if query.is_empty() {
        QueryWeights::neutral(catalog)
    } else {
        QueryWeights::for_query(catalog, query)
    };
    let normalized_query = normalize_for_match(query);

    let scored: Vec<ScoredResult> = candidates
        .par_iter()
        .map(|cafe| {
            let raw = weighted_score(&cafe.searchable_text, catalog, |i, _| weights.get(i));
            let boost = if query.is_empty() {
                0.0
            } else {
                name_match_boost(&normalize_for_match(&cafe.name), &normalized_query)
            };
            ScoredResult {
                cafe: Arc::clone(cafe),
                score: raw + boost,
                canonical_key: cafe.canonical_key(),
            }
        })
        .collect();

    let mut results = dedup_by_canonical_key(scored);
    results.retain(|r| r.score > 0.0);
    // sort_by is stable: equal scores keep candidate order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        candidates = candidates.len(),
        results = results.len(),
        "ranked query"
    );
    results
}

/// Name-match bonus on normalized text. Tiers are mutually exclusive and
/// checked strongest first.
fn name_match_boost(normalized_name: &str, normalized_query: &str) -> f64 {
    if normalized_query.is_empty() || normalized_name.is_empty() {
        return 0.0;
    }
    if normalized_name == normalized_query {
        return NAME_EXACT_BOOST;
    }
    if normalized_name.contains(normalized_query) {
        return NAME_SUBSTRING_BOOST;
    }
    if normalized_query
        .split_whitespace()
        .all(|token| normalized_name.contains(token))
    {
        return NAME_TOKENS_BOOST;
    }
    0.0
}

/// Collapse results sharing a canonical key, keeping the highest score.
/// First seen wins ties, and the surviving entry keeps its original position.
fn dedup_by_canonical_key(results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    let mut kept: Vec<ScoredResult> = Vec::with_capacity(results.len());
    let mut by_key: HashMap<String, usize> = HashMap::with_capacity(results.len());
    for result in results {
        match by_key.get(&result.canonical_key) {
            Some(&pos) => {
                if result.score > kept[pos].score {
                    kept[pos] = result;
                }
            }
            None => {
                by_key.insert(result.canonical_key.clone(), kept.len());
                kept.push(result);
            }
        }
    }
    kept
}

/// Presentation-only rescale of an already-ranked list to [0, 100] via the
/// same min–max rule as baseline normalization. Monotonic, so it never
/// changes result order.
pub fn normalize_scores(results: &mut [ScoredResult]) {
    let mut scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    min_max_normalize(&mut scores);
    for (result, score) in results.iter_mut().zip(scores) {
        result.score = score;
    }
}
