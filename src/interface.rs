//! Caller-facing result types.
//!
//! The web/rendering layer above this crate consumes plain ordered hits; the
//! internal [`crate::ranking::ScoredResult`] (which carries the dedup key)
//! never crosses this boundary.

use serde::Serialize;

/// Number of matched catalog terms reported per hit.
pub(crate) const MATCHED_KEYWORDS_MAX: usize = 5;

/// One ranked search result, ordered by descending score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub record_id: String,
    pub name: String,
    pub score: f64,
    /// Catalog terms occurring in the record's text, most frequent first.
    pub matched_keywords: Vec<String>,
}
