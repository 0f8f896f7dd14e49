//! Per-request query state: effective keyword weights and match normalization.
//!
//! The boost table is the concurrency-critical piece: it is computed fresh for
//! every query from the catalog's immutable weights and is never written back,
//! so any number of searches can run against the same catalog at once.

use crate::keywords::KeywordCatalog;

/// Multiplier applied to catalog terms that appear in the query text.
pub const QUERY_TERM_BOOST: f64 = 1.5;

/// Effective keyword weights for one query evaluation, parallel to the
/// catalog's iteration order.
#[derive(Debug, Clone)]
pub struct QueryWeights {
    weights: Vec<f64>,
}

impl QueryWeights {
    /// Boost every catalog term appearing (case-insensitive substring) in the
    /// raw query text by [`QUERY_TERM_BOOST`]; all other terms keep their
    /// original weight.
    pub fn for_query(catalog: &KeywordCatalog, query: &str) -> Self {
        let query_lower = query.to_lowercase();
        let weights = catalog
            .all()
            .iter()
            .map(|k| {
                if !query_lower.is_empty() && query_lower.contains(&k.name.to_lowercase()) {
                    k.original_weight * QUERY_TERM_BOOST
                } else {
                    k.original_weight
                }
            })
            .collect();
        QueryWeights { weights }
    }

    /// Original weights, unboosted. Used for empty queries.
    pub fn neutral(catalog: &KeywordCatalog) -> Self {
        QueryWeights {
            weights: catalog.all().iter().map(|k| k.original_weight).collect(),
        }
    }

    /// Effective weight of the keyword at catalog position `idx`.
    pub fn get(&self, idx: usize) -> f64 {
        self.weights.get(idx).copied().unwrap_or(0.0)
    }
}

/// Normalize text for name matching: case-fold, strip everything except
/// letters, digits, and CJK ideographs to a single space class, collapse
/// whitespace. Used only for name matching, never for keyword counting.
pub fn normalize_for_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Whether `c` is a CJK ideograph (unified, extension A, or compatibility).
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
    )
}
