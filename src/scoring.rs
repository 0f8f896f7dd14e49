//! Occurrence counting and weighted scoring primitives.
//!
//! The corpus mixes CJK prose (no word boundaries) with Latin tokens, so
//! counting is asymmetric: pure-ASCII-letter terms match on word boundaries
//! ("cat" must not match inside "category") while everything else uses a
//! non-overlapping substring scan. Both paths are case-insensitive.

use crate::keywords::{Keyword, KeywordCatalog, CORE_WEIGHT_MIN};

/// Score assigned to every record of a degenerate corpus (all raw baselines
/// equal) by min–max normalization.
pub const FLAT_CORPUS_SCORE: f64 = 50.0;
/// Upper bound of the normalized score range.
pub const NORMALIZED_SCORE_MAX: f64 = 100.0;

/// Count occurrences of `term` in `text`, case-insensitively.
/// Empty terms never match.
pub fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() || text.is_empty() {
        return 0;
    }
    let text_lower = text.to_lowercase();
    let term_lower = term.to_lowercase();

    if term.chars().all(|c| c.is_ascii_alphabetic()) {
        count_word_bounded(&text_lower, &term_lower)
    } else {
        count_substrings(&text_lower, &term_lower)
    }
}

/// Word-boundary counting for Latin terms. A boundary is any neighbor that is
/// not an ASCII letter or digit — CJK neighbors count as boundaries, so
/// "wifi" still matches inside "免費wifi".
fn count_word_bounded(text_lower: &str, term_lower: &str) -> usize {
    text_lower
        .match_indices(term_lower)
        .filter(|&(pos, matched)| {
            let before_ok = text_lower[..pos]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_ascii_alphanumeric());
            let after_ok = text_lower[pos + matched.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_ascii_alphanumeric());
            before_ok && after_ok
        })
        .count()
}

/// Non-overlapping substring scan: find, advance past the full match, repeat.
fn count_substrings(text_lower: &str, term_lower: &str) -> usize {
    let mut count = 0;
    let mut idx = 0;
    while let Some(pos) = text_lower[idx..].find(term_lower) {
        count += 1;
        idx += pos + term_lower.len();
    }
    count
}

/// Weighted occurrence score over the whole catalog. `weight_of` receives the
/// keyword's catalog position plus the keyword itself, so callers can plug in
/// either original or per-query effective weights.
pub fn weighted_score(
    text: &str,
    catalog: &KeywordCatalog,
    weight_of: impl Fn(usize, &Keyword) -> f64,
) -> f64 {
    catalog
        .all()
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let weight = weight_of(i, k);
            if weight == 0.0 {
                return 0.0;
            }
            count_occurrences(text, &k.name) as f64 * weight
        })
        .sum()
}

/// Query-independent popularity score: CORE-tier original weights only.
/// Raw value; normalization across the corpus happens at build time.
pub fn baseline_score(text: &str, catalog: &KeywordCatalog) -> f64 {
    weighted_score(text, catalog, |_, k| {
        if k.original_weight >= CORE_WEIGHT_MIN {
            k.original_weight
        } else {
            0.0
        }
    })
}

/// Catalog keywords ranked by occurrence count in `text`, descending.
/// Zero-occurrence keywords are excluded; ties keep catalog order.
pub fn top_keywords<'a>(
    text: &str,
    catalog: &'a KeywordCatalog,
    top_n: usize,
) -> Vec<&'a Keyword> {
    let mut counted: Vec<(usize, &Keyword)> = catalog
        .all()
        .iter()
        .map(|k| (count_occurrences(text, &k.name), k))
        .filter(|&(count, _)| count > 0)
        .collect();
    // Stable sort: equal counts preserve catalog order.
    counted.sort_by(|a, b| b.0.cmp(&a.0));
    counted.into_iter().take(top_n).map(|(_, k)| k).collect()
}

/// Min–max normalize scores to [0, 100] in place. A flat input (max == min)
/// maps every score to 50.0 — no division by zero and no arbitrary ordering
/// when nothing differs.
pub fn min_max_normalize(scores: &mut [f64]) {
    let Some(&first) = scores.first() else {
        return;
    };
    let (min, max) = scores.iter().fold((first, first), |(lo, hi), &s| {
        (lo.min(s), hi.max(s))
    });
    if max == min {
        scores.iter_mut().for_each(|s| *s = FLAT_CORPUS_SCORE);
    } else {
        scores
            .iter_mut()
            .for_each(|s| *s = (*s - min) / (max - min) * NORMALIZED_SCORE_MAX);
    }
}
