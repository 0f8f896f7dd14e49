//! Corpus construction and the atomic-swap store.
//!
//! The corpus is read-only during normal operation. A reload builds a complete
//! replacement corpus — baseline normalization included — and swaps it in
//! under a single write lock, so an in-flight scan (which holds an `Arc`
//! snapshot) never observes a partially rebuilt record.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::hashtags::{generate_hashtags, HashtagOptions};
use crate::interface::{SearchHit, MATCHED_KEYWORDS_MAX};
use crate::keywords::KeywordCatalog;
use crate::models::{Cafe, CafeInput};
use crate::ranking::{self, ScoredResult};
use crate::scoring::{baseline_score, min_max_normalize, top_keywords};

/// Error type for record ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read records file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed records file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// The full set of scoreable records, with baselines normalized across the
/// set. Immutable once built.
#[derive(Debug, Default)]
pub struct Corpus {
    cafes: Vec<Arc<Cafe>>,
}

impl Corpus {
    /// Build a corpus from ingestion documents. `baseline_cache` supplies
    /// precomputed raw baseline scores by record id; cached and freshly
    /// computed values go through the same normalization pass together.
    pub fn build(
        inputs: Vec<CafeInput>,
        catalog: &KeywordCatalog,
        baseline_cache: &HashMap<String, f64>,
    ) -> Corpus {
        let mut cafes: Vec<Cafe> = inputs.into_iter().map(Cafe::from_input).collect();

        let mut baselines: Vec<f64> = cafes
            .iter()
            .map(|cafe| {
                baseline_cache
                    .get(&cafe.id)
                    .copied()
                    .unwrap_or_else(|| baseline_score(&cafe.searchable_text, catalog))
            })
            .collect();
        min_max_normalize(&mut baselines);
        for (cafe, baseline) in cafes.iter_mut().zip(baselines) {
            cafe.baseline_score = baseline;
        }

        debug!(records = cafes.len(), "corpus built");
        Corpus {
            cafes: cafes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn cafes(&self) -> &[Arc<Cafe>] {
        &self.cafes
    }

    pub fn get(&self, record_id: &str) -> Option<&Arc<Cafe>> {
        self.cafes.iter().find(|c| c.id == record_id)
    }

    pub fn len(&self) -> usize {
        self.cafes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cafes.is_empty()
    }
}

/// Shared handle over catalog and corpus. Many concurrent readers; reloads
/// swap in a fully built replacement.
pub struct CorpusStore {
    catalog: Arc<KeywordCatalog>,
    corpus: RwLock<Arc<Corpus>>,
}

impl CorpusStore {
    /// Create a store with an empty corpus.
    pub fn new(catalog: KeywordCatalog) -> Self {
        CorpusStore {
            catalog: Arc::new(catalog),
            corpus: RwLock::new(Arc::new(Corpus::default())),
        }
    }

    /// Create a store and ingest an initial set of records.
    pub fn with_records(catalog: KeywordCatalog, inputs: Vec<CafeInput>) -> Self {
        let store = Self::new(catalog);
        store.reload(inputs, &HashMap::new());
        store
    }

    /// Parse a JSON array of ingestion documents.
    pub fn load_inputs(path: impl AsRef<Path>) -> IngestResult<Vec<CafeInput>> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replace the whole corpus. The new corpus is built entirely before the
    /// write lock is taken; readers keep their old snapshot until they drop it.
    pub fn reload(&self, inputs: Vec<CafeInput>, baseline_cache: &HashMap<String, f64>) {
        let replacement = Arc::new(Corpus::build(inputs, &self.catalog, baseline_cache));
        let records = replacement.len();
        *self.corpus.write() = replacement;
        info!(records, "corpus swapped");
    }

    /// Current corpus snapshot. Cheap to clone; safe to hold across a reload.
    pub fn corpus(&self) -> Arc<Corpus> {
        Arc::clone(&self.corpus.read())
    }

    pub fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    /// Rank the whole corpus against a query and shape the results for the
    /// caller, most relevant first.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let corpus = self.corpus();
        let results = ranking::rank(query, corpus.cafes(), &self.catalog);
        results.iter().map(|r| self.to_hit(r)).collect()
    }

    /// Rank an externally filtered candidate list (attribute filters live
    /// upstream of this crate).
    pub fn search_candidates(&self, query: &str, candidates: &[Arc<Cafe>]) -> Vec<SearchHit> {
        ranking::rank(query, candidates, &self.catalog)
            .iter()
            .map(|r| self.to_hit(r))
            .collect()
    }

    /// Hashtag summary for one record, or `None` for an unknown id.
    pub fn hashtags(&self, record_id: &str, query: &str, options: &HashtagOptions) -> Option<String> {
        let corpus = self.corpus();
        let cafe = corpus.get(record_id)?;
        Some(generate_hashtags(
            &cafe.searchable_text,
            &self.catalog,
            query,
            options,
        ))
    }

    fn to_hit(&self, result: &ScoredResult) -> SearchHit {
        let matched_keywords = top_keywords(
            &result.cafe.searchable_text,
            &self.catalog,
            MATCHED_KEYWORDS_MAX,
        )
        .into_iter()
        .map(|k| k.name.clone())
        .collect();
        SearchHit {
            record_id: result.cafe.id.clone(),
            name: result.cafe.name.clone(),
            score: result.score,
            matched_keywords,
        }
    }
}
