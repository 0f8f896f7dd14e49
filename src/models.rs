//! Café record model and searchable-text assembly.
//!
//! `searchable_text` is built once when a record enters the corpus and is
//! immutable afterwards; re-ingestion is the only way to change it. External
//! content fetching that failed upstream simply arrives as empty fields and
//! scores zero — never an error.

use serde::Deserialize;

use crate::content::{ContentNode, MAX_CONTENT_DEPTH};
use crate::query::normalize_for_match;

/// Ingestion document for one café listing. All fields are optional; missing
/// text degrades to a zero score rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CafeInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub address: String,
    /// Feature labels (e.g. power outlets, no time limit).
    #[serde(default)]
    pub features: Vec<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw URL or location string; last-resort identity for deduplication.
    #[serde(default)]
    pub location: String,
    /// Extracted page text from the optional crawling pipeline.
    #[serde(default)]
    pub content: Option<ContentNode>,
}

/// An ingested café record. Immutable once built.
#[derive(Debug, Clone)]
pub struct Cafe {
    pub id: String,
    pub name: String,
    pub district: String,
    pub address: String,
    pub location: String,
    /// Concatenation of every descriptive field, built once at ingestion.
    pub searchable_text: String,
    /// Query-independent popularity, min–max normalized to [0, 100] across
    /// the corpus at build time.
    pub baseline_score: f64,
}

impl Cafe {
    /// Assemble a record from its ingestion document. The baseline score is
    /// filled in by the corpus builder once the whole corpus is known.
    pub fn from_input(input: CafeInput) -> Cafe {
        let searchable_text = build_searchable_text(&input);
        Cafe {
            id: input.id,
            name: input.name,
            district: input.district,
            address: input.address,
            location: input.location,
            searchable_text,
            baseline_score: 0.0,
        }
    }

    /// Identity used to collapse duplicate results. Resolution order:
    /// record id, then normalized name + address, then the raw location
    /// string. Never exposed externally.
    pub fn canonical_key(&self) -> String {
        if !self.id.trim().is_empty() {
            return self.id.clone();
        }
        if !self.name.trim().is_empty() {
            return format!(
                "{}|{}",
                normalize_for_match(&self.name),
                normalize_for_match(&self.address)
            );
        }
        self.location.clone()
    }
}

fn build_searchable_text(input: &CafeInput) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for field in [
        &input.name,
        &input.description,
        &input.district,
        &input.address,
    ] {
        if !field.trim().is_empty() {
            parts.push(field);
        }
    }
    parts.extend(input.features.iter().map(String::as_str).filter(|s| !s.trim().is_empty()));
    parts.extend(input.tags.iter().map(String::as_str).filter(|s| !s.trim().is_empty()));

    let mut text = parts.join("\n");
    if let Some(content) = &input.content {
        let extra = content.flatten(MAX_CONTENT_DEPTH);
        if !extra.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&extra);
        }
    }
    text
}
