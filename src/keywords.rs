//! Weighted keyword catalog — the single source of truth for term weights.
//!
//! Weights are fixed at load time and never mutated afterwards; per-query
//! boosting happens in a separate per-request table (see `query.rs`), so the
//! catalog stays safe to share across concurrent searches. Iteration order is
//! stable (file order) and significant: it breaks ties in `top_keywords` and
//! hashtag selection.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Closed lower bound of the CORE tier.
pub const CORE_WEIGHT_MIN: f64 = 2.0;
/// Closed lower bound of the SECONDARY tier.
pub const SECONDARY_WEIGHT_MIN: f64 = 1.0;

/// Error type for catalog loading.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed keyword file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Importance class of a keyword, derived from its weight unless the
/// configuration names a category explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Core,
    Secondary,
    Reference,
}

impl Tier {
    /// Classify a weight using the closed-lower-bound thresholds,
    /// checked in priority order.
    pub fn of_weight(weight: f64) -> Tier {
        if weight >= CORE_WEIGHT_MIN {
            Tier::Core
        } else if weight >= SECONDARY_WEIGHT_MIN {
            Tier::Secondary
        } else {
            Tier::Reference
        }
    }

    /// Numeric form used by legacy keyword files (1/2/3).
    /// Only meaningful at the serialization boundary.
    pub fn legacy_code(self) -> u8 {
        match self {
            Tier::Core => 1,
            Tier::Secondary => 2,
            Tier::Reference => 3,
        }
    }

    pub fn from_legacy_code(code: u8) -> Option<Tier> {
        match code {
            1 => Some(Tier::Core),
            2 => Some(Tier::Secondary),
            3 => Some(Tier::Reference),
            _ => None,
        }
    }

    fn from_label(label: &str) -> Option<Tier> {
        match label.trim().to_lowercase().as_str() {
            "core" => Some(Tier::Core),
            "secondary" => Some(Tier::Secondary),
            "additional" => Some(Tier::Reference),
            _ => None,
        }
    }
}

/// A weighted vocabulary term. `original_weight` never changes once the
/// catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub original_weight: f64,
    pub tier: Tier,
}

/// One entry of the keyword configuration file.
/// `category` accepts a label (`core|secondary|additional`) or a legacy
/// numeric tier (1/2/3); absent means "derive from weight".
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordEntry {
    pub term: String,
    pub weight: f64,
    #[serde(default)]
    pub category: Option<CategoryField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    Legacy(u8),
    Label(String),
}

impl KeywordEntry {
    /// Resolve the entry's tier. Malformed categories degrade to REFERENCE
    /// rather than failing the load.
    fn tier(&self) -> Tier {
        match &self.category {
            None => Tier::of_weight(self.weight),
            Some(CategoryField::Legacy(code)) => {
                Tier::from_legacy_code(*code).unwrap_or_else(|| {
                    warn!(term = %self.term, code, "unknown legacy tier, defaulting to reference");
                    Tier::Reference
                })
            }
            Some(CategoryField::Label(label)) => Tier::from_label(label).unwrap_or_else(|| {
                warn!(term = %self.term, label = %label, "unknown category, defaulting to reference");
                Tier::Reference
            }),
        }
    }
}

/// Ordered, immutable collection of weighted keywords.
#[derive(Debug, Default)]
pub struct KeywordCatalog {
    keywords: Vec<Keyword>,
    /// Lowercased name -> position in `keywords`.
    index: HashMap<String, usize>,
}

impl KeywordCatalog {
    /// Build a catalog from configuration entries, preserving entry order.
    /// Duplicate terms keep the first occurrence so iteration order stays
    /// meaningful for tie-breaking.
    pub fn from_entries(entries: impl IntoIterator<Item = KeywordEntry>) -> Self {
        let mut keywords = Vec::new();
        let mut index = HashMap::new();
        for entry in entries {
            let name = entry.term.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            if index.contains_key(&key) {
                warn!(term = %name, "duplicate keyword entry ignored");
                continue;
            }
            let tier = entry.tier();
            index.insert(key, keywords.len());
            keywords.push(Keyword {
                name,
                original_weight: entry.weight,
                tier,
            });
        }
        debug!(keywords = keywords.len(), "keyword catalog built");
        KeywordCatalog { keywords, index }
    }

    /// Load a catalog from a JSON array of entries.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let raw = fs::read_to_string(path)?;
        let entries: Vec<KeywordEntry> = serde_json::from_str(&raw)?;
        Ok(Self::from_entries(entries))
    }

    /// Weight of a term, 0.0 if unknown. Lookup is case-insensitive and
    /// never an error.
    pub fn get_weight(&self, name: &str) -> f64 {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| self.keywords[i].original_weight)
            .unwrap_or(0.0)
    }

    /// All keywords in stable (file) order.
    pub fn all(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
