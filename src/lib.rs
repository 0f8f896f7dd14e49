//! Cafeseek core — keyword-tier relevance ranking for café listings.
//!
//! A hand-weighted, tiered keyword vocabulary (not a statistical model) drives
//! every signal: per-record relevance scores, the query-independent baseline
//! popularity score, and the short hashtag summaries. The corpus is small and
//! scored by full scan per query; there is no persistent index.
//!
//! Query-time weight boosting is computed as a per-request table
//! ([`query::QueryWeights`]) over an immutable catalog, so concurrent searches
//! never race on shared keyword state.

pub mod content;
pub mod corpus;
pub mod hashtags;
pub mod interface;
pub mod keywords;
pub mod models;
pub mod query;
pub mod ranking;
pub mod scoring;

pub use content::ContentNode;
pub use corpus::{Corpus, CorpusStore};
pub use interface::*;
pub use keywords::{Keyword, KeywordCatalog, KeywordEntry, Tier};
pub use models::{Cafe, CafeInput};
