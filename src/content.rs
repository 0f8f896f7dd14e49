//! Bounded-depth content trees.
//!
//! An optional ingestion pipeline fetches a listing's page plus the pages it
//! links to and hands the extracted text over as a tree. Flattening emits one
//! plain-text blob for searchable-text assembly; anything below the depth cap
//! is ignored rather than an error, and scoring never sees the tree itself.

use serde::Deserialize;

/// Depth cap when flattening: the page itself plus two levels of linked pages.
pub const MAX_CONTENT_DEPTH: usize = 2;

/// Extracted text for one fetched page and the pages it links to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentNode {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(text: impl Into<String>) -> Self {
        ContentNode {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Depth-first flatten into newline-joined plain text. Depth 0 keeps only
    /// this node's text; blank nodes contribute nothing.
    pub fn flatten(&self, max_depth: usize) -> String {
        let mut parts = Vec::new();
        self.collect(max_depth, &mut parts);
        parts.join("\n")
    }

    fn collect<'a>(&'a self, depth_left: usize, parts: &mut Vec<&'a str>) {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
        if depth_left == 0 {
            return;
        }
        for child in &self.children {
            child.collect(depth_left - 1, parts);
        }
    }
}
