//! Hashtag derivation from the weighted-keyword machinery.
//!
//! Tags come from two pools: catalog terms the user typed (by original weight)
//! and the record's most frequent terms (by occurrence count). Both pools go
//! through the same validity filter before the capped, order-preserving union.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::keywords::KeywordCatalog;
use crate::scoring::top_keywords;

/// Hard cap on tags per record.
pub const MAX_HASHTAGS: usize = 5;
/// Default number of query-derived terms.
pub const DEFAULT_TOP_USER: usize = 2;
/// Default number of content-derived terms.
pub const DEFAULT_TOP_CONTENT: usize = 3;

const TAG_MIN_CHARS: usize = 2;
const TAG_MAX_CHARS: usize = 10;

/// Terms too generic to be useful as tags for a café corpus.
static DEFAULT_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["咖啡", "咖啡廳", "咖啡店", "cafe", "coffee", "餐廳", "店家"]
        .into_iter()
        .collect()
});

/// Knobs for tag generation. `stopwords: None` uses the built-in set.
#[derive(Debug, Clone, Default)]
pub struct HashtagOptions {
    pub top_user_n: Option<usize>,
    pub top_content_n: Option<usize>,
    pub stopwords: Option<HashSet<String>>,
}

impl HashtagOptions {
    fn is_stopword(&self, term: &str) -> bool {
        match &self.stopwords {
            Some(set) => set.contains(term),
            None => DEFAULT_STOPWORDS.contains(term),
        }
    }
}

/// Derive up to five descriptive tags for a record, formatted as
/// `#tag1 #tag2 ...`, or the empty string when nothing survives the filter.
pub fn generate_hashtags(
    text: &str,
    catalog: &KeywordCatalog,
    query: &str,
    options: &HashtagOptions,
) -> String {
    let top_user_n = options.top_user_n.unwrap_or(DEFAULT_TOP_USER);
    let top_content_n = options.top_content_n.unwrap_or(DEFAULT_TOP_CONTENT);

    // Query-derived pool: catalog terms the user typed, heaviest first.
    // Take first, then filter — an invalid heavy term is not replaced.
    let query_lower = query.to_lowercase();
    let mut user_terms: Vec<&str> = if query_lower.is_empty() {
        Vec::new()
    } else {
        let mut matching: Vec<(f64, &str)> = catalog
            .all()
            .iter()
            .filter(|k| query_lower.contains(&k.name.to_lowercase()))
            .map(|k| (k.original_weight, k.name.as_str()))
            .collect();
        // Stable sort keeps catalog order among equal weights
        matching.sort_by(|a, b| b.0.total_cmp(&a.0));
        matching.into_iter().take(top_user_n).map(|(_, name)| name).collect()
    };
    user_terms.retain(|term| is_valid_tag(term, options));

    let content_terms: Vec<&str> = top_keywords(text, catalog, top_content_n)
        .into_iter()
        .map(|k| k.name.as_str())
        .filter(|term| is_valid_tag(term, options))
        .collect();

    // Order-preserving union: user terms first, capped
    let mut seen = HashSet::new();
    let tags: Vec<&str> = user_terms
        .into_iter()
        .chain(content_terms)
        .filter(|term| seen.insert(*term))
        .take(MAX_HASHTAGS)
        .collect();

    if tags.is_empty() {
        return String::new();
    }
    tags.iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A valid tag is 2–10 characters of CJK ideographs, ASCII letters, or
/// digits, and not a stopword.
fn is_valid_tag(term: &str, options: &HashtagOptions) -> bool {
    let char_len = term.chars().count();
    if !(TAG_MIN_CHARS..=TAG_MAX_CHARS).contains(&char_len) {
        return false;
    }
    if options.is_stopword(term) {
        return false;
    }
    term.chars()
        .all(|c| crate::query::is_cjk_ideograph(c) || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{CategoryField, KeywordEntry};

    fn catalog(entries: &[(&str, f64)]) -> KeywordCatalog {
        KeywordCatalog::from_entries(entries.iter().map(|&(term, weight)| KeywordEntry {
            term: term.to_string(),
            weight,
            category: None::<CategoryField>,
        }))
    }

    fn opts() -> HashtagOptions {
        HashtagOptions::default()
    }

    #[test]
    fn test_tags_combine_user_then_content() {
        let cat = catalog(&[("安靜", 2.5), ("插座", 2.0), ("不限時", 1.5), ("甜點", 1.0)]);
        let text = "甜點 甜點 不限時";
        let tags = generate_hashtags(text, &cat, "安靜 插座", &opts());
        // User terms (by weight) lead, then content terms by count
        assert_eq!(tags, "#安靜 #插座 #甜點 #不限時");
    }

    #[test]
    fn test_user_terms_sorted_by_original_weight() {
        let cat = catalog(&[("不限時", 1.0), ("安靜", 2.5)]);
        let tags = generate_hashtags("", &cat, "不限時又安靜", &opts());
        assert_eq!(tags, "#安靜 #不限時");
    }

    #[test]
    fn test_user_terms_capped_before_filtering() {
        // Three matching terms but top_user_n = 2: the lightest never enters,
        // even though it would survive the filter
        let cat = catalog(&[("安靜", 3.0), ("插座", 2.0), ("甜點", 1.0)]);
        let tags = generate_hashtags("", &cat, "安靜插座甜點", &opts());
        assert_eq!(tags, "#安靜 #插座");
    }

    #[test]
    fn test_duplicates_removed_preserving_order() {
        let cat = catalog(&[("安靜", 2.5), ("插座", 2.0)]);
        let tags = generate_hashtags("安靜 安靜 插座", &cat, "安靜", &opts());
        assert_eq!(tags, "#安靜 #插座");
    }

    #[test]
    fn test_cap_of_five() {
        let cat = catalog(&[
            ("安靜", 2.5),
            ("插座", 2.4),
            ("不限時", 2.3),
            ("甜點", 2.2),
            ("手沖", 2.1),
            ("輕食", 2.0),
        ]);
        let text = "安靜 插座 不限時 甜點 手沖 輕食";
        let options = HashtagOptions {
            top_content_n: Some(6),
            ..HashtagOptions::default()
        };
        let tags = generate_hashtags(text, &cat, "安靜插座", &options);
        assert_eq!(tags.split(' ').count(), MAX_HASHTAGS);
    }

    #[test]
    fn test_length_bounds() {
        let cat = catalog(&[("靜", 3.0), ("安靜", 2.5), ("aaaaaaaaaab", 2.0)]);
        // 1-char and 11-char terms are invalid
        let tags = generate_hashtags("靜 安靜 aaaaaaaaaab", &cat, "", &opts());
        assert_eq!(tags, "#安靜");
    }

    #[test]
    fn test_charset_rejects_punctuation_and_whitespace() {
        let cat = catalog(&[("不限時!", 3.0), ("安靜 好", 2.5), ("no-wifi", 2.0), ("插座", 1.0)]);
        let options = HashtagOptions {
            top_content_n: Some(4),
            ..HashtagOptions::default()
        };
        let tags = generate_hashtags("不限時! 安靜 好 no-wifi 插座", &cat, "", &options);
        assert_eq!(tags, "#插座");

        // The filter runs after the top-N cut, so invalid terms are
        // dropped rather than replaced
        let capped = generate_hashtags("不限時! 安靜 好 no-wifi 插座", &cat, "", &opts());
        assert_eq!(capped, "");
    }

    #[test]
    fn test_default_stopwords_filtered() {
        let cat = catalog(&[("咖啡", 2.5), ("插座", 2.0)]);
        let tags = generate_hashtags("咖啡 咖啡 插座", &cat, "", &opts());
        assert_eq!(tags, "#插座");
    }

    #[test]
    fn test_custom_stopwords_override_default() {
        let cat = catalog(&[("咖啡", 2.5), ("插座", 2.0)]);
        let options = HashtagOptions {
            stopwords: Some(["插座".to_string()].into_iter().collect()),
            ..HashtagOptions::default()
        };
        // With a custom set, the built-in entries no longer apply
        let tags = generate_hashtags("咖啡 插座", &cat, "", &options);
        assert_eq!(tags, "#咖啡");
    }

    #[test]
    fn test_no_surviving_terms_is_empty_string() {
        let cat = catalog(&[("咖啡", 2.5)]);
        assert_eq!(generate_hashtags("咖啡", &cat, "", &opts()), "");
        assert_eq!(generate_hashtags("", &cat, "", &opts()), "");
    }

    #[test]
    fn test_ascii_and_digit_tags_allowed() {
        let cat = catalog(&[("wifi", 1.5), ("24h", 1.2)]);
        let tags = generate_hashtags("wifi 24h", &cat, "", &opts());
        assert_eq!(tags, "#wifi #24h");
    }
}
