use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\b\w+\b").expect("valid regex");
}

/// Tokenize text into lowercase word tokens, left to right.
///
/// A token is a maximal run of Unicode word characters (letters, digits, underscore).
/// Everything else separates tokens. No stemming, stopword removal or length filter.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Count tokens of `text`, keeping the order in which each token first appears.
pub fn count_terms(text: &str) -> IndexMap<String, u32> {
    let mut counts: IndexMap<String, u32> = IndexMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}
