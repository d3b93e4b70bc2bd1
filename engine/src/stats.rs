use crate::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub count: usize,
    pub mean_sentences: f64,
    pub mean_words: f64,
    pub total_words: u64,
}

/// Segments separated by `.`; an empty text is one segment.
fn sentence_count(text: &str) -> u64 {
    text.split('.').count() as u64
}

/// Segments separated by a single space. Deliberately not the tokenizer's rule.
fn word_count(text: &str) -> u64 {
    text.split(' ').count() as u64
}

pub fn compute_statistics(docs: &[Document]) -> CorpusStats {
    if docs.is_empty() {
        return CorpusStats::default();
    }
    let sentences: u64 = docs.iter().map(|d| sentence_count(&d.text)).sum();
    let total_words: u64 = docs.iter().map(|d| word_count(&d.text)).sum();
    let n = docs.len() as f64;
    CorpusStats {
        count: docs.len(),
        mean_sentences: sentences as f64 / n,
        mean_words: total_words as f64 / n,
        total_words,
    }
}
