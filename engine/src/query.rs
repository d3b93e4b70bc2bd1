use crate::matrix::{SparseRow, TfIdfMatrix};
use crate::tokenizer::tokenize;
use crate::vocabulary::Vocabulary;
use crate::{Document, TermId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

pub const DEFAULT_TOP_N: usize = 5;

/// Sparse query vector in vocabulary space, sorted by column.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    entries: Vec<(TermId, f64)>,
}

impl QueryVector {
    /// Count each in-vocabulary token once per occurrence. Unknown tokens are dropped.
    pub fn from_text(text: &str, vocab: &Vocabulary) -> Self {
        let mut counts: BTreeMap<TermId, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(tid) = vocab.get(&token) {
                *counts.entry(tid).or_insert(0.0) += 1.0;
            }
        }
        Self { entries: counts.into_iter().collect() }
    }

    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Merge join against a column-sorted row.
    pub fn dot(&self, row: &SparseRow<'_, f64>) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut acc = 0.0;
        while i < self.entries.len() && j < row.indices.len() {
            let (qt, qv) = self.entries[i];
            match qt.cmp(&row.indices[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    acc += qv * row.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

/// Cosine similarity with precomputed norms; zero when either side is all-zero.
pub fn cosine(dot: f64, q_norm: f64, d_norm: f64) -> f64 {
    if q_norm == 0.0 || d_norm == 0.0 {
        return 0.0;
    }
    dot / (q_norm * d_norm)
}

/// Score every row, keep positive scores, order by score then row. Returns `(row, score)`.
pub fn rank(query: &QueryVector, tfidf: &TfIdfMatrix, row_norms: &[f64], top_n: usize) -> Vec<(usize, f64)> {
    if query.is_zero() {
        return Vec::new();
    }
    let q_norm = query.norm();
    let mut scored: Vec<(usize, f64)> = tfidf
        .rows()
        .enumerate()
        .map(|(d, row)| (d, cosine(query.dot(&row), q_norm, row_norms[d])))
        .filter(|(_, score)| *score > 0.0)
        .collect();
    // stable: equal scores stay in corpus order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_n);
    scored
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hit<'a> {
    pub doc: &'a Document,
    pub score: f64,
}

/// Presentation order for a result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Score,
    /// Newest first, compared as strings.
    Date,
    Author,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "score" => Ok(SortKey::Score),
            "date" => Ok(SortKey::Date),
            "author" => Ok(SortKey::Author),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Reorder hits for display. `Score` keeps the ranking order.
pub fn sort_hits(hits: &mut [Hit<'_>], key: SortKey) {
    match key {
        SortKey::Score => {}
        SortKey::Date => hits.sort_by(|a, b| b.doc.date.cmp(&a.doc.date)),
        SortKey::Author => hits.sort_by(|a, b| a.doc.author.cmp(&b.doc.author)),
    }
}
